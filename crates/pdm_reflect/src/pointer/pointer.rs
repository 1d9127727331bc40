use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use core::fmt;

use uuid::Uuid;

use crate::object::Object;
use crate::pointer::AnyPointer;

// -----------------------------------------------------------------------------
// Target

/// What a pointer refers to at the time it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    /// Never set, or the referent was destroyed.
    Null,
    Object(Uuid),
    /// Alive, but mutably borrowed so its uuid can not be read.
    Borrowed,
}

impl From<Option<Uuid>> for Target {
    #[inline]
    fn from(uuid: Option<Uuid>) -> Self {
        uuid.map_or(Target::Null, Target::Object)
    }
}

// -----------------------------------------------------------------------------
// Pointer

/// A typed, non-owning reference to an object owned by a child field.
///
/// Access goes through closures, the referent is borrowed only for the
/// duration of the call. Both [`with`](Pointer::with) and
/// [`with_mut`](Pointer::with_mut) return `None` if the referent has been
/// destroyed or is currently borrowed in a conflicting way (for example an
/// ancestor whose `init_after_read` is running).
pub struct Pointer<T> {
    inner: Weak<RefCell<T>>,
}

impl<T> Pointer<T> {
    /// Creates a pointer that refers to nothing.
    #[inline]
    pub const fn null() -> Self {
        Self { inner: Weak::new() }
    }

    #[inline]
    pub(crate) fn from_rc(rc: &Rc<RefCell<T>>) -> Self {
        Self {
            inner: Rc::downgrade(rc),
        }
    }

    #[inline]
    pub(crate) fn weak(&self) -> &Weak<RefCell<T>> {
        &self.inner
    }

    /// Returns `true` if the pointer was never set or its referent was destroyed.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.inner.strong_count() == 0
    }

    /// Returns `true` if both pointers refer to the same allocation.
    ///
    /// Two null pointers created by [`Pointer::null`] compare equal.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns `true` if this pointer refers to the object inside `rc`.
    #[inline]
    pub(crate) fn points_to(&self, rc: &Rc<RefCell<T>>) -> bool {
        core::ptr::eq(self.inner.as_ptr(), Rc::as_ptr(rc))
    }

    /// Calls `f` with a shared borrow of the referent.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let rc = self.inner.upgrade()?;
        let value = rc.try_borrow().ok()?;
        Some(f(&value))
    }

    /// Calls `f` with an exclusive borrow of the referent.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let rc = self.inner.upgrade()?;
        let mut value = rc.try_borrow_mut().ok()?;
        Some(f(&mut value))
    }
}

impl<T: Object> Pointer<T> {
    /// The uuid of the referent, `None` for a null pointer.
    pub fn uuid(&self) -> Option<Uuid> {
        self.with(|object| object.handle().uuid())
    }

    /// Tells a destroyed referent apart from one that is only busy.
    pub(crate) fn target(&self) -> Target {
        if self.is_null() {
            return Target::Null;
        }
        self.uuid().map_or(Target::Borrowed, Target::Object)
    }

    /// Erases the type of this pointer.
    #[inline]
    pub fn to_any(&self) -> AnyPointer {
        AnyPointer::from(self.clone())
    }
}

impl<T> Clone for Pointer<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for Pointer<T> {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

impl<T> fmt::Debug for Pointer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("Pointer(null)")
        } else {
            write!(f, "Pointer({:p})", self.inner.as_ptr())
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Pointer, Target};
    use alloc::rc::Rc;
    use core::cell::RefCell;

    #[test]
    fn null_and_dropped() {
        let null = Pointer::<i32>::null();
        assert!(null.is_null());
        assert_eq!(null.with(|v| *v), None);

        let rc = Rc::new(RefCell::new(5_i32));
        let pointer = Pointer::from_rc(&rc);
        assert!(!pointer.is_null());
        assert!(pointer.points_to(&rc));
        assert_eq!(pointer.with(|v| *v), Some(5));

        pointer.with_mut(|v| *v = 6);
        assert_eq!(*rc.borrow(), 6);

        drop(rc);
        assert!(pointer.is_null());
        assert_eq!(pointer.with(|v| *v), None);
    }

    #[test]
    fn conflicting_borrow() {
        let rc = Rc::new(RefCell::new(1_i32));
        let pointer = Pointer::from_rc(&rc);

        let guard = rc.borrow_mut();
        assert_eq!(pointer.with(|v| *v), None);
        drop(guard);

        assert_eq!(pointer.with(|v| *v), Some(1));
    }

    #[test]
    fn target_of_busy_referent() {
        use crate::object::Object;
        use crate::test_objects::Item;

        let rc = Rc::new(RefCell::new(Item::named("a")));
        let uuid = rc.borrow().uuid();
        let pointer = Pointer::from_rc(&rc);
        assert_eq!(pointer.target(), Target::Object(uuid));

        let guard = rc.borrow_mut();
        assert_eq!(pointer.target(), Target::Borrowed);
        drop(guard);

        drop(rc);
        assert_eq!(pointer.target(), Target::Null);
    }

    #[test]
    fn identity() {
        let a = Rc::new(RefCell::new(1_i32));
        let b = Rc::new(RefCell::new(1_i32));

        assert!(Pointer::from_rc(&a).ptr_eq(&Pointer::from_rc(&a)));
        assert!(!Pointer::from_rc(&a).ptr_eq(&Pointer::from_rc(&b)));
        assert!(Pointer::<i32>::null().ptr_eq(&Pointer::null()));
    }
}
