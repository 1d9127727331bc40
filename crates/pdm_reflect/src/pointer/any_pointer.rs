use alloc::rc::Weak;
use core::any::Any;
use core::cell::RefCell;
use core::fmt;

use uuid::Uuid;

use crate::object::Object;
use crate::pointer::Pointer;

// -----------------------------------------------------------------------------
// AnyPointer

/// A type-erased, non-owning reference to an object.
///
/// It keeps two views of the same allocation: a `dyn Object` view for
/// generic traversal and a `dyn Any` view to recover the concrete
/// [`Pointer<T>`] through [`downcast`](AnyPointer::downcast).
#[derive(Clone)]
pub struct AnyPointer {
    object: Weak<RefCell<dyn Object>>,
    any: Weak<dyn Any>,
}

impl<T: Object> From<Pointer<T>> for AnyPointer {
    fn from(pointer: Pointer<T>) -> Self {
        let object: Weak<RefCell<dyn Object>> = pointer.weak().clone();
        let any: Weak<dyn Any> = pointer.weak().clone();
        Self { object, any }
    }
}

impl AnyPointer {
    /// Returns `true` if the referent was destroyed.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.object.strong_count() == 0
    }

    /// Returns `true` if both pointers refer to the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.object, &other.object)
    }

    /// Calls `f` with a shared borrow of the referent.
    pub fn with<R>(&self, f: impl FnOnce(&dyn Object) -> R) -> Option<R> {
        let rc = self.object.upgrade()?;
        let object = rc.try_borrow().ok()?;
        Some(f(&*object))
    }

    /// Calls `f` with an exclusive borrow of the referent.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut dyn Object) -> R) -> Option<R> {
        let rc = self.object.upgrade()?;
        let mut object = rc.try_borrow_mut().ok()?;
        Some(f(&mut *object))
    }

    /// The uuid of the referent.
    pub fn uuid(&self) -> Option<Uuid> {
        self.with(|object| object.handle().uuid())
    }

    /// The class keyword of the referent.
    pub fn class_keyword(&self) -> Option<&'static str> {
        self.with(|object| object.class_keyword())
    }

    /// Returns `true` if the referent is alive and of type `T`.
    pub fn is<T: Object>(&self) -> bool {
        self.any.upgrade().is_some_and(|rc| rc.is::<RefCell<T>>())
    }

    /// Recovers the typed pointer, `None` if the referent is gone or is not a `T`.
    pub fn downcast<T: Object>(&self) -> Option<Pointer<T>> {
        let rc = self.any.upgrade()?.downcast::<RefCell<T>>().ok()?;
        Some(Pointer::from_rc(&rc))
    }
}

impl fmt::Debug for AnyPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.with(|object| (object.class_keyword(), object.handle().uuid())) {
            Some((class, uuid)) => write!(f, "AnyPointer({class} {uuid})"),
            None => f.write_str("AnyPointer(null)"),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
