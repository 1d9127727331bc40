use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;

use serde_core::Deserializer;

use crate::field::{FieldHandle, FieldMeta};
use crate::io::{ChildOptionVisitor, ChildSerializer, FieldIoCapability, ReadContext, WriteContext};
use crate::object::{ObjectClass, objects_data_equal};
use crate::pointer::{AnyPointer, Pointer};

// -----------------------------------------------------------------------------
// ChildField

/// Zero or one owned object.
///
/// Same ownership rules as [`ChildArrayField`](crate::field::ChildArrayField):
/// replacing or clearing the child destroys it.
pub struct ChildField<T> {
    meta: FieldMeta,
    child: Option<Rc<RefCell<T>>>,
}

impl<T: ObjectClass> ChildField<T> {
    /// Creates an unbound, empty field.
    #[inline]
    pub fn new() -> Self {
        Self {
            meta: FieldMeta::new(),
            child: None,
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.child.is_none()
    }

    #[inline]
    pub fn is_some(&self) -> bool {
        self.child.is_some()
    }

    /// Stores `value`, destroying the previous child, and returns a pointer to it.
    pub fn set(&mut self, value: T) -> Pointer<T> {
        let rc = Rc::new(RefCell::new(value));
        let pointer = Pointer::from_rc(&rc);
        self.child = Some(rc);
        pointer
    }

    #[inline]
    pub fn get(&self) -> Option<Ref<'_, T>> {
        self.child.as_ref()?.try_borrow().ok()
    }

    #[inline]
    pub fn get_mut(&mut self) -> Option<RefMut<'_, T>> {
        self.child.as_ref()?.try_borrow_mut().ok()
    }

    #[inline]
    pub fn pointer(&self) -> Option<Pointer<T>> {
        self.child.as_ref().map(Pointer::from_rc)
    }

    /// Destroys the child.
    #[inline]
    pub fn clear(&mut self) {
        self.child = None;
    }

    /// Detaches the child and hands ownership to the caller.
    ///
    /// Returns `None` if the field is empty or the child is borrowed
    /// through a pointer; in the latter case the field keeps it.
    pub fn take(&mut self) -> Option<T> {
        let rc = self.child.take()?;
        match Rc::try_unwrap(rc) {
            Ok(cell) => Some(cell.into_inner()),
            Err(rc) => {
                self.child = Some(rc);
                None
            }
        }
    }
}

impl<T: ObjectClass> Default for ChildField<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ObjectClass> fmt::Debug for ChildField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildField")
            .field("keyword", &self.meta.keyword())
            .field("is_some", &self.child.is_some())
            .finish()
    }
}

impl<T: ObjectClass> FieldHandle for ChildField<T> {
    #[inline]
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    #[inline]
    fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    fn data_type(&self) -> String {
        format!("object:{}", T::CLASS_KEYWORD)
    }

    #[inline]
    fn is_vector_field(&self) -> bool {
        false
    }

    fn child_objects(&self, out: &mut Vec<AnyPointer>) {
        if let Some(rc) = &self.child {
            out.push(Pointer::from_rc(rc).to_any());
        }
    }

    fn is_data_equal(&self, other: &dyn FieldHandle) -> bool {
        let Some(other) = other.downcast_ref::<Self>() else {
            return false;
        };
        match (&self.child, &other.child) {
            (None, None) => true,
            (Some(a), Some(b)) => match (a.try_borrow(), b.try_borrow()) {
                (Ok(a), Ok(b)) => objects_data_equal(&*a, &*b),
                _ => false,
            },
            _ => false,
        }
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: ObjectClass> FieldIoCapability for ChildField<T> {
    fn serialize_value<'a>(
        &'a self,
        ctx: &'a WriteContext<'a>,
    ) -> Box<dyn erased_serde::Serialize + 'a> {
        Box::new(self.child.as_ref().map(|rc| ChildSerializer::new(rc, ctx)))
    }

    fn deserialize_value<'de>(
        &mut self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
        ctx: &mut ReadContext<'_>,
    ) -> Result<(), erased_serde::Error> {
        self.child = deserializer.deserialize_option(ChildOptionVisitor::<T>::new(ctx))?;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
