use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;

use serde_core::Deserializer;

use crate::field::error::{check_index, check_position};
use crate::field::{ArrayError, FieldHandle, FieldMeta};
use crate::io::{ChildSeqVisitor, ChildrenSerializer, FieldIoCapability, ReadContext, WriteContext};
use crate::object::{ObjectClass, objects_data_equal};
use crate::pointer::{AnyPointer, Pointer};

// -----------------------------------------------------------------------------
// ChildArrayField

/// An ordered list of owned objects.
///
/// The field is the only strong owner of its elements. Removing an element
/// or dropping the field destroys the element and, recursively, everything
/// it owns. Pointers to destroyed objects become null.
pub struct ChildArrayField<T> {
    meta: FieldMeta,
    children: Vec<Rc<RefCell<T>>>,
}

impl<T: ObjectClass> ChildArrayField<T> {
    /// Creates an unbound, empty field.
    #[inline]
    pub fn new() -> Self {
        Self {
            meta: FieldMeta::new(),
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Appends `value` and returns a pointer to it.
    pub fn push_back(&mut self, value: T) -> Pointer<T> {
        let rc = Rc::new(RefCell::new(value));
        let pointer = Pointer::from_rc(&rc);
        self.children.push(rc);
        pointer
    }

    /// Inserts `value` so that it ends up at `index`, shifting later elements.
    ///
    /// `index == len()` appends.
    pub fn insert(&mut self, index: usize, value: T) -> Result<Pointer<T>, ArrayError> {
        check_position(index, self.children.len())?;
        let rc = Rc::new(RefCell::new(value));
        let pointer = Pointer::from_rc(&rc);
        self.children.insert(index, rc);
        Ok(pointer)
    }

    /// Inserts `values` in order, the first one ending up at `index`.
    pub fn insert_many(
        &mut self,
        index: usize,
        values: impl IntoIterator<Item = T>,
    ) -> Result<Vec<Pointer<T>>, ArrayError> {
        check_position(index, self.children.len())?;
        let inserted: Vec<_> = values
            .into_iter()
            .map(|value| Rc::new(RefCell::new(value)))
            .collect();
        let pointers = inserted.iter().map(Pointer::from_rc).collect();
        self.children.splice(index..index, inserted);
        Ok(pointers)
    }

    /// Borrows the element at `index`.
    ///
    /// Returns `None` if `index` is out of bounds or the element is
    /// mutably borrowed through a pointer.
    pub fn get(&self, index: usize) -> Option<Ref<'_, T>> {
        self.children.get(index)?.try_borrow().ok()
    }

    /// Mutably borrows the element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<RefMut<'_, T>> {
        self.children.get(index)?.try_borrow_mut().ok()
    }

    /// A pointer to the element at `index`.
    pub fn pointer(&self, index: usize) -> Option<Pointer<T>> {
        self.children.get(index).map(Pointer::from_rc)
    }

    /// Pointers to every element, in order.
    pub fn pointers(&self) -> Vec<Pointer<T>> {
        self.children.iter().map(Pointer::from_rc).collect()
    }

    /// Position of the element `pointer` refers to.
    pub fn index(&self, pointer: &Pointer<T>) -> Option<usize> {
        self.children.iter().position(|rc| pointer.points_to(rc))
    }

    /// Replaces the element at `index`, destroying the previous one.
    pub fn set(&mut self, index: usize, value: T) -> Result<Pointer<T>, ArrayError> {
        check_index(index, self.children.len())?;
        let rc = Rc::new(RefCell::new(value));
        let pointer = Pointer::from_rc(&rc);
        self.children[index] = rc;
        Ok(pointer)
    }

    /// Removes and destroys the element at `index`.
    pub fn remove(&mut self, index: usize) -> Result<(), ArrayError> {
        check_index(index, self.children.len())?;
        self.children.remove(index);
        Ok(())
    }

    /// Removes the element at `index` and hands ownership to the caller.
    ///
    /// Pointers to the element become null, the returned value is no
    /// longer shared.
    ///
    /// # Errors
    ///
    /// [`ArrayError::InUse`] if the element is borrowed through a pointer
    /// at the moment of the call. The array is left unchanged.
    pub fn take(&mut self, index: usize) -> Result<T, ArrayError> {
        check_index(index, self.children.len())?;
        let rc = self.children.remove(index);
        match Rc::try_unwrap(rc) {
            Ok(cell) => Ok(cell.into_inner()),
            Err(rc) => {
                self.children.insert(index, rc);
                Err(ArrayError::InUse { index })
            }
        }
    }

    /// Removes and destroys the element `pointer` refers to.
    ///
    /// Returns `false` if the element is not in this field.
    pub fn remove_object(&mut self, pointer: &Pointer<T>) -> bool {
        match self.index(pointer) {
            Some(index) => {
                self.children.remove(index);
                true
            }
            None => false,
        }
    }

    /// Destroys every element.
    #[inline]
    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Borrows every element in order.
    ///
    /// # Panics
    ///
    /// Panics if an element is mutably borrowed through a pointer.
    pub fn iter(&self) -> impl Iterator<Item = Ref<'_, T>> + '_ {
        self.children.iter().map(|rc| rc.borrow())
    }
}

impl<T: ObjectClass> Default for ChildArrayField<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ObjectClass> fmt::Debug for ChildArrayField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildArrayField")
            .field("keyword", &self.meta.keyword())
            .field("len", &self.children.len())
            .finish()
    }
}

impl<T: ObjectClass> FieldHandle for ChildArrayField<T> {
    #[inline]
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    #[inline]
    fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    fn data_type(&self) -> String {
        format!("object[]:{}", T::CLASS_KEYWORD)
    }

    #[inline]
    fn is_vector_field(&self) -> bool {
        true
    }

    fn child_objects(&self, out: &mut Vec<AnyPointer>) {
        out.extend(self.children.iter().map(|rc| Pointer::from_rc(rc).to_any()));
    }

    fn is_data_equal(&self, other: &dyn FieldHandle) -> bool {
        let Some(other) = other.downcast_ref::<Self>() else {
            return false;
        };
        self.children.len() == other.children.len()
            && self.children.iter().zip(&other.children).all(|(a, b)| {
                match (a.try_borrow(), b.try_borrow()) {
                    (Ok(a), Ok(b)) => objects_data_equal(&*a, &*b),
                    _ => false,
                }
            })
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

impl<T: ObjectClass> FieldIoCapability for ChildArrayField<T> {
    fn serialize_value<'a>(
        &'a self,
        ctx: &'a WriteContext<'a>,
    ) -> Box<dyn erased_serde::Serialize + 'a> {
        Box::new(ChildrenSerializer::new(&self.children, ctx))
    }

    fn deserialize_value<'de>(
        &mut self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
        ctx: &mut ReadContext<'_>,
    ) -> Result<(), erased_serde::Error> {
        self.children = deserializer.deserialize_seq(ChildSeqVisitor::<T>::new(ctx))?;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
