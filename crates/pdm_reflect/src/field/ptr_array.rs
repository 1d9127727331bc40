use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::slice;

use serde_core::Deserialize;
use uuid::Uuid;

use crate::field::error::{check_index, check_position};
use crate::field::{ArrayError, FieldHandle, FieldMeta};
use crate::io::{
    FieldIoCapability, IdentityTable, ReadContext, ReferenceError, ReferencesSerializer,
    WriteContext,
};
use crate::object::ObjectClass;
use crate::pointer::{Pointer, Target};

// -----------------------------------------------------------------------------
// PtrArrayField

/// An ordered list of non-owning references.
///
/// Elements may be null and may repeat. After a read the references are
/// held as uuids until the whole document is known, see
/// [`is_resolved`](PtrArrayField::is_resolved).
pub struct PtrArrayField<T> {
    meta: FieldMeta,
    pointers: Vec<Pointer<T>>,
    unresolved: Option<Vec<Option<Uuid>>>,
}

impl<T: ObjectClass> PtrArrayField<T> {
    /// Creates an unbound, empty field.
    #[inline]
    pub fn new() -> Self {
        Self {
            meta: FieldMeta::new(),
            pointers: Vec::new(),
            unresolved: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    /// Returns `false` between reading a document and resolving its references.
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.unresolved.is_none()
    }

    #[inline]
    pub fn push_back(&mut self, pointer: Pointer<T>) {
        self.pointers_mut().push(pointer);
    }

    /// Inserts `pointer` so that it ends up at `index`.
    pub fn insert(&mut self, index: usize, pointer: Pointer<T>) -> Result<(), ArrayError> {
        check_position(index, self.pointers.len())?;
        self.pointers_mut().insert(index, pointer);
        Ok(())
    }

    /// Inserts `pointers` in order, the first one ending up at `index`.
    pub fn insert_many(
        &mut self,
        index: usize,
        pointers: impl IntoIterator<Item = Pointer<T>>,
    ) -> Result<(), ArrayError> {
        check_position(index, self.pointers.len())?;
        self.pointers_mut().splice(index..index, pointers);
        Ok(())
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Pointer<T>> {
        self.pointers.get(index)
    }

    /// Replaces the reference at `index`.
    pub fn set(&mut self, index: usize, pointer: Pointer<T>) -> Result<(), ArrayError> {
        check_index(index, self.pointers.len())?;
        self.pointers_mut()[index] = pointer;
        Ok(())
    }

    /// Removes the reference at `index`. The referent is not affected.
    pub fn erase(&mut self, index: usize) -> Result<Pointer<T>, ArrayError> {
        check_index(index, self.pointers.len())?;
        Ok(self.pointers_mut().remove(index))
    }

    /// Position of the first reference to the same object as `pointer`.
    pub fn index(&self, pointer: &Pointer<T>) -> Option<usize> {
        self.pointers.iter().position(|p| p.ptr_eq(pointer))
    }

    /// Number of references to the same object as `pointer`.
    pub fn count(&self, pointer: &Pointer<T>) -> usize {
        self.pointers.iter().filter(|p| p.ptr_eq(pointer)).count()
    }

    /// Removes every reference to the same object as `pointer`, returning how many.
    pub fn remove_ptr(&mut self, pointer: &Pointer<T>) -> usize {
        let before = self.pointers.len();
        self.pointers_mut().retain(|p| !p.ptr_eq(pointer));
        before - self.pointers.len()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.pointers_mut().clear();
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Pointer<T>> {
        self.pointers.iter()
    }

    #[inline]
    pub fn value(&self) -> &[Pointer<T>] {
        &self.pointers
    }

    pub fn set_value(&mut self, pointers: Vec<Pointer<T>>) {
        *self.pointers_mut() = pointers;
    }

    /// The non-null references, in order.
    pub fn referenced_objects(&self) -> Vec<Pointer<T>> {
        self.pointers
            .iter()
            .filter(|p| !p.is_null())
            .cloned()
            .collect()
    }

    /// Edits override uuids still pending from a read.
    fn pointers_mut(&mut self) -> &mut Vec<Pointer<T>> {
        self.unresolved = None;
        &mut self.pointers
    }

    fn targets(&self) -> Vec<Target> {
        match &self.unresolved {
            Some(uuids) => uuids.iter().copied().map(Target::from).collect(),
            None => self.pointers.iter().map(Pointer::target).collect(),
        }
    }
}

impl<T: ObjectClass> Default for PtrArrayField<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a PtrArrayField<T> {
    type Item = &'a Pointer<T>;
    type IntoIter = slice::Iter<'a, Pointer<T>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.pointers.iter()
    }
}

impl<T: ObjectClass> fmt::Debug for PtrArrayField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PtrArrayField")
            .field("keyword", &self.meta.keyword())
            .field("pointers", &self.pointers)
            .finish()
    }
}

impl<T: ObjectClass> FieldHandle for PtrArrayField<T> {
    #[inline]
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    #[inline]
    fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    fn data_type(&self) -> String {
        format!("pointer[]:{}", T::CLASS_KEYWORD)
    }

    #[inline]
    fn is_vector_field(&self) -> bool {
        true
    }

    fn is_data_equal(&self, other: &dyn FieldHandle) -> bool {
        other
            .downcast_ref::<Self>()
            .is_some_and(|other| self.targets() == other.targets())
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

impl<T: ObjectClass> FieldIoCapability for PtrArrayField<T> {
    fn serialize_value<'a>(
        &'a self,
        ctx: &'a WriteContext<'a>,
    ) -> Box<dyn erased_serde::Serialize + 'a> {
        Box::new(ReferencesSerializer::new(self.targets(), ctx))
    }

    fn deserialize_value<'de>(
        &mut self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
        ctx: &mut ReadContext<'_>,
    ) -> Result<(), erased_serde::Error> {
        let texts = Vec::<Option<String>>::deserialize(deserializer)?;
        let mut uuids = Vec::with_capacity(texts.len());
        for text in texts {
            uuids.push(match text {
                Some(text) => Some(ctx.parse_uuid::<erased_serde::Error>(&text)?),
                None => None,
            });
        }

        self.unresolved = Some(uuids);
        Ok(())
    }

    #[inline]
    fn has_unresolved_references(&self) -> bool {
        self.unresolved.is_some()
    }

    fn resolve_references(&mut self, table: &IdentityTable) -> Result<(), ReferenceError> {
        let Some(uuids) = &self.unresolved else {
            return Ok(());
        };
        let pointers: Vec<Pointer<T>> = uuids
            .iter()
            .map(|uuid| match uuid {
                Some(uuid) => table.resolve::<T>(*uuid),
                None => Ok(Pointer::null()),
            })
            .collect::<Result<_, _>>()?;
        self.pointers = pointers;
        self.unresolved = None;
        Ok(())
    }

    #[inline]
    fn discard_unresolved_references(&mut self) {
        self.unresolved = None;
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::field::{ArrayError, ChildArrayField, FieldHandle, PtrArrayField};
    use crate::io::{FieldIoCapability, IdentityTable, ReadContext};
    use crate::pointer::Pointer;
    use crate::test_objects::Item;

    #[test]
    fn references() {
        let mut owner = ChildArrayField::<Item>::new();
        let a = owner.push_back(Item::named("a"));
        let b = owner.push_back(Item::named("b"));

        let mut field = PtrArrayField::<Item>::new();
        field.push_back(a.clone());
        field.push_back(Pointer::null());
        field.insert(0, b.clone()).unwrap();
        field.push_back(a.clone());

        assert_eq!(field.len(), 4);
        assert_eq!(field.index(&a), Some(1));
        assert_eq!(field.count(&a), 2);
        assert_eq!(field.referenced_objects().len(), 3);
        assert_eq!(field.insert(9, a.clone()), Err(ArrayError::OutOfBounds { index: 9, len: 4 }));

        assert_eq!(field.remove_ptr(&a), 2);
        assert_eq!(field.len(), 2);
        assert!(field.get(1).unwrap().is_null());

        assert!(field.erase(0).unwrap().ptr_eq(&b));
        assert!(!b.is_null());
    }

    #[test]
    fn referent_destroyed() {
        let mut owner = ChildArrayField::<Item>::new();
        let a = owner.push_back(Item::named("a"));

        let mut field = PtrArrayField::<Item>::new();
        field.push_back(a);
        owner.clear();

        assert_eq!(field.len(), 1);
        assert!(field.get(0).unwrap().is_null());
        assert!(field.referenced_objects().is_empty());
    }

    #[test]
    fn insert_many_and_set() {
        let mut owner = ChildArrayField::<Item>::new();
        let a = owner.push_back(Item::named("a"));
        let b = owner.push_back(Item::named("b"));

        let mut field = PtrArrayField::<Item>::new();
        field.push_back(a.clone());
        field.insert_many(0, [b.clone(), b.clone()]).unwrap();
        assert_eq!(field.count(&b), 2);
        assert_eq!(field.index(&a), Some(2));

        field.set(0, a.clone()).unwrap();
        assert_eq!(field.count(&a), 2);
        assert!(field.set(3, a).is_err());
        assert_eq!(field.data_type(), "pointer[]:Item");
    }

    #[test]
    fn pending_references() {
        let mut owner = ChildArrayField::<Item>::new();
        let a = owner.push_back(Item::named("a"));

        let mut field = PtrArrayField::<Item>::new();
        field.push_back(a.clone());

        let mut ctx = ReadContext::new(None, false, None);
        let mut json = serde_json::Deserializer::from_str(r#"["00000000-0000-4000-8000-00000000000a"]"#);
        let mut erased = <dyn erased_serde::Deserializer>::erase(&mut json);
        field.deserialize_value(&mut erased, &mut ctx).unwrap();

        // Pointers stay as they were until resolution succeeds.
        assert!(!field.is_resolved());
        assert!(field.get(0).unwrap().ptr_eq(&a));
        assert!(field.resolve_references(&IdentityTable::default()).is_err());
        assert!(!field.is_resolved());
        assert!(field.get(0).unwrap().ptr_eq(&a));

        // An edit replaces what was read.
        field.push_back(Pointer::null());
        assert!(field.is_resolved());
        assert_eq!(field.len(), 2);
        assert!(field.get(0).unwrap().ptr_eq(&a));
    }
}
