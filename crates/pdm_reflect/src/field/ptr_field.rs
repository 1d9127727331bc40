use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use core::any::Any;
use core::fmt;

use serde_core::Deserialize;
use uuid::Uuid;

use crate::field::{FieldHandle, FieldMeta};
use crate::io::{
    FieldIoCapability, IdentityTable, ReadContext, ReferenceError, ReferenceSerializer,
    WriteContext,
};
use crate::object::ObjectClass;
use crate::pointer::{Pointer, Target};

// -----------------------------------------------------------------------------
// PtrField

/// A single non-owning reference, null by default.
pub struct PtrField<T> {
    meta: FieldMeta,
    pointer: Pointer<T>,
    unresolved: Option<Option<Uuid>>,
}

impl<T: ObjectClass> PtrField<T> {
    /// Creates an unbound, null field.
    #[inline]
    pub fn new() -> Self {
        Self {
            meta: FieldMeta::new(),
            pointer: Pointer::null(),
            unresolved: None,
        }
    }

    #[inline]
    pub fn get(&self) -> &Pointer<T> {
        &self.pointer
    }

    #[inline]
    pub fn set(&mut self, pointer: Pointer<T>) {
        self.pointer = pointer;
        self.unresolved = None;
    }

    #[inline]
    pub fn clear(&mut self) {
        self.set(Pointer::null());
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.pointer.is_null()
    }

    /// Returns `false` between reading a document and resolving its references.
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.unresolved.is_none()
    }

    fn target(&self) -> Target {
        match self.unresolved {
            Some(uuid) => Target::from(uuid),
            None => self.pointer.target(),
        }
    }
}

impl<T: ObjectClass> Default for PtrField<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ObjectClass> fmt::Debug for PtrField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PtrField")
            .field("keyword", &self.meta.keyword())
            .field("pointer", &self.pointer)
            .finish()
    }
}

impl<T: ObjectClass> FieldHandle for PtrField<T> {
    #[inline]
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    #[inline]
    fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    fn data_type(&self) -> String {
        format!("pointer:{}", T::CLASS_KEYWORD)
    }

    #[inline]
    fn is_vector_field(&self) -> bool {
        false
    }

    fn is_data_equal(&self, other: &dyn FieldHandle) -> bool {
        other
            .downcast_ref::<Self>()
            .is_some_and(|other| self.target() == other.target())
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

impl<T: ObjectClass> FieldIoCapability for PtrField<T> {
    fn serialize_value<'a>(
        &'a self,
        ctx: &'a WriteContext<'a>,
    ) -> Box<dyn erased_serde::Serialize + 'a> {
        Box::new(ReferenceSerializer::new(self.target(), ctx))
    }

    fn deserialize_value<'de>(
        &mut self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
        ctx: &mut ReadContext<'_>,
    ) -> Result<(), erased_serde::Error> {
        let uuid = match Option::<String>::deserialize(deserializer)? {
            Some(text) => Some(ctx.parse_uuid::<erased_serde::Error>(&text)?),
            None => None,
        };
        self.unresolved = Some(uuid);
        Ok(())
    }

    #[inline]
    fn has_unresolved_references(&self) -> bool {
        self.unresolved.is_some()
    }

    fn resolve_references(&mut self, table: &IdentityTable) -> Result<(), ReferenceError> {
        let Some(uuid) = self.unresolved else {
            return Ok(());
        };
        self.pointer = match uuid {
            Some(uuid) => table.resolve::<T>(uuid)?,
            None => Pointer::null(),
        };
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
