use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::field::{FieldHandle, FieldMeta, FieldValue, ValidationError, Validator, Variant};
use crate::io::{FieldIoCapability, IoError, ReadContext, WriteContext};

// -----------------------------------------------------------------------------
// Field

/// A field holding a plain value.
///
/// The default value is set when the field is registered through
/// `ObjectHandle::init_field_with_default`, otherwise it is `T::default()`.
/// Validators run on [`try_set_value`](Field::try_set_value) and on every
/// value read from a document.
pub struct Field<T: FieldValue> {
    meta: FieldMeta,
    value: T,
    default: T,
    validators: Vec<Box<dyn Validator<T>>>,
}

impl<T: FieldValue> Field<T> {
    /// Creates an unbound field holding `T::default()`.
    #[inline]
    pub fn new() -> Self {
        Self {
            meta: FieldMeta::new(),
            value: T::default(),
            default: T::default(),
            validators: Vec::new(),
        }
    }

    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Mutable access to the value, validators are not consulted.
    #[inline]
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Assigns `value` without validation.
    #[inline]
    pub fn set_value(&mut self, value: T) {
        self.value = value;
    }

    /// Assigns `value` if every validator accepts it.
    pub fn try_set_value(&mut self, value: T) -> Result<(), ValidationError> {
        self.validate(&value)?;
        self.value = value;
        Ok(())
    }

    /// Runs the validators against `value`.
    pub fn validate(&self, value: &T) -> Result<(), ValidationError> {
        self.validators.iter().try_for_each(|v| v.validate(value))
    }

    pub fn add_validator(&mut self, validator: impl Validator<T>) {
        self.validators.push(Box::new(validator));
    }

    #[inline]
    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Sets the default and resets the value to it.
    pub(crate) fn set_default(&mut self, default: T) {
        self.value = default.clone();
        self.default = default;
    }

    /// Resets the value to the default.
    #[inline]
    pub fn reset(&mut self) {
        self.value = self.default.clone();
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        self.value == self.default
    }
}

impl<T: FieldValue> Default for Field<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FieldValue> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("keyword", &self.meta.keyword())
            .field("value", &self.value)
            .finish()
    }
}

impl<T: FieldValue> FieldHandle for Field<T> {
    #[inline]
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    #[inline]
    fn meta_mut(&mut self) -> &mut FieldMeta {
        &mut self.meta
    }

    fn data_type(&self) -> String {
        T::data_type().into_owned()
    }

    #[inline]
    fn is_vector_field(&self) -> bool {
        T::IS_VECTOR
    }

    fn variant_value(&self) -> Option<Variant> {
        Variant::from_value(&self.value)
    }

    fn is_data_equal(&self, other: &dyn FieldHandle) -> bool {
        other
            .downcast_ref::<Self>()
            .is_some_and(|other| self.value == other.value)
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

impl<T: FieldValue> FieldIoCapability for Field<T> {
    fn serialize_value<'a>(
        &'a self,
        _ctx: &'a WriteContext<'a>,
    ) -> Box<dyn erased_serde::Serialize + 'a> {
        Box::new(&self.value)
    }

    fn deserialize_value<'de>(
        &mut self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
        ctx: &mut ReadContext<'_>,
    ) -> Result<(), erased_serde::Error> {
        let value = T::deserialize(deserializer)?;
        if let Err(source) = self.validate(&value) {
            let path = ctx.path();
            return Err(ctx.fail(IoError::Validation { path, source }));
        }
        self.value = value;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
