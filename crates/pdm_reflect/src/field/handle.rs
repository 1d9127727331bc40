use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use crate::field::{FieldMeta, Variant};
use crate::io::FieldIoCapability;
use crate::pointer::AnyPointer;

// -----------------------------------------------------------------------------
// FieldHandle

/// The type-erased view of a field, as seen by its object.
///
/// Objects expose their fields as `&dyn FieldHandle` in declaration
/// order. The IO layer reads and writes values through the
/// [`FieldIoCapability`] supertrait.
pub trait FieldHandle: FieldIoCapability + Any {
    fn meta(&self) -> &FieldMeta;

    fn meta_mut(&mut self) -> &mut FieldMeta;

    /// A readable name of the stored type, e.g. `int32`, `string[]` or
    /// `object[]:Item`.
    fn data_type(&self) -> String;

    /// Returns `true` if the field stores an ordered sequence.
    fn is_vector_field(&self) -> bool;

    /// Appends the objects owned by this field to `out`.
    ///
    /// Only child fields own objects, the default does nothing.
    fn child_objects(&self, out: &mut Vec<AnyPointer>) {
        let _ = out;
    }

    /// The value as a [`Variant`], if the stored type is one of its alternatives.
    fn variant_value(&self) -> Option<Variant> {
        None
    }

    /// Returns `true` if `other` is the same kind of field with equal data.
    fn is_data_equal(&self, other: &dyn FieldHandle) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    #[inline]
    fn keyword(&self) -> &'static str {
        self.meta().keyword()
    }

    #[inline]
    fn is_io_readable(&self) -> bool {
        self.meta().is_io_readable()
    }

    #[inline]
    fn is_io_writable(&self) -> bool {
        self.meta().is_io_writable()
    }
}

impl dyn FieldHandle {
    #[inline]
    pub fn is<F: FieldHandle>(&self) -> bool {
        self.as_any().is::<F>()
    }

    #[inline]
    pub fn downcast_ref<F: FieldHandle>(&self) -> Option<&F> {
        self.as_any().downcast_ref::<F>()
    }

    #[inline]
    pub fn downcast_mut<F: FieldHandle>(&mut self) -> Option<&mut F> {
        self.as_any_mut().downcast_mut::<F>()
    }
}
