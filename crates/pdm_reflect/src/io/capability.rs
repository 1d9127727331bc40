use alloc::boxed::Box;

use crate::io::{IdentityTable, InitError, ReadContext, ReferenceError, WriteContext};

// -----------------------------------------------------------------------------
// ObjectIoCapability

/// Hooks an object class can implement around reading and writing.
///
/// Both methods have empty defaults, `impl ObjectIoCapability for T {}`
/// opts out.
pub trait ObjectIoCapability {
    /// Called once per object after a document has been fully read and
    /// every reference in it resolved. Children are finalized before their
    /// parent, so a parent can rely on finalized children.
    ///
    /// Not called if reading failed.
    fn init_after_read(&mut self) -> Result<(), InitError> {
        Ok(())
    }

    /// Called on every object, children first, before it is written to a
    /// stream or file.
    fn setup_before_save(&mut self) {}
}

// -----------------------------------------------------------------------------
// FieldIoCapability

/// How a field converts its data to and from a document.
///
/// Implemented by every field type, the IO layer drives it through
/// `&dyn FieldHandle`.
pub trait FieldIoCapability {
    /// Returns a serializable view of the field value.
    fn serialize_value<'a>(
        &'a self,
        ctx: &'a WriteContext<'a>,
    ) -> Box<dyn erased_serde::Serialize + 'a>;

    /// Replaces the field value with the one read from `deserializer`.
    ///
    /// Structured failures are reported through `ctx` so they survive the
    /// trip through the data format.
    fn deserialize_value<'de>(
        &mut self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
        ctx: &mut ReadContext<'_>,
    ) -> Result<(), erased_serde::Error>;

    /// Returns `true` if the field holds uuids waiting for
    /// [`resolve_references`](Self::resolve_references).
    fn has_unresolved_references(&self) -> bool {
        false
    }

    /// Turns the uuids read by `deserialize_value` into pointers.
    ///
    /// On failure the pending uuids are kept and the pointers unchanged.
    fn resolve_references(&mut self, table: &IdentityTable) -> Result<(), ReferenceError> {
        let _ = table;
        Ok(())
    }

    /// Drops the uuids of a failed read.
    ///
    /// `deserialize_value` leaves the pointers alone until resolution
    /// succeeds, so the field goes back to the references it held before.
    fn discard_unresolved_references(&mut self) {}
}
