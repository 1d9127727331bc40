//! Reading and writing object graphs through `serde`.
//!
//! ## Document layout
//!
//! Every object is written as a struct named `Object` with three entries:
//!
//! ```text
//! {
//!   "class": "Container",
//!   "uuid": "5b3c1d1e-8a36-4c5e-9a0c-3f1f57d2a9b4",
//!   "fields": { "name": "root", "items": [ { "class": "Item", ... } ], "refs": [ "...", null ] }
//! }
//! ```
//!
//! Field entries follow declaration order. Child fields nest whole objects,
//! pointer fields hold the uuid of their referent or `null`.
//!
//! ## Reading
//!
//! Reading runs in the phases of [`ReadPhase`]: the header and fields of
//! every object are parsed first, each object created along the way is
//! entered in an identity table. References are then resolved against the
//! table, which makes forward references work. Finally
//! [`ObjectIoCapability::init_after_read`] runs on every object, children
//! first. Nothing is finalized if an earlier phase fails.
//!
//! [`ObjectSerializer`] is the entry point.

// -----------------------------------------------------------------------------
// Modules

mod capability;
mod context;
mod de;
mod error;
mod name;
mod path;
mod ser;
mod serializer;
mod walk;

// -----------------------------------------------------------------------------
// Internal exports

pub(crate) use de::{ChildOptionVisitor, ChildSeqVisitor};
pub(crate) use ser::{ChildSerializer, ChildrenSerializer, ReferenceSerializer, ReferencesSerializer};

// -----------------------------------------------------------------------------
// Exports

pub use capability::{FieldIoCapability, ObjectIoCapability};
pub use context::{FieldSelector, IdentityTable, ReadContext, ReadPhase, WriteContext};
pub use error::{ErrorKind, InitError, IoError, ReferenceError};
pub use name::is_valid_element_name;
pub use path::{ObjectPath, PathSegment};
pub use serializer::ObjectSerializer;
pub use walk::{init_after_read_recursively, resolve_references_recursively, setup_before_save_recursively};
