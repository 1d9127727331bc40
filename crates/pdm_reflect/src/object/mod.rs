//! Objects: typed field containers with a class keyword and a uuid.
//!
//! An object is a plain struct that holds an [`ObjectHandle`] plus any
//! number of fields. The handle records the class keyword, the identity
//! used by pointers, and the keyword of every field in registration order.
//!
//! Implementing a class takes three pieces:
//!
//! - [`ObjectClass`]: the class keyword and a constructor that registers
//!   every field on the handle.
//! - [`ObjectIoCapability`](crate::io::ObjectIoCapability): optional
//!   hooks around reading and writing.
//! - [`impl_object!`](crate::impl_object): generates the [`Object`]
//!   implementation from the list of fields, in declaration order.

// -----------------------------------------------------------------------------
// Modules

mod class;
mod handle;
mod macros;
mod object;

// -----------------------------------------------------------------------------
// Exports

pub use class::ObjectClass;
pub use handle::ObjectHandle;
pub use object::{Object, objects_data_equal};
