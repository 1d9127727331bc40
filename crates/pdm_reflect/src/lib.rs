#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod field;
pub mod io;
pub mod object;
pub mod pointer;
pub mod registry;

#[cfg(test)]
mod test_objects;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use field::{ChildArrayField, ChildField, Field, FieldHandle, PtrArrayField, PtrField};
pub use io::{IoError, ObjectIoCapability, ObjectSerializer};
pub use object::{Object, ObjectClass, ObjectHandle};
pub use pointer::{AnyPointer, Pointer};
pub use registry::{ObjectFactory, RegistrationError};
