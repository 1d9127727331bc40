//! Non-owning references between objects.
//!
//! Objects held by child fields live behind an `Rc<RefCell<_>>` whose only
//! strong owner is that field. Everything else refers to them through weak
//! pointers:
//!
//! - [`Pointer<T>`]: a typed weak reference, stored by `PtrField` and `PtrArrayField`.
//! - [`AnyPointer`]: a type-erased weak reference, produced by object traversal
//!   and stored in the identity table while a document is being read.
//!
//! A pointer never keeps its referent alive. After the owning field drops
//! the object, every pointer to it reports [`Pointer::is_null`].

// -----------------------------------------------------------------------------
// Modules

mod any_pointer;
mod pointer;

// -----------------------------------------------------------------------------
// Exports

pub use any_pointer::AnyPointer;
pub use pointer::Pointer;
pub(crate) use pointer::Target;
