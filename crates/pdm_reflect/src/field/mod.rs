//! Typed fields and the type-erased [`FieldHandle`] view over them.
//!
//! | Field                 | Holds                         | Persisted as            |
//! |-----------------------|-------------------------------|-------------------------|
//! | [`Field<T>`]          | a [`FieldValue`]              | the value               |
//! | [`ChildField<T>`]     | zero or one owned object      | an object or `null`     |
//! | [`ChildArrayField<T>`]| an ordered list of objects    | a sequence of objects   |
//! | [`PtrField<T>`]       | a weak reference              | a uuid or `null`        |
//! | [`PtrArrayField<T>`]  | an ordered list of references | a sequence of the above |
//!
//! Every field carries a [`FieldMeta`] with its keyword and IO flags. The
//! keyword is assigned once by `ObjectHandle::init_field`.

// -----------------------------------------------------------------------------
// Modules

mod child_array;
mod child_field;
mod data_field;
mod error;
mod handle;
mod meta;
mod ptr_array;
mod ptr_field;
mod validator;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use child_array::ChildArrayField;
pub use child_field::ChildField;
pub use data_field::Field;
pub use error::ArrayError;
pub use handle::FieldHandle;
pub use meta::{FieldMeta, IoFlags};
pub use ptr_array::PtrArrayField;
pub use ptr_field::PtrField;
pub use validator::{RangeValidator, ValidationError, Validator};
pub use value::{FieldValue, Variant};
