use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use pdm_utils::traits::{IsVector, VariantType, is_variant_member};
use serde_core::Serialize;
use serde_core::de::DeserializeOwned;

// -----------------------------------------------------------------------------
// FieldValue

/// A type that can be stored in a [`Field`](crate::field::Field).
///
/// Implemented for the primitive numbers, `bool`, `String` and `Vec`s
/// of field values. Custom types implement it by naming their data type.
pub trait FieldValue:
    Clone + PartialEq + Default + fmt::Debug + Serialize + DeserializeOwned + IsVector + Any
{
    /// A readable name of the type, written by `FieldHandle::data_type`.
    fn data_type() -> Cow<'static, str>;
}

macro_rules! impl_field_value {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                #[inline]
                fn data_type() -> Cow<'static, str> {
                    Cow::Borrowed($name)
                }
            }
        )*
    };
}

impl_field_value!(
    bool => "bool",
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
    f32 => "float",
    f64 => "double",
    String => "string",
);

impl<T: FieldValue> FieldValue for Vec<T> {
    fn data_type() -> Cow<'static, str> {
        Cow::Owned(format!("{}[]", T::data_type()))
    }
}

// -----------------------------------------------------------------------------
// Variant

/// A dynamically typed scalar, the value of a field viewed without its type.
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
}

impl VariantType for Variant {
    type Alternatives = (bool, i32, i64, u32, u64, f32, f64, String);
}

impl Variant {
    /// Wraps `value` if `T` is one of the alternatives, `None` otherwise.
    pub fn from_value<T: Any>(value: &T) -> Option<Self> {
        if !is_variant_member::<T, Self>() {
            return None;
        }

        let any = value as &dyn Any;
        any.downcast_ref::<bool>()
            .map(|v| Self::Bool(*v))
            .or_else(|| any.downcast_ref::<i32>().map(|v| Self::Int32(*v)))
            .or_else(|| any.downcast_ref::<i64>().map(|v| Self::Int64(*v)))
            .or_else(|| any.downcast_ref::<u32>().map(|v| Self::UInt32(*v)))
            .or_else(|| any.downcast_ref::<u64>().map(|v| Self::UInt64(*v)))
            .or_else(|| any.downcast_ref::<f32>().map(|v| Self::Float(*v)))
            .or_else(|| any.downcast_ref::<f64>().map(|v| Self::Double(*v)))
            .or_else(|| any.downcast_ref::<String>().map(|v| Self::String(v.clone())))
    }

    /// The data type name of the held alternative.
    pub fn data_type(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::UInt32(_) => "uint32",
            Self::UInt64(_) => "uint64",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::String(_) => "string",
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
