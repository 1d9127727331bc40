use crate::traits::{TypeSet, is_one_of};

// -----------------------------------------------------------------------------
// VariantType

/// A closed sum type whose alternatives are listed as a [`TypeSet`].
///
/// Implement this for an enum that mirrors a fixed set of payload types,
/// then use [`is_variant_member`] to decide whether a value type can be
/// carried by it.
///
/// # Examples
///
/// ```
/// use pdm_utils::traits::{VariantType, is_variant_member};
///
/// enum Scalar {
///     Int(i64),
///     Text(String),
/// }
///
/// impl VariantType for Scalar {
///     type Alternatives = (i64, String);
/// }
///
/// assert!(is_variant_member::<i64, Scalar>());
/// assert!(!is_variant_member::<f32, Scalar>());
/// ```
pub trait VariantType {
    /// The payload types carried by the variant.
    type Alternatives: TypeSet;
}

/// Returns `true` if `T` is one of the alternatives of `V`.
#[inline(always)]
pub fn is_variant_member<T: ?Sized + 'static, V: VariantType>() -> bool {
    is_one_of::<T, V::Alternatives>()
}
