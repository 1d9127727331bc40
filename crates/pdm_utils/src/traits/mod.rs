//! Compile-time type predicates.
//!
//! These answer questions like "is `T` one of `{A, B, C}`?" or
//! "is `T` a sequence container?" without inspecting values at runtime.
//! Every predicate is monomorphised per type, so the answers fold into
//! constants after optimisation.
//!
//! - [`is_one_of`]: membership of `T` in a closed [`TypeSet`].
//! - [`is_variant_member`]: membership of `T` in the alternatives of a [`VariantType`].
//! - [`is_vector`] / [`is_std_vector`]: whether `T` is backed by a sequence container.

// -----------------------------------------------------------------------------
// Modules

mod type_set;
mod variant;
mod vector;

// -----------------------------------------------------------------------------
// Exports

pub use type_set::{TypeSet, is_one_of};
pub use variant::{VariantType, is_variant_member};
pub use vector::{IsVector, is_std_vector, is_vector};
