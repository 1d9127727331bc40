use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// IsVector

/// Compile-time classification of sequence containers.
///
/// - `IS_VECTOR`: the type is an ordered sequence of elements.
/// - `IS_STD_VECTOR`: the type is exactly a [`Vec`].
///
/// Both default to `false`, so scalar types opt in with an empty impl.
///
/// # Examples
///
/// ```
/// use pdm_utils::traits::{IsVector, is_std_vector, is_vector};
///
/// #[derive(Clone, Copy)]
/// enum Shape { Circle, Square }
///
/// impl IsVector for Shape {}
///
/// assert!(!is_vector::<Shape>());
/// assert!(is_vector::<Vec<Shape>>());
/// assert!(is_std_vector::<Vec<Shape>>());
/// assert!(is_vector::<[Shape; 2]>());
/// assert!(!is_std_vector::<[Shape; 2]>());
/// ```
pub trait IsVector {
    /// The type is an ordered sequence container.
    const IS_VECTOR: bool = false;
    /// The type is a [`Vec`].
    const IS_STD_VECTOR: bool = false;
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(impl IsVector for $ty {})*
    };
}

impl_scalar!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
);

impl<T> IsVector for Option<T> {}

impl<T> IsVector for Vec<T> {
    const IS_VECTOR: bool = true;
    const IS_STD_VECTOR: bool = true;
}

impl<T> IsVector for VecDeque<T> {
    const IS_VECTOR: bool = true;
}

impl<T> IsVector for Box<[T]> {
    const IS_VECTOR: bool = true;
}

impl<T, const N: usize> IsVector for [T; N] {
    const IS_VECTOR: bool = true;
}

/// Returns `true` if `T` is an ordered sequence container.
#[inline(always)]
pub const fn is_vector<T: ?Sized + IsVector>() -> bool {
    T::IS_VECTOR
}

/// Returns `true` if `T` is a [`Vec`].
#[inline(always)]
pub const fn is_std_vector<T: ?Sized + IsVector>() -> bool {
    T::IS_STD_VECTOR
}

// -----------------------------------------------------------------------------
// Tests
