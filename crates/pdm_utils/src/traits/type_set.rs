use core::any::TypeId;

// -----------------------------------------------------------------------------
// TypeSet

/// A closed set of types, expressed as a tuple.
///
/// Implemented for `()` and tuples of up to 12 elements.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use pdm_utils::traits::TypeSet;
///
/// type Numbers = (i32, u64, f64);
///
/// assert_eq!(<Numbers as TypeSet>::LEN, 3);
/// assert!(<Numbers as TypeSet>::contains(TypeId::of::<u64>()));
/// assert!(!<Numbers as TypeSet>::contains(TypeId::of::<String>()));
/// ```
pub trait TypeSet: 'static {
    /// Number of alternatives in the set.
    const LEN: usize;

    /// Returns `true` if the set contains the type with the given [`TypeId`].
    fn contains(type_id: TypeId) -> bool;
}

impl TypeSet for () {
    const LEN: usize = 0;

    #[inline(always)]
    fn contains(_: TypeId) -> bool {
        false
    }
}

macro_rules! impl_type_set {
    ($len:literal => $($T:ident),+) => {
        impl<$($T: 'static),+> TypeSet for ($($T,)+) {
            const LEN: usize = $len;

            #[inline]
            fn contains(type_id: TypeId) -> bool {
                $(type_id == TypeId::of::<$T>())||+
            }
        }
    };
}

impl_type_set!(1 => A);
impl_type_set!(2 => A, B);
impl_type_set!(3 => A, B, C);
impl_type_set!(4 => A, B, C, D);
impl_type_set!(5 => A, B, C, D, E);
impl_type_set!(6 => A, B, C, D, E, F);
impl_type_set!(7 => A, B, C, D, E, F, G);
impl_type_set!(8 => A, B, C, D, E, F, G, H);
impl_type_set!(9 => A, B, C, D, E, F, G, H, I);
impl_type_set!(10 => A, B, C, D, E, F, G, H, I, J);
impl_type_set!(11 => A, B, C, D, E, F, G, H, I, J, K);
impl_type_set!(12 => A, B, C, D, E, F, G, H, I, J, K, L);

// -----------------------------------------------------------------------------
// is_one_of

/// Returns `true` if `T` is one of the types in `S`.
///
/// # Examples
///
/// ```
/// use pdm_utils::traits::is_one_of;
///
/// assert!(is_one_of::<f32, (f32, f64)>());
/// assert!(!is_one_of::<i32, (f32, f64)>());
/// assert!(!is_one_of::<i32, ()>());
/// ```
#[inline(always)]
pub fn is_one_of<T: ?Sized + 'static, S: TypeSet>() -> bool {
    S::contains(TypeId::of::<T>())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{TypeSet, is_one_of};
    use alloc::string::String;
    use alloc::vec::Vec;

    #[test]
    fn membership() {
        type Scalars = (bool, i32, i64, f64, String);

        assert_eq!(<Scalars as TypeSet>::LEN, 5);
        assert!(is_one_of::<bool, Scalars>());
        assert!(is_one_of::<String, Scalars>());
        assert!(!is_one_of::<u8, Scalars>());
        assert!(!is_one_of::<Vec<i32>, Scalars>());
        assert!(!is_one_of::<str, Scalars>());
    }

    #[test]
    fn empty_set() {
        assert_eq!(<() as TypeSet>::LEN, 0);
        assert!(!is_one_of::<(), ()>());
    }
}
