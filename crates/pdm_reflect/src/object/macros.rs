/// Implements [`Object`](crate::object::Object) for a struct.
///
/// The struct must implement [`ObjectClass`](crate::object::ObjectClass)
/// and [`ObjectIoCapability`](crate::io::ObjectIoCapability), and hold its
/// [`ObjectHandle`](crate::object::ObjectHandle) in a member named `handle`.
/// Fields are listed in declaration order, which must match the order
/// they are registered in `ObjectClass::create`.
///
/// # Examples
///
/// ```ignore
/// struct Item {
///     handle: ObjectHandle,
///     name: Field<String>,
///     value: Field<i32>,
/// }
///
/// pdm_reflect::impl_object!(Item { name, value });
/// ```
#[macro_export]
macro_rules! impl_object {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::object::Object for $ty {
            #[inline]
            fn class_keyword(&self) -> &'static str {
                <Self as $crate::object::ObjectClass>::CLASS_KEYWORD
            }

            #[inline]
            fn parent_class_keywords(&self) -> &'static [&'static str] {
                <Self as $crate::object::ObjectClass>::PARENT_CLASS_KEYWORDS
            }

            #[inline]
            fn handle(&self) -> &$crate::object::ObjectHandle {
                &self.handle
            }

            #[inline]
            fn handle_mut(&mut self) -> &mut $crate::object::ObjectHandle {
                &mut self.handle
            }

            #[inline]
            fn field_len(&self) -> usize {
                <[&str]>::len(&[$(::core::stringify!($field)),*])
            }

            fn field_at(&self, index: usize) -> ::core::option::Option<&dyn $crate::field::FieldHandle> {
                let fields: &[&dyn $crate::field::FieldHandle] = &[
                    $(&self.$field as &dyn $crate::field::FieldHandle),*
                ];
                fields.get(index).copied()
            }

            fn field_at_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<&mut dyn $crate::field::FieldHandle> {
                let fields: $crate::__macro_exports::vec::Vec<&mut dyn $crate::field::FieldHandle> =
                    $crate::__macro_exports::vec![
                        $(&mut self.$field as &mut dyn $crate::field::FieldHandle),*
                    ];
                fields.into_iter().nth(index)
            }

            #[inline]
            fn as_any(&self) -> &dyn $crate::__macro_exports::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn $crate::__macro_exports::Any {
                self
            }
        }
    };
}

/// Submits a class for [`ObjectFactory::auto_register`].
///
/// Expands to nothing when the `auto_register` feature is disabled.
///
/// [`ObjectFactory::auto_register`]: crate::registry::ObjectFactory::auto_register
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! auto_register_object {
    ($ty:ty) => {
        $crate::__macro_exports::auto_register::inventory::submit! {
            $crate::__macro_exports::auto_register::__AutoRegisterFunc(
                $crate::__macro_exports::auto_register::__register::<$ty>
            )
        }
    };
}

/// Submits a class for automatic registration.
///
/// Expands to nothing when the `auto_register` feature is disabled.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! auto_register_object {
    ($ty:ty) => {};
}
