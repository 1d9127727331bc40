//! Items used by the exported macros. Not part of the public API.

pub use alloc::vec;
pub use core::any::Any;

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::object::ObjectClass;
    use crate::registry::ObjectFactory;

    /// A registration callback collected by `inventory`.
    pub struct __AutoRegisterFunc(pub fn(&mut ObjectFactory));

    inventory::collect!(__AutoRegisterFunc);

    /// Registers `T`, ignoring classes that are already present.
    pub fn __register<T: ObjectClass>(factory: &mut ObjectFactory) {
        if let Err(e) = factory.register::<T>() {
            log::warn!("auto registration of `{}` skipped: {e}", T::CLASS_KEYWORD);
        }
    }

    // Marks the factory as auto registered, which tells callers that the
    // platform supports `inventory`.
    fn __mark_available(factory: &mut ObjectFactory) {
        factory.mark_auto_registered();
    }

    inventory::submit! {
        __AutoRegisterFunc(__mark_available)
    }

    pub(crate) fn __register_classes(factory: &mut ObjectFactory) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(factory);
        }
    }
}
