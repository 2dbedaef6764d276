//! Items referenced by code generated with `#[derive(Reflect)]`.
//!
//! Not public API.

pub mod alloc_utils {
    pub use ::alloc::boxed::Box;
    pub use ::alloc::vec::Vec;
}

#[cfg(feature = "auto_register")]
pub mod auto_register {
    use crate::info::Typed;
    use crate::registry::TypeRegistry;

    pub use inventory;

    /// A registration function submitted by a `#[reflect(auto_register)]` type.
    pub struct AutoRegisterFn(pub fn(&mut TypeRegistry));

    inventory::collect!(AutoRegisterFn);

    /// Registers `T`; the function pointer submitted for every annotated type.
    pub fn register<T: Typed>(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }

    /// Runs every submitted registration function.
    pub fn register_types(registry: &mut TypeRegistry) {
        for entry in inventory::iter::<AutoRegisterFn> {
            (entry.0)(registry);
        }
    }
}
