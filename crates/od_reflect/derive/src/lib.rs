//! Derive macro of `od_reflect`, see [`Reflect`].
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;
mod utils;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection Derivation
///
/// `#[derive(Reflect)]` implements the following traits:
///
/// - `TypePath`
/// - `Typed`
/// - `Reflect`
/// - `Struct` (for `struct T { ... }`)
/// - `Enum` (for `enum T { A, B }`)
///
/// Only structs with named fields and enums made of unit variants are supported.
/// Type parameters are allowed on structs and must themselves be `Typed`.
///
/// ## Type Attributes
///
/// ```rust, ignore
/// #[derive(Reflect, Default, Clone)]
/// #[reflect(default, clone, auto_register)]
/// #[reflect(type_path = "game::Player", base = Actor)]
/// #[reflect(property(name = "speed", ty = f32, get = speed, set = set_speed))]
/// struct Player { /* ... */ }
/// ```
///
/// - `default`: the type implements `Default`, used as the default instance
///   when a document is turned into a new value.
/// - `clone`: the type implements `Clone`, used by `reflect_clone`. Without it
///   the value is cloned field by field.
/// - `auto_register`: submit the type to the global registration list, see
///   `od_reflect::registry::TypeRegistry::auto_register`. Ignored for generic types.
/// - `type_path = ".."`: override the `module_path!()` based path. Generics are
///   appended automatically.
/// - `base = T`: declare the conceptual base type. Documents naming this type
///   are accepted where a `T` is expected.
/// - `property(..)`: an accessor based member. `get` is a `fn(&self) -> ty`,
///   `set` a `fn(&mut self, ty)`, at least one is required. A bare name refers
///   to an associated function of the type.
/// - `doc = ".."`: replace the documentation collected from `///` comments.
///
/// ## Field Attributes
///
/// - `skip`: hide the field from reflection. It must implement `Default`.
/// - `readonly`: serialize the field but refuse to assign it.
/// - `doc = ".."`: as above.
///
/// Only `pub` fields are public members, see `AccessFlags`.
///
/// ## Variant Attributes
///
/// - `doc = ".."`: as above.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let derive_data = match derive_data::ReflectDerive::from_input(&ast) {
        Ok(data) => data,
        Err(err) => return err.into_compile_error().into(),
    };

    match derive_data {
        derive_data::ReflectDerive::Struct(info) => impls::impl_struct(&info),
        derive_data::ReflectDerive::Enum(info) => impls::impl_enum(&info),
    }
    .into()
}
