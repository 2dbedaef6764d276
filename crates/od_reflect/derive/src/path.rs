//! Paths of the `od_reflect` items referenced by generated code.
//!
//! Kept in one place so that moving an item only touches this module.

use proc_macro2::TokenStream;
use quote::quote;

/// The path under which the calling crate reaches `od_reflect`.
///
/// Either `::od_reflect` or `::objdoc::reflect`, see
/// [`Manifest::get_crate_path`](od_macro_utils::Manifest::get_crate_path).
/// Reading the manifest is not free, so the result is passed around rather
/// than queried again.
pub(crate) fn od_reflect() -> syn::Path {
    od_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("od_reflect"))
}

// -----------------------------------------------------------------------------
// Std

pub(crate) fn option_() -> TokenStream {
    quote!(::core::option::Option)
}

pub(crate) fn result_() -> TokenStream {
    quote!(::core::result::Result)
}

pub(crate) fn default_() -> TokenStream {
    quote!(::core::default::Default)
}

pub(crate) fn clone_() -> TokenStream {
    quote!(::core::clone::Clone)
}

pub(crate) fn box_(od_reflect: &syn::Path) -> TokenStream {
    quote!(#od_reflect::__macro_exports::alloc_utils::Box)
}

// -----------------------------------------------------------------------------
// Reflection

pub(crate) fn reflect_(od_reflect: &syn::Path) -> TokenStream {
    quote!(#od_reflect::Reflect)
}

pub(crate) fn type_path_(od_reflect: &syn::Path) -> TokenStream {
    quote!(#od_reflect::info::TypePath)
}

pub(crate) fn typed_(od_reflect: &syn::Path) -> TokenStream {
    quote!(#od_reflect::info::Typed)
}

pub(crate) fn info_(od_reflect: &syn::Path) -> TokenStream {
    quote!(#od_reflect::info)
}

pub(crate) fn ops_(od_reflect: &syn::Path) -> TokenStream {
    quote!(#od_reflect::ops)
}

pub(crate) fn impls_(od_reflect: &syn::Path) -> TokenStream {
    quote!(#od_reflect::impls)
}

pub(crate) fn type_registry_(od_reflect: &syn::Path) -> TokenStream {
    quote!(#od_reflect::registry::TypeRegistry)
}

#[cfg(feature = "auto_register")]
pub(crate) fn auto_register_(od_reflect: &syn::Path) -> TokenStream {
    quote!(#od_reflect::__macro_exports::auto_register)
}
