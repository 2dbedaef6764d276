use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;

/// Generate implementation code for `Reflect`.
///
/// `kind` names the `ReflectRef`/`ReflectMut` variant, `reflect_clone_tokens`
/// is the body of `reflect_clone`.
pub(crate) fn impl_trait_reflect(
    meta: &ReflectMeta,
    kind: TokenStream,
    reflect_clone_tokens: TokenStream,
) -> TokenStream {
    let od_reflect = meta.od_reflect_path();
    let reflect_ = crate::path::reflect_(od_reflect);
    let typed_ = crate::path::typed_(od_reflect);
    let info_ = crate::path::info_(od_reflect);
    let ops_ = crate::path::ops_(od_reflect);
    let box_ = crate::path::box_(od_reflect);
    let option_ = crate::path::option_();
    let result_ = crate::path::result_();

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #reflect_ for #ident #ty_generics #where_clause {
            #[inline]
            fn reflect_type_info(&self) -> &'static #info_::TypeInfo {
                <Self as #typed_>::type_info()
            }

            #[inline]
            fn reflect_ref(&self) -> #ops_::ReflectRef<'_> {
                #ops_::ReflectRef::#kind(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #ops_::ReflectMut<'_> {
                #ops_::ReflectMut::#kind(self)
            }

            fn set(
                &mut self,
                value: #box_<dyn #reflect_>,
            ) -> #result_<(), #box_<dyn #reflect_>> {
                *self = value.take::<Self>()?;
                #result_::Ok(())
            }

            fn reflect_clone(&self) -> #option_<#box_<dyn #reflect_>> {
                #reflect_clone_tokens
            }
        }
    }
}
