use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;

/// Generate implementation codes for `TypePath`.
///
/// Generic types append the paths of their type parameters, cached in a
/// `GenericTypePathCell`.
pub(crate) fn impl_trait_type_path(meta: &ReflectMeta) -> TokenStream {
    let od_reflect = meta.od_reflect_path();
    let type_path_ = crate::path::type_path_(od_reflect);
    let impls_ = crate::path::impls_(od_reflect);

    let ident = meta.ident();
    let base_path = meta.base_path();
    let type_ident = meta.type_ident();
    let module_path = meta.module_path();

    let (type_path, type_name) = if meta.impl_with_generic() {
        let params: Vec<_> = meta.type_params().collect();
        let path_parts = params.iter().enumerate().map(|(index, param)| {
            let separator = if index == 0 { "<" } else { ", " };
            quote!(#separator, <#param as #type_path_>::type_path())
        });
        let name_parts = params.iter().enumerate().map(|(index, param)| {
            let separator = if index == 0 { "<" } else { ", " };
            quote!(#separator, <#param as #type_path_>::type_name())
        });
        (
            quote! {
                static CELL: #impls_::GenericTypePathCell = #impls_::GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| #impls_::concat(&[#base_path, #(#path_parts,)* ">"]))
            },
            quote! {
                static CELL: #impls_::GenericTypePathCell = #impls_::GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| #impls_::concat(&[#type_ident, #(#name_parts,)* ">"]))
            },
        )
    } else {
        (quote!(#base_path), quote!(#type_ident))
    };

    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #type_path_ for #ident #ty_generics #where_clause {
            fn type_path() -> &'static str {
                #type_path
            }

            fn type_name() -> &'static str {
                #type_name
            }

            #[inline]
            fn type_ident() -> &'static str {
                #type_ident
            }

            #[inline]
            fn module_path() -> ::core::option::Option<&'static str> {
                #module_path
            }
        }
    }
}
