use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;

/// Generate implementation code for `Typed`.
///
/// `type_info_tokens` builds the `TypeInfo`, `dependencies` lists the types
/// registered along with this one.
pub(crate) fn impl_trait_typed(
    meta: &ReflectMeta,
    type_info_tokens: TokenStream,
    dependencies: &[TokenStream],
) -> TokenStream {
    let od_reflect = meta.od_reflect_path();
    let typed_ = crate::path::typed_(od_reflect);
    let info_ = crate::path::info_(od_reflect);
    let impls_ = crate::path::impls_(od_reflect);
    let type_registry_ = crate::path::type_registry_(od_reflect);

    let inner_cell_tokens = if meta.impl_with_generic() {
        quote! {
            static CELL: #impls_::GenericTypeInfoCell = #impls_::GenericTypeInfoCell::new();
            CELL.get_or_insert::<Self>(|| {
                #type_info_tokens
            })
        }
    } else {
        quote! {
            static CELL: #impls_::NonGenericTypeInfoCell = #impls_::NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                #type_info_tokens
            })
        }
    };

    let register_dependencies = if dependencies.is_empty() {
        crate::utils::empty()
    } else {
        quote! {
            fn register_dependencies(__registry: &mut #type_registry_) {
                #(#type_registry_::register::<#dependencies>(__registry);)*
            }
        }
    };

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #typed_ for #ident #ty_generics #where_clause {
            fn type_info() -> &'static #info_::TypeInfo {
                #inner_cell_tokens
            }

            #register_dependencies
        }
    }
}

/// The builder methods shared by every kind: base, default and docs.
pub(crate) fn type_info_suffix(meta: &ReflectMeta) -> TokenStream {
    let od_reflect = meta.od_reflect_path();
    let box_ = crate::path::box_(od_reflect);
    let reflect_ = crate::path::reflect_(od_reflect);
    let default_ = crate::path::default_();

    let base = match &meta.attrs().base {
        Some(base) => quote!(.with_base::<#base>()),
        None => crate::utils::empty(),
    };
    let default = match meta.attrs().avail_traits.default {
        Some(span) => quote::quote_spanned! { span =>
            .with_default(|| #box_::new(<Self as #default_>::default()) as #box_<dyn #reflect_>)
        },
        None => crate::utils::empty(),
    };
    let docs = meta.docs().with_docs_tokens();

    quote!(#base #default #docs)
}
