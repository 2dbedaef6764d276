use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;

use super::trait_typed::type_info_suffix;
use super::{get_auto_register_impl, impl_trait_reflect, impl_trait_type_path, impl_trait_typed};

use crate::derive_data::ReflectEnum;

/// Implement full reflect for a unit-variant enum.
pub(crate) fn impl_enum(info: &ReflectEnum) -> TokenStream {
    let meta = &info.meta;
    let od_reflect = meta.od_reflect_path();
    let info_ = crate::path::info_(od_reflect);
    let ops_ = crate::path::ops_(od_reflect);
    let reflect_ = crate::path::reflect_(od_reflect);
    let box_ = crate::path::box_(od_reflect);
    let option_ = crate::path::option_();

    let ident = meta.ident();
    let variants: Vec<_> = info.variants.iter().map(|v| v.ident).collect();
    let names: Vec<_> = variants.iter().map(|v| v.unraw().to_string()).collect();
    let indices = 0..variants.len();
    let variant_docs = info.variants.iter().map(|v| v.docs.with_docs_tokens());

    let suffix = type_info_suffix(meta);
    let type_info_tokens = quote! {
        #info_::TypeInfo::new::<Self>(#info_::TypeKind::Enum(
            #info_::EnumInfo::new(|name: &str| match name {
                #(#names => #option_::Some(#box_::new(#ident::#variants) as #box_<dyn #reflect_>),)*
                _ => #option_::None,
            })
            #(.with_variant(#info_::VariantInfo::new(#names) #variant_docs))*
        ))
        #suffix
    };

    let type_path_trait_tokens = impl_trait_type_path(meta);
    let typed_trait_tokens = impl_trait_typed(meta, type_info_tokens, &[]);
    let reflect_trait_tokens = impl_trait_reflect(
        meta,
        quote!(Enum),
        quote! {
            #option_::Some(#box_::new(match self {
                #(Self::#variants => Self::#variants,)*
            }) as #box_<dyn #reflect_>)
        },
    );
    let auto_register_tokens = get_auto_register_impl(meta);

    quote! {
        #type_path_trait_tokens

        #typed_trait_tokens

        impl #ops_::Enum for #ident {
            fn variant_name(&self) -> &'static str {
                match self {
                    #(Self::#variants => #names,)*
                }
            }

            fn variant_index(&self) -> usize {
                match self {
                    #(Self::#variants => #indices,)*
                }
            }
        }

        #reflect_trait_tokens

        #auto_register_tokens
    }
}
