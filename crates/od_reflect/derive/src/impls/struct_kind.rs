use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;

use super::trait_typed::type_info_suffix;
use super::{get_auto_register_impl, impl_trait_reflect, impl_trait_type_path, impl_trait_typed};

use crate::derive_data::{ReflectStruct, StructField};

/// Implement full reflect for struct type.
pub(crate) fn impl_struct(info: &ReflectStruct) -> TokenStream {
    let meta = &info.meta;

    let type_path_trait_tokens = impl_trait_type_path(meta);
    let typed_trait_tokens = impl_trait_typed(meta, struct_info_tokens(info), &dependencies(info));
    let struct_trait_tokens = impl_trait_struct(info);
    let reflect_trait_tokens = impl_trait_reflect(meta, quote!(Struct), struct_clone_tokens(info));
    let auto_register_tokens = get_auto_register_impl(meta);

    quote! {
        #type_path_trait_tokens

        #typed_trait_tokens

        #struct_trait_tokens

        #reflect_trait_tokens

        #auto_register_tokens
    }
}

fn field_name(field: &StructField) -> String {
    field.ident.unraw().to_string()
}

/// Call tokens of a property accessor: `Self::get(self)` for a bare name.
fn accessor(path: &syn::Path) -> TokenStream {
    if path.segments.len() == 1 && path.leading_colon.is_none() {
        quote!(Self::#path)
    } else {
        quote!(#path)
    }
}

/// The `TypeInfo` expression.
fn struct_info_tokens(info: &ReflectStruct) -> TokenStream {
    let meta = &info.meta;
    let info_ = crate::path::info_(meta.od_reflect_path());

    let fields = info.active_fields().map(|field| {
        let name = field_name(field);
        let ty = field.ty;
        let public = field.public;
        let readonly = field.attrs.readonly.map(|_| quote!(.readonly()));
        let docs = field.docs.with_docs_tokens();
        quote! {
            .with_field(
                #info_::FieldInfo::new::<#ty>(#name).with_public(#public) #readonly #docs
            )
        }
    });

    let properties = meta.attrs().properties.iter().map(|property| {
        let name = &property.name;
        let ty = &property.ty;
        let readable = property.get.is_some();
        let writable = property.set.is_some();
        let docs = property.docs.with_docs_tokens();
        quote! {
            .with_property(
                #info_::PropertyInfo::new::<#ty>(#name, #readable, #writable) #docs
            )
        }
    });

    let suffix = type_info_suffix(meta);

    quote! {
        #info_::TypeInfo::new::<Self>(#info_::TypeKind::Struct(
            #info_::StructInfo::new()
                #(#fields)*
                #(#properties)*
        ))
        #suffix
    }
}

fn dependencies(info: &ReflectStruct) -> Vec<TokenStream> {
    let fields = info.active_fields().map(|field| {
        let ty = field.ty;
        quote!(#ty)
    });
    let properties = info.meta.attrs().properties.iter().map(|property| {
        let ty = &property.ty;
        quote!(#ty)
    });
    fields.chain(properties).collect()
}

/// Generate `Struct` trait implementation tokens.
fn impl_trait_struct(info: &ReflectStruct) -> TokenStream {
    let meta = &info.meta;
    let od_reflect = meta.od_reflect_path();
    let ops_ = crate::path::ops_(od_reflect);
    let reflect_ = crate::path::reflect_(od_reflect);
    let box_ = crate::path::box_(od_reflect);
    let option_ = crate::path::option_();
    let result_ = crate::path::result_();

    let field_names: Vec<_> = info.active_fields().map(field_name).collect();
    let field_idents: Vec<_> = info.active_fields().map(|field| field.ident).collect();

    let properties = &meta.attrs().properties;
    let getters = properties.iter().filter_map(|property| {
        let name = &property.name;
        let get = accessor(property.get.as_ref()?);
        Some(quote! {
            #name => #option_::Some(#box_::new(#get(self)) as #box_<dyn #reflect_>),
        })
    });
    let setters = properties.iter().filter_map(|property| {
        let name = &property.name;
        let ty = &property.ty;
        let set = accessor(property.set.as_ref()?);
        Some(quote! {
            #name => {
                let value = value.take::<#ty>()?;
                #set(self, value);
                #result_::Ok(())
            }
        })
    });

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #ops_::Struct for #ident #ty_generics #where_clause {
            fn field(&self, name: &str) -> #option_<&dyn #reflect_> {
                match name {
                    #(#field_names => #option_::Some(&self.#field_idents),)*
                    _ => #option_::None,
                }
            }

            fn field_mut(&mut self, name: &str) -> #option_<&mut dyn #reflect_> {
                match name {
                    #(#field_names => #option_::Some(&mut self.#field_idents),)*
                    _ => #option_::None,
                }
            }

            fn property(&self, name: &str) -> #option_<#box_<dyn #reflect_>> {
                match name {
                    #(#getters)*
                    _ => #option_::None,
                }
            }

            fn set_property(
                &mut self,
                name: &str,
                value: #box_<dyn #reflect_>,
            ) -> #result_<(), #box_<dyn #reflect_>> {
                match name {
                    #(#setters)*
                    _ => #result_::Err(value),
                }
            }
        }
    }
}

/// Generate the body of `Reflect::reflect_clone`.
///
/// Uses `Clone` when declared, otherwise clones field by field and fills
/// skipped fields with `Default`.
fn struct_clone_tokens(info: &ReflectStruct) -> TokenStream {
    let meta = &info.meta;
    let od_reflect = meta.od_reflect_path();
    let reflect_ = crate::path::reflect_(od_reflect);
    let box_ = crate::path::box_(od_reflect);
    let option_ = crate::path::option_();

    if let Some(span) = meta.attrs().avail_traits.clone {
        let clone_ = crate::path::clone_();
        return quote::quote_spanned! { span =>
            #option_::Some(#box_::new(<Self as #clone_>::clone(self)) as #box_<dyn #reflect_>)
        };
    }

    let default_ = crate::path::default_();
    let fields = info.fields.iter().map(|field| {
        let ident = field.ident;
        let ty = field.ty;
        if field.attrs.skip.is_some() {
            quote!(#ident: <#ty as #default_>::default(),)
        } else {
            quote! {
                #ident: <#ty as #reflect_>::reflect_clone(&self.#ident)?.take::<#ty>().ok()?,
            }
        }
    });

    quote! {
        #option_::Some(#box_::new(Self {
            #(#fields)*
        }) as #box_<dyn #reflect_>)
    }
}
