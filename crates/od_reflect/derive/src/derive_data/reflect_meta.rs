use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, GenericParam, Generics, Ident, Type, Visibility};

use crate::REFLECT_ATTRIBUTE_NAME;
use crate::derive_data::{FieldAttributes, ReflectDocs, TypeAttributes};

// -----------------------------------------------------------------------------
// ReflectMeta

/// Data shared by every kind of derived type.
pub(crate) struct ReflectMeta<'a> {
    ident: &'a Ident,
    generics: &'a Generics,
    attrs: TypeAttributes,
    docs: ReflectDocs,
    od_reflect: syn::Path,
}

impl<'a> ReflectMeta<'a> {
    #[inline]
    pub(crate) fn ident(&self) -> &'a Ident {
        self.ident
    }

    #[inline]
    pub(crate) fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub(crate) fn docs(&self) -> &ReflectDocs {
        &self.docs
    }

    /// Path to `od_reflect` from the calling crate.
    #[inline]
    pub(crate) fn od_reflect_path(&self) -> &syn::Path {
        &self.od_reflect
    }

    #[inline]
    pub(crate) fn impl_with_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }

    /// The type parameters, in declaration order.
    pub(crate) fn type_params(&self) -> impl Iterator<Item = &'a Ident> {
        self.generics.type_params().map(|param| &param.ident)
    }

    /// Generics of the impl blocks, every type parameter bounded by `Typed`.
    pub(crate) fn split_generics(&self) -> (TokenStream, TokenStream, TokenStream) {
        let typed_ = crate::path::typed_(&self.od_reflect);
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        let params = self.type_params();
        let predicates = where_clause.map(|w| &w.predicates);
        let where_tokens = if self.impl_with_generic() {
            quote! {
                where
                    #(#params: #typed_,)*
                    #predicates
            }
        } else {
            quote!(#where_clause)
        };

        (quote!(#impl_generics), quote!(#ty_generics), where_tokens)
    }

    /// A string expression of the base path, without generics.
    ///
    /// `type_path = ".."` when given, `module_path!()::Ident` otherwise.
    pub(crate) fn base_path(&self) -> TokenStream {
        match &self.attrs.type_path {
            Some(path) => quote!(#path),
            None => {
                let ident = self.ident.to_string();
                quote!(::core::concat!(::core::module_path!(), "::", #ident))
            }
        }
    }

    /// A string expression of the module, `None` for a custom path without `::`.
    pub(crate) fn module_path(&self) -> TokenStream {
        let option_ = crate::path::option_();
        match &self.attrs.type_path {
            Some(path) => match path.value().rsplit_once("::") {
                Some((module, _)) => quote!(#option_::Some(#module)),
                None => quote!(#option_::None),
            },
            None => quote!(#option_::Some(::core::module_path!())),
        }
    }

    /// The short identifier, the last segment of a custom path.
    pub(crate) fn type_ident(&self) -> String {
        match &self.attrs.type_path {
            Some(path) => {
                let value = path.value();
                value.rsplit("::").next().unwrap_or(&value).to_owned()
            }
            None => self.ident.to_string(),
        }
    }
}

// -----------------------------------------------------------------------------
// Struct

/// A named field of a derived struct.
pub(crate) struct StructField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub public: bool,
    pub attrs: FieldAttributes,
    pub docs: ReflectDocs,
}

pub(crate) struct ReflectStruct<'a> {
    pub meta: ReflectMeta<'a>,
    pub fields: Vec<StructField<'a>>,
}

impl ReflectStruct<'_> {
    /// Fields visible to reflection.
    pub(crate) fn active_fields(&self) -> impl Iterator<Item = &StructField<'_>> {
        self.fields.iter().filter(|field| field.attrs.skip.is_none())
    }
}

// -----------------------------------------------------------------------------
// Enum

pub(crate) struct EnumVariant<'a> {
    pub ident: &'a Ident,
    pub docs: ReflectDocs,
}

pub(crate) struct ReflectEnum<'a> {
    pub meta: ReflectMeta<'a>,
    pub variants: Vec<EnumVariant<'a>>,
}

// -----------------------------------------------------------------------------
// ReflectDerive

pub(crate) enum ReflectDerive<'a> {
    Struct(ReflectStruct<'a>),
    Enum(ReflectEnum<'a>),
}

impl<'a> ReflectDerive<'a> {
    pub(crate) fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        for param in &input.generics.params {
            if !matches!(param, GenericParam::Type(_)) {
                return Err(syn::Error::new(
                    param.span(),
                    "`Reflect` cannot be derived for types with lifetime or const parameters",
                ));
            }
        }

        let mut docs = ReflectDocs::from_attrs(&input.attrs);
        let attrs = TypeAttributes::parse_attrs(&input.attrs, &mut docs)?;
        let meta = ReflectMeta {
            ident: &input.ident,
            generics: &input.generics,
            attrs,
            docs,
            od_reflect: crate::path::od_reflect(),
        };

        match &input.data {
            Data::Struct(data) => {
                let Fields::Named(named) = &data.fields else {
                    return Err(syn::Error::new(
                        input.ident.span(),
                        "`Reflect` can only be derived for structs with named fields",
                    ));
                };
                let fields = named
                    .named
                    .iter()
                    .map(|field| {
                        let mut docs = ReflectDocs::from_attrs(&field.attrs);
                        let attrs = FieldAttributes::parse_attrs(&field.attrs, &mut docs)?;
                        let ident = field
                            .ident
                            .as_ref()
                            .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;
                        Ok(StructField {
                            ident,
                            ty: &field.ty,
                            public: matches!(field.vis, Visibility::Public(_)),
                            attrs,
                            docs,
                        })
                    })
                    .collect::<syn::Result<Vec<_>>>()?;
                Ok(Self::Struct(ReflectStruct { meta, fields }))
            }
            Data::Enum(data) => {
                if meta.impl_with_generic() {
                    return Err(syn::Error::new(
                        input.generics.span(),
                        "`Reflect` cannot be derived for generic enums",
                    ));
                }
                if !meta.attrs.properties.is_empty() || meta.attrs.base.is_some() {
                    return Err(syn::Error::new(
                        input.ident.span(),
                        "`property` and `base` are only supported on structs",
                    ));
                }
                if data.variants.is_empty() {
                    return Err(syn::Error::new(
                        input.ident.span(),
                        "`Reflect` cannot be derived for enums without variants",
                    ));
                }
                let variants = data
                    .variants
                    .iter()
                    .map(|variant| {
                        if !matches!(variant.fields, Fields::Unit) {
                            return Err(syn::Error::new(
                                variant.span(),
                                "`Reflect` can only be derived for enums with unit variants",
                            ));
                        }
                        let mut docs = ReflectDocs::from_attrs(&variant.attrs);
                        for attr in variant
                            .attrs
                            .iter()
                            .filter(|a| a.path().is_ident(REFLECT_ATTRIBUTE_NAME))
                        {
                            attr.parse_nested_meta(|meta| {
                                if meta.path.is_ident("doc") {
                                    let line: syn::LitStr = meta.value()?.parse()?;
                                    docs.push_custom(line.value());
                                    Ok(())
                                } else {
                                    Err(meta.error("expected `doc = \"..\"`"))
                                }
                            })?;
                        }
                        Ok(EnumVariant {
                            ident: &variant.ident,
                            docs,
                        })
                    })
                    .collect::<syn::Result<Vec<_>>>()?;
                Ok(Self::Enum(ReflectEnum { meta, variants }))
            }
            Data::Union(_) => Err(syn::Error::new(
                input.ident.span(),
                "`Reflect` cannot be derived for unions",
            )),
        }
    }
}
