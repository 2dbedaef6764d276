use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, LitStr, Path, Type};

use crate::REFLECT_ATTRIBUTE_NAME;
use crate::derive_data::ReflectDocs;

// -----------------------------------------------------------------------------
// Type attributes

/// Traits the type is declared to implement, enabling shortcuts.
#[derive(Debug, Default)]
pub(crate) struct TraitAvailableFlags {
    /// Standard `Default`, used as the default instance.
    pub default: Option<Span>,
    /// Standard `Clone`, used by `reflect_clone`.
    pub clone: Option<Span>,
}

/// An accessor based property, `#[reflect(property(...))]`.
///
/// ```ignore
/// #[reflect(property(name = "area", ty = f32, get = area, set = set_area, doc = "..."))]
/// ```
///
/// `get` is a `fn(&self) -> ty`, `set` a `fn(&mut self, ty)`. At least one of
/// them is required.
#[derive(Debug)]
pub(crate) struct PropertyAttr {
    pub name: LitStr,
    pub ty: Type,
    pub get: Option<Path>,
    pub set: Option<Path>,
    pub docs: ReflectDocs,
}

/// Attributes on the type itself.
#[derive(Debug, Default)]
pub(crate) struct TypeAttributes {
    pub avail_traits: TraitAvailableFlags,
    pub auto_register: Option<Span>,
    pub base: Option<Type>,
    pub type_path: Option<LitStr>,
    pub properties: Vec<PropertyAttr>,
}

impl TypeAttributes {
    /// Parses every `#[reflect(...)]` attribute of the type.
    pub(crate) fn parse_attrs(attrs: &[Attribute], docs: &mut ReflectDocs) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident(REFLECT_ATTRIBUTE_NAME)) {
            attr.parse_nested_meta(|meta| this.parse_meta(&meta, docs))?;
        }
        Ok(this)
    }

    fn parse_meta(&mut self, meta: &ParseNestedMeta, docs: &mut ReflectDocs) -> syn::Result<()> {
        let span = meta.path.span();
        if meta.path.is_ident("default") {
            self.avail_traits.default = Some(span);
        } else if meta.path.is_ident("clone") {
            self.avail_traits.clone = Some(span);
        } else if meta.path.is_ident("auto_register") {
            self.auto_register = Some(span);
        } else if meta.path.is_ident("base") {
            self.base = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("type_path") {
            self.type_path = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("doc") {
            let line: LitStr = meta.value()?.parse()?;
            docs.push_custom(line.value());
        } else if meta.path.is_ident("property") {
            self.properties.push(PropertyAttr::parse(meta)?);
        } else {
            return Err(meta.error(
                "unknown attribute, expected one of: `default`, `clone`, `auto_register`, \
                 `base = T`, `type_path = \"..\"`, `doc = \"..\"`, `property(..)`",
            ));
        }
        Ok(())
    }
}

impl PropertyAttr {
    fn parse(meta: &ParseNestedMeta) -> syn::Result<Self> {
        let mut name: Option<LitStr> = None;
        let mut ty: Option<Type> = None;
        let mut get = None;
        let mut set = None;
        let mut docs = ReflectDocs::default();

        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("name") {
                name = Some(inner.value()?.parse()?);
            } else if inner.path.is_ident("ty") {
                ty = Some(inner.value()?.parse()?);
            } else if inner.path.is_ident("get") {
                get = Some(inner.value()?.parse()?);
            } else if inner.path.is_ident("set") {
                set = Some(inner.value()?.parse()?);
            } else if inner.path.is_ident("doc") {
                let line: LitStr = inner.value()?.parse()?;
                docs.push_custom(line.value());
            } else {
                return Err(inner.error(
                    "unknown property attribute, expected `name`, `ty`, `get`, `set` or `doc`",
                ));
            }
            Ok(())
        })?;

        let name = name.ok_or_else(|| meta.error("property requires `name = \"..\"`"))?;
        let ty = ty.ok_or_else(|| meta.error("property requires `ty = T`"))?;
        if get.is_none() && set.is_none() {
            return Err(meta.error("property requires `get` or `set`"));
        }
        Ok(Self {
            name,
            ty,
            get,
            set,
            docs,
        })
    }
}

// -----------------------------------------------------------------------------
// Field attributes

/// Attributes on a struct field.
#[derive(Debug, Default)]
pub(crate) struct FieldAttributes {
    /// Hidden from reflection; `reflect_clone` fills it with `Default`.
    pub skip: Option<Span>,
    /// Serialized but never written by populate.
    pub readonly: Option<Span>,
}

impl FieldAttributes {
    pub(crate) fn parse_attrs(attrs: &[Attribute], docs: &mut ReflectDocs) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident(REFLECT_ATTRIBUTE_NAME)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    this.skip = Some(meta.path.span());
                } else if meta.path.is_ident("readonly") {
                    this.readonly = Some(meta.path.span());
                } else if meta.path.is_ident("doc") {
                    let line: LitStr = meta.value()?.parse()?;
                    docs.push_custom(line.value());
                } else {
                    return Err(meta.error(
                        "unknown field attribute, expected `skip`, `readonly` or `doc = \"..\"`",
                    ));
                }
                Ok(())
            })?;
        }
        Ok(this)
    }
}
