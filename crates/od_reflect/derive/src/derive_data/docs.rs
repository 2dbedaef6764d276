use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Expr, Lit, Meta};

/// Documentation of a type, field, property or variant.
///
/// Collected from `#[doc = "..."]` attributes, which includes `/// ...`
/// comments. A `doc = "..."` entry in `#[reflect(...)]` replaces them.
#[derive(Debug, Default)]
pub(crate) struct ReflectDocs {
    is_custom: bool,
    lines: Vec<String>,
}

impl ReflectDocs {
    /// Collects the `#[doc]` attributes of an item.
    pub(crate) fn from_attrs(attrs: &[Attribute]) -> Self {
        let mut docs = Self::default();
        for attr in attrs {
            if let Meta::NameValue(pair) = &attr.meta
                && pair.path.is_ident("doc")
                && let Expr::Lit(syn::ExprLit {
                    lit: Lit::Str(lit), ..
                }) = &pair.value
            {
                let line = lit.value();
                // `/// text` becomes `" text"`.
                docs.lines
                    .push(line.strip_prefix(' ').unwrap_or(&line).to_owned());
            }
        }
        docs
    }

    /// Adds a line from `#[reflect(doc = "...")]`.
    pub(crate) fn push_custom(&mut self, line: String) {
        if !self.is_custom {
            self.lines.clear();
            self.is_custom = true;
        }
        self.lines.push(line);
    }

    fn doc_string(&self) -> Option<String> {
        let joined = self.lines.join("\n");
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }

    /// `.with_docs(Some("..."))`, or nothing without docs.
    pub(crate) fn with_docs_tokens(&self) -> TokenStream {
        match self.doc_string() {
            Some(doc) => {
                let option_ = crate::path::option_();
                quote!(.with_docs(#option_::Some(#doc)))
            }
            None => crate::utils::empty(),
        }
    }
}
