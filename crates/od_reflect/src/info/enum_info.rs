use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Reflect;

/// A unit variant of an enum.
#[derive(Clone, Debug)]
pub struct VariantInfo {
    name: &'static str,
    docs: Option<&'static str>,
}

impl VariantInfo {
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self { name, docs: None }
    }

    #[inline]
    pub fn with_docs(mut self, docs: Option<&'static str>) -> Self {
        self.docs = docs;
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn docs(&self) -> Option<&'static str> {
        self.docs
    }
}

/// Information of an enum made of unit variants.
#[derive(Clone, Debug)]
pub struct EnumInfo {
    variants: Vec<VariantInfo>,
    from_variant: fn(&str) -> Option<Box<dyn Reflect>>,
}

impl EnumInfo {
    #[inline]
    pub fn new(from_variant: fn(&str) -> Option<Box<dyn Reflect>>) -> Self {
        Self {
            variants: Vec::new(),
            from_variant,
        }
    }

    #[inline]
    pub fn with_variant(mut self, variant: VariantInfo) -> Self {
        self.variants.push(variant);
        self
    }

    #[inline]
    pub fn variants(&self) -> &[VariantInfo] {
        &self.variants
    }

    pub fn variant(&self, name: &str) -> Option<&VariantInfo> {
        self.variants.iter().find(|v| v.name == name)
    }

    #[inline]
    pub fn variant_at(&self, index: usize) -> Option<&VariantInfo> {
        self.variants.get(index)
    }

    /// Constructs the variant named `name`.
    #[inline]
    pub fn from_variant(&self, name: &str) -> Option<Box<dyn Reflect>> {
        (self.from_variant)(name)
    }
}
