use alloc::vec::Vec;

use crate::info::{TypeInfo, Typed};

// -----------------------------------------------------------------------------
// FieldInfo

/// A data field of a struct.
#[derive(Clone, Debug)]
pub struct FieldInfo {
    name: &'static str,
    type_info: fn() -> &'static TypeInfo,
    public: bool,
    writable: bool,
    docs: Option<&'static str>,
}

impl FieldInfo {
    /// A public, writable field of type `T`.
    #[inline]
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            type_info: T::type_info,
            public: true,
            writable: true,
            docs: None,
        }
    }

    #[inline]
    pub fn with_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    /// Marks the field as not assignable through populate.
    #[inline]
    pub fn readonly(mut self) -> Self {
        self.writable = false;
        self
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

    /// The declared type of the field.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.public
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    #[inline]
    pub fn docs(&self) -> Option<&'static str> {
        self.docs
    }
}

// -----------------------------------------------------------------------------
// PropertyInfo

/// An accessor based member of a struct.
///
/// Properties are read through a getter returning an owned value and written
/// through a setter, see [`Struct::property`](crate::ops::Struct::property).
#[derive(Clone, Debug)]
pub struct PropertyInfo {
    name: &'static str,
    type_info: fn() -> &'static TypeInfo,
    readable: bool,
    writable: bool,
    docs: Option<&'static str>,
}

impl PropertyInfo {
    #[inline]
    pub fn new<T: Typed>(name: &'static str, readable: bool, writable: bool) -> Self {
        Self {
            name,
            type_info: T::type_info,
            readable,
            writable,
            docs: None,
        }
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
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    #[inline]
    pub fn docs(&self) -> Option<&'static str> {
        self.docs
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// Members of a struct, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct StructInfo {
    fields: Vec<FieldInfo>,
    properties: Vec<PropertyInfo>,
}

impl StructInfo {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    #[inline]
    pub fn with_property(mut self, property: PropertyInfo) -> Self {
        self.properties.push(property);
        self
    }

    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    #[inline]
    pub fn properties(&self) -> &[PropertyInfo] {
        &self.properties
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }
}
