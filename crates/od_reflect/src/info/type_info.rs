use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;

use crate::Reflect;
use crate::info::{
    EnumInfo, ListInfo, OptionalInfo, PrimitiveInfo, StructInfo, Type, Typed, impl_type_fn,
};
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// ReflectKind

/// The structural category of a type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Primitive,
    Struct,
    List,
    Enum,
    Optional,
    Opaque,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Primitive => "primitive",
            Self::Struct => "struct",
            Self::List => "list",
            Self::Enum => "enum",
            Self::Optional => "optional",
            Self::Opaque => "opaque",
        })
    }
}

// -----------------------------------------------------------------------------
// TypeKind

/// Kind specific type information.
#[derive(Clone, Debug)]
pub enum TypeKind {
    Primitive(PrimitiveInfo),
    Struct(StructInfo),
    List(ListInfo),
    Enum(EnumInfo),
    Optional(OptionalInfo),
    /// A type without inspectable structure.
    Opaque,
}

impl TypeKind {
    pub fn reflect_kind(&self) -> ReflectKind {
        match self {
            Self::Primitive(_) => ReflectKind::Primitive,
            Self::Struct(_) => ReflectKind::Struct,
            Self::List(_) => ReflectKind::List,
            Self::Enum(_) => ReflectKind::Enum,
            Self::Optional(_) => ReflectKind::Optional,
            Self::Opaque => ReflectKind::Opaque,
        }
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time information of a type, stored statically.
///
/// Besides the structure ([`TypeKind`]) it records the declared base type,
/// used for inheritance distance and assignability checks, and an optional
/// default constructor used when a new instance has to be created.
///
/// ```
/// use od_reflect::info::{ReflectKind, Typed};
///
/// let info = <Vec<i32> as Typed>::type_info();
/// assert_eq!(info.reflect_kind(), ReflectKind::List);
/// assert_eq!(info.type_path(), "alloc::vec::Vec<i32>");
/// assert!(info.has_default());
/// ```
pub struct TypeInfo {
    ty: Type,
    kind: TypeKind,
    base: Option<fn() -> &'static TypeInfo>,
    default: Option<fn() -> Box<dyn Reflect>>,
    dependencies: fn(&mut TypeRegistry),
    docs: Option<&'static str>,
}

impl TypeInfo {
    #[inline]
    pub fn new<T: Typed>(kind: TypeKind) -> Self {
        Self {
            ty: Type::of::<T>(),
            kind,
            base: None,
            default: None,
            dependencies: T::register_dependencies,
            docs: None,
        }
    }

    /// Declares `B` as the base type.
    #[inline]
    pub fn with_base<B: Typed>(mut self) -> Self {
        self.base = Some(B::type_info);
        self
    }

    #[inline]
    pub fn with_default(mut self, default: fn() -> Box<dyn Reflect>) -> Self {
        self.default = Some(default);
        self
    }

    #[inline]
    pub fn with_docs(mut self, docs: Option<&'static str>) -> Self {
        self.docs = docs;
        self
    }

    impl_type_fn!(ty);

    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    #[inline]
    pub fn reflect_kind(&self) -> ReflectKind {
        self.kind.reflect_kind()
    }

    #[inline]
    pub fn docs(&self) -> Option<&'static str> {
        self.docs
    }

    #[inline]
    pub fn as_primitive(&self) -> Option<&PrimitiveInfo> {
        match &self.kind {
            TypeKind::Primitive(info) => Some(info),
            _ => None,
        }
    }

    #[inline]
    pub fn as_struct(&self) -> Option<&StructInfo> {
        match &self.kind {
            TypeKind::Struct(info) => Some(info),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&ListInfo> {
        match &self.kind {
            TypeKind::List(info) => Some(info),
            _ => None,
        }
    }

    #[inline]
    pub fn as_enum(&self) -> Option<&EnumInfo> {
        match &self.kind {
            TypeKind::Enum(info) => Some(info),
            _ => None,
        }
    }

    #[inline]
    pub fn as_optional(&self) -> Option<&OptionalInfo> {
        match &self.kind {
            TypeKind::Optional(info) => Some(info),
            _ => None,
        }
    }

    /// The declared base type.
    #[inline]
    pub fn base(&self) -> Option<&'static TypeInfo> {
        self.base.map(|f| f())
    }

    /// Iterates the base chain, starting with the direct base.
    #[inline]
    pub fn bases(&self) -> BaseIter {
        BaseIter { next: self.base() }
    }

    /// Number of declared ancestors.
    #[inline]
    pub fn base_depth(&self) -> usize {
        self.bases().count()
    }

    /// Steps from this type up to the ancestor `ancestor`.
    ///
    /// `Some(0)` for the type itself, `None` if `ancestor` is not in the base chain.
    pub fn inheritance_distance(&self, ancestor: TypeId) -> Option<usize> {
        if self.ty_id() == ancestor {
            return Some(0);
        }
        self.bases()
            .position(|base| base.ty_id() == ancestor)
            .map(|index| index + 1)
    }

    /// Whether a value of this type can be used where `target` is expected.
    #[inline]
    pub fn is_assignable_to(&self, target: &TypeInfo) -> bool {
        self.inheritance_distance(target.ty_id()).is_some()
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Constructs the default instance, if the type declares one.
    #[inline]
    pub fn default_value(&self) -> Option<Box<dyn Reflect>> {
        self.default.map(|f| f())
    }

    /// Registers the types this type refers to.
    #[inline]
    pub fn register_dependencies(&self, registry: &mut TypeRegistry) {
        (self.dependencies)(registry);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("ty", &self.ty)
            .field("kind", &self.kind)
            .field("base", &self.base().map(TypeInfo::type_path))
            .field("has_default", &self.has_default())
            .field("docs", &self.docs)
            .finish()
    }
}

/// Iterator over a declared base chain.
pub struct BaseIter {
    next: Option<&'static TypeInfo>,
}

impl Iterator for BaseIter {
    type Item = &'static TypeInfo;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.base();
        Some(current)
    }
}
