use alloc::string::String;
use core::any::TypeId;

use od_utils::TypeIdMap;
use od_utils::hash::{HashMap, HashSet};

use crate::info::{TypeInfo, Typed};

/// The central store resolving type names to [`TypeInfo`].
///
/// A type is reachable by its full type path, by its short type name (unless
/// two registered types share it) and by [`TypeId`].
///
/// ```
/// use od_reflect::registry::TypeRegistry;
///
/// let mut registry = TypeRegistry::new();
/// assert!(registry.resolve("String").is_some());
/// assert!(registry.resolve("alloc::vec::Vec<u8>").is_none());
///
/// registry.register::<Vec<u8>>();
/// let info = registry.resolve("Vec<u8>").unwrap();
/// assert_eq!(info.type_path(), "alloc::vec::Vec<u8>");
/// ```
pub struct TypeRegistry {
    type_info_table: TypeIdMap<&'static TypeInfo>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create an empty registry.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            type_info_table: TypeIdMap::new(),
            type_path_to_id: HashMap::with_hasher(od_utils::hash::FixedHashState),
            type_name_to_id: HashMap::with_hasher(od_utils::hash::FixedHashState),
            ambiguous_names: HashSet::with_hasher(od_utils::hash::FixedHashState),
        }
    }

    /// Create a registry with the primitive types registered.
    ///
    /// - `()` `bool` `char`
    /// - `i8 - i64` `isize`
    /// - `u8 - u64` `usize`
    /// - `f32` `f64`
    /// - `String`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<()>();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry
    }

    // The type must not already exist.
    fn add_new_type_indices(&mut self, info: &'static TypeInfo) {
        let ty = info.ty();
        let type_name = ty.name();

        if !self.ambiguous_names.contains(type_name) {
            if self.type_name_to_id.contains_key(type_name) {
                self.type_name_to_id.remove(type_name);
                self.ambiguous_names.insert(type_name);
            } else {
                self.type_name_to_id.insert(type_name, ty.id());
            }
        }

        self.type_path_to_id.insert(ty.path(), ty.id());
    }

    /// Registers `T` and the types it refers to.
    ///
    /// Registering a type twice does nothing.
    #[inline]
    pub fn register<T: Typed>(&mut self) {
        self.register_info(T::type_info());
    }

    /// Registers a type from its info, including its dependencies.
    ///
    /// Returns `false` if the type was already registered.
    pub fn register_info(&mut self, info: &'static TypeInfo) -> bool {
        if !self.type_info_table.try_insert(info.ty_id(), || info) {
            return false;
        }
        self.add_new_type_indices(info);
        log::debug!("registered type `{}`", info.type_path());

        // After insertion, so that recursive types terminate.
        info.register_dependencies(self);
        if let Some(base) = info.base() {
            self.register_info(base);
        }
        true
    }

    /// Registers every type annotated with `#[reflect(auto_register)]`.
    ///
    /// Returns `false` when the `auto_register` feature is disabled.
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            crate::__macro_exports::auto_register::register_types(self);
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_info_table.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.type_info_table.get(&type_id).copied()
    }

    pub fn get_with_type_path(&self, type_path: &str) -> Option<&'static TypeInfo> {
        self.type_path_to_id
            .get(type_path)
            .and_then(|id| self.get(*id))
    }

    /// Lookup by short name, `None` if the name is ambiguous.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&'static TypeInfo> {
        self.type_name_to_id
            .get(type_name)
            .and_then(|id| self.get(*id))
    }

    /// Whether several registered types share the short name `type_name`.
    #[inline]
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Resolves a `typeName`: full path first, then short name.
    pub fn resolve(&self, name: &str) -> Option<&'static TypeInfo> {
        self.get_with_type_path(name)
            .or_else(|| self.get_with_type_name(name))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.type_info_table.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static TypeInfo> + '_ {
        self.type_info_table.values().copied()
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.type_path_to_id.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::NonGenericTypeInfoCell;
    use crate::info::{TypeKind, TypePath};
    use crate::ops::{ReflectMut, ReflectRef};
    use crate::Reflect;
    use alloc::boxed::Box;

    mod a {
        pub struct Same;
    }
    mod b {
        pub struct Same;
    }

    macro_rules! opaque {
        ($ty:ty, $path:literal) => {
            impl TypePath for $ty {
                fn type_path() -> &'static str {
                    $path
                }
                fn type_name() -> &'static str {
                    "Same"
                }
                fn type_ident() -> &'static str {
                    "Same"
                }
            }

            impl Typed for $ty {
                fn type_info() -> &'static TypeInfo {
                    static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                    CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::Opaque))
                }
            }

            impl Reflect for $ty {
                fn reflect_type_info(&self) -> &'static TypeInfo {
                    <Self as Typed>::type_info()
                }
                fn reflect_ref(&self) -> ReflectRef<'_> {
                    ReflectRef::Opaque(self)
                }
                fn reflect_mut(&mut self) -> ReflectMut<'_> {
                    ReflectMut::Opaque(self)
                }
                fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                    Err(value)
                }
                fn reflect_clone(&self) -> Option<Box<dyn Reflect>> {
                    None
                }
            }
        };
    }

    opaque!(a::Same, "a::Same");
    opaque!(b::Same, "b::Same");

    #[test]
    fn ambiguous_short_names() {
        let mut registry = TypeRegistry::empty();
        registry.register::<a::Same>();
        assert!(registry.resolve("Same").is_some());

        registry.register::<b::Same>();
        assert!(registry.is_ambiguous("Same"));
        assert!(registry.resolve("Same").is_none());
        assert_eq!(registry.resolve("b::Same").unwrap().type_path(), "b::Same");
    }

    #[test]
    fn register_is_idempotent_and_pulls_dependencies() {
        let mut registry = TypeRegistry::empty();
        assert!(registry.register_info(<Option<Vec<u16>>>::type_info()));
        assert!(!registry.register_info(<Option<Vec<u16>>>::type_info()));

        assert!(registry.contains(TypeId::of::<Vec<u16>>()));
        assert!(registry.contains(TypeId::of::<u16>()));
        assert_eq!(registry.len(), 3);
    }
}
