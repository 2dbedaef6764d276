//! Static type information.
//!
//! - [`TypePath`]: stable names of a type.
//! - [`Typed`]: static access to [`TypeInfo`].
//! - [`TypeInfo`]: identity, [`TypeKind`], base type, default constructor and docs.
//! - [`AccessFlags`]: member selection for serialization and schema export.

// -----------------------------------------------------------------------------
// Modules

mod access_flags;
mod enum_info;
mod list_info;
mod optional_info;
mod primitive_info;
mod struct_info;
mod type_info;
mod type_path;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use type_path::impl_type_fn;

pub use access_flags::AccessFlags;
pub use enum_info::{EnumInfo, VariantInfo};
pub use list_info::{FromItemsFn, ListInfo, ListShape};
pub use optional_info::{FromInnerFn, OptionalInfo};
pub use primitive_info::{IntBounds, PrimitiveInfo, PrimitiveKind};
pub use struct_info::{FieldInfo, PropertyInfo, StructInfo};
pub use type_info::{BaseIter, ReflectKind, TypeInfo, TypeKind};
pub use type_path::{Type, TypePath, TypePathTable};
pub use typed::Typed;
