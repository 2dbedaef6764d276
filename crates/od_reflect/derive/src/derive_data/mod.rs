// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod docs;
mod reflect_meta;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes};
pub(crate) use docs::ReflectDocs;
pub(crate) use reflect_meta::{ReflectDerive, ReflectEnum, ReflectMeta, ReflectStruct, StructField};
