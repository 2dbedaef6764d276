use crate::Reflect;
use crate::info::ReflectKind;
use crate::ops::{Enum, List, Optional, Primitive, Struct};

/// Immutable, kind specific view of a value.
pub enum ReflectRef<'a> {
    Primitive(&'a dyn Primitive),
    Struct(&'a dyn Struct),
    List(&'a dyn List),
    Enum(&'a dyn Enum),
    Optional(&'a dyn Optional),
    Opaque(&'a dyn Reflect),
}

/// Mutable, kind specific view of a value.
pub enum ReflectMut<'a> {
    Primitive(&'a mut dyn Primitive),
    Struct(&'a mut dyn Struct),
    List(&'a mut dyn List),
    Enum(&'a mut dyn Enum),
    Optional(&'a mut dyn Optional),
    Opaque(&'a mut dyn Reflect),
}

macro_rules! impl_kind {
    ($name:ident) => {
        impl $name<'_> {
            pub fn kind(&self) -> ReflectKind {
                match self {
                    Self::Primitive(_) => ReflectKind::Primitive,
                    Self::Struct(_) => ReflectKind::Struct,
                    Self::List(_) => ReflectKind::List,
                    Self::Enum(_) => ReflectKind::Enum,
                    Self::Optional(_) => ReflectKind::Optional,
                    Self::Opaque(_) => ReflectKind::Opaque,
                }
            }
        }
    };
}

impl_kind!(ReflectRef);
impl_kind!(ReflectMut);
