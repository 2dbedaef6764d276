use alloc::boxed::Box;

use crate::Reflect;
use crate::document::{Value, ValueError};

/// The family of a primitive type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveKind {
    Unit,
    Bool,
    Char,
    Signed,
    Unsigned,
    Float,
    String,
}

/// Inclusive range of an integer type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntBounds {
    pub min: i64,
    pub max: u64,
}

/// Information of a leaf type converted to and from a single [`Value`].
#[derive(Clone, Debug)]
pub struct PrimitiveInfo {
    kind: PrimitiveKind,
    bounds: Option<IntBounds>,
    from_value: fn(&Value) -> Result<Box<dyn Reflect>, ValueError>,
}

impl PrimitiveInfo {
    #[inline]
    pub fn new(
        kind: PrimitiveKind,
        from_value: fn(&Value) -> Result<Box<dyn Reflect>, ValueError>,
    ) -> Self {
        Self {
            kind,
            bounds: None,
            from_value,
        }
    }

    #[inline]
    pub fn with_bounds(mut self, min: i64, max: u64) -> Self {
        self.bounds = Some(IntBounds { min, max });
        self
    }

    #[inline]
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Integer range, `None` for non-integer kinds.
    #[inline]
    pub fn bounds(&self) -> Option<IntBounds> {
        self.bounds
    }

    /// Converts a leaf value into a new instance.
    #[inline]
    pub fn from_value(&self, value: &Value) -> Result<Box<dyn Reflect>, ValueError> {
        (self.from_value)(value)
    }
}
