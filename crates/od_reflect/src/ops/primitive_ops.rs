use crate::Reflect;
use crate::document::{Value, ValueError};

/// A leaf value, represented by a single [`Value`].
pub trait Primitive: Reflect {
    fn to_value(&self) -> Value;

    /// Assigns from `value`, leaving `self` unchanged on error.
    fn set_value(&mut self, value: &Value) -> Result<(), ValueError>;
}
