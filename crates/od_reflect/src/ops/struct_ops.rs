use alloc::boxed::Box;

use crate::Reflect;

/// A struct with named fields and accessor based properties.
///
/// The member list itself is static, see [`StructInfo`](crate::info::StructInfo).
pub trait Struct: Reflect {
    /// Returns the field named `name`.
    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    /// Returns the field named `name` mutably.
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;

    /// Reads the property named `name` through its getter.
    ///
    /// `None` if there is no readable property of that name.
    fn property(&self, _name: &str) -> Option<Box<dyn Reflect>> {
        None
    }

    /// Writes the property named `name` through its setter.
    ///
    /// Returns `value` back when the property is unknown, not writable or of
    /// another type.
    fn set_property(
        &mut self,
        _name: &str,
        value: Box<dyn Reflect>,
    ) -> Result<(), Box<dyn Reflect>> {
        Err(value)
    }
}
