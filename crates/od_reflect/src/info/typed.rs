use crate::Reflect;
use crate::info::{TypeInfo, TypePath};
use crate::registry::TypeRegistry;

/// Static access to the [`TypeInfo`] of a type.
///
/// Usually implemented by `#[derive(Reflect)]`. Hand-written impls store the
/// info in a [`NonGenericTypeInfoCell`](crate::impls::NonGenericTypeInfoCell)
/// or, for generic types, a [`GenericTypeInfoCell`](crate::impls::GenericTypeInfoCell).
///
/// ```
/// use od_reflect::Reflect;
/// use od_reflect::info::{TypeInfo, TypeKind, TypePath, Typed};
/// use od_reflect::impls::NonGenericTypeInfoCell;
/// use od_reflect::ops::{ReflectMut, ReflectRef};
///
/// struct Token;
///
/// impl TypePath for Token {
///     fn type_path() -> &'static str { "demo::Token" }
///     fn type_name() -> &'static str { "Token" }
///     fn type_ident() -> &'static str { "Token" }
/// }
///
/// impl Typed for Token {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::Opaque))
///     }
/// }
///
/// impl Reflect for Token {
///     fn reflect_type_info(&self) -> &'static TypeInfo { Self::type_info() }
///     fn reflect_ref(&self) -> ReflectRef<'_> { ReflectRef::Opaque(self) }
///     fn reflect_mut(&mut self) -> ReflectMut<'_> { ReflectMut::Opaque(self) }
///     fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
///         *self = value.take::<Self>()?;
///         Ok(())
///     }
///     fn reflect_clone(&self) -> Option<Box<dyn Reflect>> { Some(Box::new(Token)) }
/// }
///
/// assert_eq!(Token::type_info().type_name(), "Token");
/// ```
pub trait Typed: Reflect + TypePath {
    /// Returns the compile-time info for the type.
    fn type_info() -> &'static TypeInfo;

    /// Registers the types referenced by this type's members.
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}
