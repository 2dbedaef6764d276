//! Pluggable, priority-ranked conversion strategies.
//!
//! A [`TypeHandler`] declares, per type, how strongly it applies
//! ([`priority`](TypeHandler::priority)) and implements serialize, deserialize,
//! populate and optionally a custom schema for the types it accepts. The
//! [`HandlerRegistry`](crate::registry::HandlerRegistry) ranks handlers and
//! builds the chains the [`Reflector`] walks.
//!
//! ## Priority scale
//!
//! - Leaf handlers ([`PrimitiveHandler`], [`EnumHandler`], [`OptionalHandler`])
//!   return [`MAX_DEPTH`]` + 1`.
//! - [`ListHandler`] returns `MAX_DEPTH + 1` for `Vec` and arrays, `MAX_DEPTH / 4`
//!   for other sequences.
//! - Object handlers return `MAX_DEPTH - distance`, where `distance` is the
//!   number of base steps from the runtime type to the handled type (see
//!   [`object_priority`]). [`StructHandler`] handles the implicit root of every
//!   base chain, so its distance is one more than the chain length.
//! - `0` or less means "not applicable".

// -----------------------------------------------------------------------------
// Modules

mod enum_handler;
mod handle_handler;
mod list_handler;
mod optional_handler;
mod primitive_handler;
mod struct_handler;

// -----------------------------------------------------------------------------
// Exports

pub use enum_handler::EnumHandler;
pub use handle_handler::{HandleHandler, HandleResolver};
pub use list_handler::ListHandler;
pub use optional_handler::OptionalHandler;
pub use primitive_handler::PrimitiveHandler;
pub use struct_handler::StructHandler;

use alloc::boxed::Box;
use core::any::TypeId;

use crate::document::{DocumentNode, PopulateReport};
use crate::info::{AccessFlags, TypeInfo, TypeKind, Typed};
use crate::{Reflect, ReflectError, Reflector};

/// Base of the priority scale.
pub const MAX_DEPTH: i32 = 10_000;

/// Priority of a handler for `T` applied to a value of type `info`.
///
/// `MAX_DEPTH - distance` when `info` is `T` or declares `T` in its base chain,
/// `0` otherwise.
///
/// ```
/// use od_reflect::handler::{object_priority, MAX_DEPTH};
/// use od_reflect::info::Typed;
///
/// assert_eq!(object_priority::<i32>(<i32 as Typed>::type_info()), MAX_DEPTH);
/// assert_eq!(object_priority::<i32>(<u8 as Typed>::type_info()), 0);
/// ```
pub fn object_priority<T: Typed>(info: &'static TypeInfo) -> i32 {
    info.inheritance_distance(TypeId::of::<T>())
        .and_then(|distance| i32::try_from(distance).ok())
        .map_or(0, |distance| MAX_DEPTH.saturating_sub(distance))
}

/// A conversion strategy for a family of types.
///
/// Handlers are stateless with respect to individual calls and re-enter the
/// [`Reflector`] for nested members.
pub trait TypeHandler: Send + Sync + 'static {
    /// How strongly this handler applies to `info`; `<= 0` means not at all.
    fn priority(&self, info: &'static TypeInfo) -> i32;

    /// Whether the next ranked handler is also part of the serializer chain.
    fn cascade_on_serialize(&self) -> bool {
        false
    }

    /// Whether the next ranked handler also runs when populating.
    fn cascade_on_populate(&self) -> bool {
        false
    }

    /// Converts `value` into a node.
    ///
    /// `Ok(None)` means "no result", the next handler of the chain is tried.
    /// With `recursive == false` composites keep their leaf members and write
    /// nested composites as reference-only nodes, see [`serialize_member`].
    fn serialize(
        &self,
        reflector: &Reflector,
        value: &dyn Reflect,
        info: &'static TypeInfo,
        name: Option<&str>,
        recursive: bool,
        flags: AccessFlags,
    ) -> Result<Option<DocumentNode>, ReflectError>;

    /// Builds a new instance of `info` from `node`.
    ///
    /// Members that cannot be applied are skipped and written to `report`.
    fn deserialize(
        &self,
        _reflector: &Reflector,
        _node: &DocumentNode,
        info: &'static TypeInfo,
        _report: &mut PopulateReport,
        _depth: usize,
    ) -> Result<Box<dyn Reflect>, ReflectError> {
        Err(ReflectError::NoHandler(info.type_path()))
    }

    /// Mutates `target` in place from `node`.
    ///
    /// The default implementation replaces `target` with a deserialized value.
    fn populate(
        &self,
        reflector: &Reflector,
        target: &mut dyn Reflect,
        node: &DocumentNode,
        info: &'static TypeInfo,
        report: &mut PopulateReport,
        depth: usize,
    ) -> Result<(), ReflectError> {
        let value = self.deserialize(reflector, node, info, report, depth)?;
        assign(target, value, report, depth);
        Ok(())
    }

    /// A schema replacing the one derived from the type structure.
    fn schema(&self, _reflector: &Reflector, _info: &'static TypeInfo) -> Option<serde_json::Value> {
        None
    }

    /// Name used in logs.
    fn name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Replaces `target` with `value`, reporting a rejected assignment.
pub(crate) fn assign(
    target: &mut dyn Reflect,
    value: Box<dyn Reflect>,
    report: &mut PopulateReport,
    depth: usize,
) -> bool {
    match target.set(value) {
        Ok(()) => true,
        Err(rejected) => {
            report.error(
                depth,
                alloc::format!(
                    "Value of type '{}' cannot be assigned to '{}'.",
                    rejected.reflect_type_path(),
                    target.reflect_type_path(),
                ),
            );
            false
        }
    }
}

/// A reference-only node: the type and name, without payload.
#[inline]
pub(crate) fn reference_node(info: &'static TypeInfo, name: Option<&str>) -> DocumentNode {
    DocumentNode::absent(info.type_path(), name)
}

/// Whether values of `info` are written as a single `value`.
///
/// Primitives, enums and optionals of those.
pub fn is_leaf(info: &'static TypeInfo) -> bool {
    match info.kind() {
        TypeKind::Primitive(_) | TypeKind::Enum(_) => true,
        TypeKind::Optional(optional) => is_leaf(optional.inner_info()),
        _ => false,
    }
}

/// Serializes the member `name` of a composite.
///
/// Without `recursive`, a composite member becomes a reference-only node of
/// its runtime type and leaves are written in full.
pub fn serialize_member(
    reflector: &Reflector,
    member: &dyn Reflect,
    name: &str,
    recursive: bool,
    flags: AccessFlags,
) -> Result<DocumentNode, ReflectError> {
    let info = member.reflect_type_info();
    if !recursive && !is_leaf(info) {
        return Ok(reference_node(info, Some(name)));
    }
    reflector.serialize(Some(member), None, Some(name), recursive, flags)
}
