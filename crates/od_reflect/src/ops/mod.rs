//! Kind specific access traits.
//!
//! Each is a subtrait of [`Reflect`](crate::Reflect), reached through
//! [`ReflectRef`] and [`ReflectMut`]:
//!
//! - [`Primitive`]: leaf values, converted to and from a [`Value`](crate::document::Value).
//! - [`Struct`]: named fields and accessor based properties.
//! - [`List`]: ordered items.
//! - [`Enum`]: unit variants.
//! - [`Optional`]: a value that may be absent.

// -----------------------------------------------------------------------------
// Modules

mod enum_ops;
mod kind;
mod list_ops;
mod optional_ops;
mod primitive_ops;
mod struct_ops;

// -----------------------------------------------------------------------------
// Exports

pub use enum_ops::Enum;
pub use kind::{ReflectMut, ReflectRef};
pub use list_ops::{List, ListItemIter};
pub use optional_ops::Optional;
pub use primitive_ops::Primitive;
pub use struct_ops::Struct;
