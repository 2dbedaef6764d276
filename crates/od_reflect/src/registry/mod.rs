//! Registries consulted by the [`Reflector`](crate::Reflector).
//!
//! - [`TypeRegistry`]: resolves the `typeName` of a document to a [`TypeInfo`](crate::info::TypeInfo).
//! - [`HandlerRegistry`]: ranks the [`TypeHandler`](crate::handler::TypeHandler)s
//!   applicable to a type and materializes handler chains.

// -----------------------------------------------------------------------------
// Modules

mod handler_registry;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use handler_registry::HandlerRegistry;
pub use type_registry::TypeRegistry;
