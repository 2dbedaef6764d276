//! Generic object-to-document conversion.
//!
//! A [`Reflector`] turns live values into self-describing [`DocumentNode`]s and
//! back, patches existing values in place from partial documents, and derives
//! JSON schemas describing a type's document shape.
//!
//! ## Menu
//!
//! - [`info`]: static type information ([`TypeInfo`](info::TypeInfo), [`Typed`](info::Typed)).
//! - [`ops`]: per-kind access traits ([`Struct`](ops::Struct), [`List`](ops::List), ...).
//! - [`document`]: the wire model ([`DocumentNode`], [`Value`](document::Value), [`PopulateReport`](document::PopulateReport)).
//! - [`registry`]: name resolution ([`TypeRegistry`](registry::TypeRegistry)) and handler dispatch
//!   ([`HandlerRegistry`](registry::HandlerRegistry)).
//! - [`handler`]: the [`TypeHandler`](handler::TypeHandler) trait and the built-in handlers.
//! - [`reflector`]: the conversion engine and schema derivation.
//!
//! ## Example
//!
//! ```
//! use od_reflect::{Reflector, derive::Reflect};
//!
//! #[derive(Reflect, Default, Debug, PartialEq)]
//! #[reflect(default)]
//! struct Point {
//!     pub x: i32,
//!     pub y: i32,
//! }
//!
//! let reflector = Reflector::new();
//! reflector.register_type::<Point>();
//!
//! let node = reflector.to_document(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(node.fields.len(), 2);
//!
//! let back: Point = reflector.from_document(&node).unwrap();
//! assert_eq!(back, Point { x: 1, y: 2 });
//! ```

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names this crate `od_reflect`, which also has to work inside it.
extern crate self as od_reflect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod reflection;

pub mod document;
pub mod handler;
pub mod impls;
pub mod info;
pub mod ops;
pub mod reflector;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use document::DocumentNode;
pub use error::ReflectError;
pub use od_reflect_derive as derive;
pub use reflection::Reflect;
pub use reflector::{Reflector, ReflectorConfig};
