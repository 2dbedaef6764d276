//! The self-describing document form.
//!
//! A [`DocumentNode`] names the type of the value it describes and carries
//! either a leaf [`Value`], child nodes for the type's fields and properties,
//! or both. The JSON wire shape is:
//!
//! ```json
//! { "name": "pos", "typeName": "demo::Vec2", "fields": [
//!     { "name": "x", "typeName": "f32", "value": 1.0 },
//!     { "name": "y", "typeName": "f32", "value": 2.0 }
//! ] }
//! ```
//!
//! [`PopulateReport`] collects the per-member outcome of deserialize and
//! populate operations.

// -----------------------------------------------------------------------------
// Modules

mod node;
mod report;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use node::DocumentNode;
pub use report::{PopulateReport, ReportEntry, ReportLevel};
pub use value::{Value, ValueError};
