use alloc::string::String;

use crate::document::ValueError;

/// Structural failure of a conversion operation.
///
/// Per-member problems encountered while populating or deserializing a
/// composite are not errors; they are written to a
/// [`PopulateReport`](crate::document::PopulateReport) instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ReflectError {
    /// A document node without a usable `typeName`.
    #[error("document node has a missing or empty `typeName`")]
    EmptyTypeName,
    /// `typeName` does not resolve through the type registry.
    #[error("type `{0}` is not registered")]
    UnknownType(String),
    /// No serializer produced a node for the type.
    #[error("type `{0}` is not supported by any registered handler")]
    UnsupportedType(&'static str),
    /// No handler is able to deserialize or populate the type.
    #[error("no handler is registered for type `{0}`")]
    NoHandler(&'static str),
    /// Populate was called without a target instance.
    #[error("populate target is missing")]
    NullTarget,
    /// The value's type is not assignable to the requested type.
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// A new instance was required but the type has no default constructor.
    #[error("type `{0}` has no default constructor")]
    NoDefault(&'static str),
    /// A list was rebuilt with the wrong number of items.
    #[error("`{type_path}` expects {expected} items, found {found}")]
    LengthMismatch {
        type_path: &'static str,
        expected: usize,
        found: usize,
    },
    /// A raw payload names a member the type does not have.
    #[error("type `{type_path}` has no member named `{name}`")]
    UnknownMember {
        type_path: &'static str,
        name: String,
    },
    /// A leaf value could not be converted.
    #[error(transparent)]
    InvalidValue(#[from] ValueError),
    /// An instance was reached again while it was still being visited.
    #[error("cycle detected at an instance of `{0}`")]
    Cycle(&'static str),
    /// Nesting exceeded the configured maximum depth.
    #[error("maximum nesting depth of {0} exceeded")]
    DepthLimit(usize),
}

impl ReflectError {
    /// Errors that no other handler of a chain can recover from.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Cycle(_) | Self::DepthLimit(_))
    }
}
