use od_reflect::ReflectError;

/// Failure of a dynamic invocation.
#[derive(thiserror::Error, Debug)]
pub enum InvokeError {
    /// The engine failed outside of argument conversion.
    #[error(transparent)]
    Reflect(#[from] ReflectError),
    /// No value was supplied for a parameter without a default.
    #[error("missing value for parameter `{0}`")]
    MissingParameter(String),
    /// More positional arguments than parameters.
    #[error("`{method}` takes {expected} arguments, {found} were supplied")]
    TooManyArguments {
        method: &'static str,
        expected: usize,
        found: usize,
    },
    /// A named argument matches no parameter.
    #[error("`{method}` has no parameter named `{name}`")]
    UnknownParameter { method: &'static str, name: String },
    /// An argument could not be converted to the parameter type.
    #[error("argument `{parameter}` cannot be converted to `{type_path}`: {source}")]
    ArgumentConversion {
        parameter: String,
        type_path: &'static str,
        #[source]
        source: ReflectError,
    },
    /// An instance method was called without a receiver.
    #[error("instance method `{0}` has no target")]
    NoTarget(&'static str),
    /// The method body reported a failure.
    #[error("invocation failed: {0}")]
    Failed(String),
}
