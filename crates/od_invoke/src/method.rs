use core::fmt;
use std::sync::Arc;

use futures_lite::future::Boxed;
use od_reflect::info::{TypeInfo, Typed};
use od_reflect::{Reflect, ReflectError};

use crate::{Args, InvokeError};

/// The outcome of an invocation: the returned value, `None` for unit methods.
pub type CallResult = Result<Option<Box<dyn Reflect>>, InvokeError>;

// -----------------------------------------------------------------------------
// CallOutput

/// What a method body returns.
pub enum CallOutput {
    /// The call completed.
    Ready(Option<Box<dyn Reflect>>),
    /// The call completes when the future resolves.
    Pending(Boxed<CallResult>),
}

impl CallOutput {
    #[inline]
    pub fn ready(value: impl Reflect) -> Self {
        Self::Ready(Some(Box::new(value)))
    }

    /// A completed call without a return value.
    #[inline]
    pub fn empty() -> Self {
        Self::Ready(None)
    }

    #[inline]
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = CallResult> + Send + 'static,
    {
        Self::Pending(Box::pin(future))
    }
}

impl fmt::Debug for CallOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Pending(_) => f.write_str("Pending"),
        }
    }
}

// -----------------------------------------------------------------------------
// ParameterInfo

/// A formal parameter of a method.
#[derive(Clone)]
pub struct ParameterInfo {
    name: &'static str,
    type_info: fn() -> &'static TypeInfo,
    default: Option<Arc<dyn Reflect>>,
    docs: Option<&'static str>,
}

impl ParameterInfo {
    #[inline]
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            type_info: T::type_info,
            default: None,
            docs: None,
        }
    }

    /// Uses `value` when no argument is supplied.
    ///
    /// The value is cloned through [`Reflect::reflect_clone`] for every call.
    pub fn with_default<T: Typed>(mut self, value: T) -> Self {
        self.default = Some(Arc::new(value));
        self
    }

    #[inline]
    pub fn with_docs(mut self, docs: &'static str) -> Self {
        self.docs = Some(docs);
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared type.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// A fresh copy of the default value.
    pub fn default_value(&self) -> Option<Box<dyn Reflect>> {
        self.default.as_deref()?.reflect_clone()
    }

    #[inline]
    pub fn docs(&self) -> Option<&'static str> {
        self.docs
    }
}

impl fmt::Debug for ParameterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterInfo")
            .field("name", &self.name)
            .field("type", &self.type_info().type_path())
            .field("default", &self.default)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// MethodBody

pub type StaticFn = dyn Fn(Args) -> Result<CallOutput, InvokeError> + Send + Sync;

pub type InstanceFn =
    dyn Fn(&mut dyn Reflect, Args) -> Result<CallOutput, InvokeError> + Send + Sync;

/// The callable part of a method.
#[derive(Clone)]
pub enum MethodBody {
    Static(Arc<StaticFn>),
    /// Receives the target, already checked to be of the declaring type.
    Instance(Arc<InstanceFn>),
}

// -----------------------------------------------------------------------------
// MethodInfo

/// A host method exposed for dynamic invocation.
#[derive(Clone)]
pub struct MethodInfo {
    name: &'static str,
    declaring: fn() -> &'static TypeInfo,
    parameters: Vec<ParameterInfo>,
    returns: Option<fn() -> &'static TypeInfo>,
    docs: Option<&'static str>,
    body: MethodBody,
}

impl MethodInfo {
    /// A method of `D` called without a receiver.
    pub fn new_static<D: Typed>(
        name: &'static str,
        body: impl Fn(Args) -> Result<CallOutput, InvokeError> + Send + Sync + 'static,
    ) -> Self {
        Self::with_body::<D>(name, MethodBody::Static(Arc::new(body)))
    }

    /// A method of `D` called on an instance of `D`.
    pub fn new_instance<D: Typed>(
        name: &'static str,
        body: impl Fn(&mut D, Args) -> Result<CallOutput, InvokeError> + Send + Sync + 'static,
    ) -> Self {
        let body = move |target: &mut dyn Reflect, args: Args| {
            let found = target.reflect_type_path();
            match target.downcast_mut::<D>() {
                Some(target) => body(target, args),
                None => Err(ReflectError::TypeMismatch {
                    expected: D::type_path(),
                    found,
                }
                .into()),
            }
        };
        Self::with_body::<D>(name, MethodBody::Instance(Arc::new(body)))
    }

    fn with_body<D: Typed>(name: &'static str, body: MethodBody) -> Self {
        Self {
            name,
            declaring: D::type_info,
            parameters: Vec::new(),
            returns: None,
            docs: None,
            body,
        }
    }

    #[inline]
    pub fn with_parameter(mut self, parameter: ParameterInfo) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[inline]
    pub fn with_return<T: Typed>(mut self) -> Self {
        self.returns = Some(T::type_info);
        self
    }

    #[inline]
    pub fn with_docs(mut self, docs: &'static str) -> Self {
        self.docs = Some(docs);
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type the method belongs to, also the receiver type of instance methods.
    #[inline]
    pub fn declaring_type(&self) -> &'static TypeInfo {
        (self.declaring)()
    }

    #[inline]
    pub fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterInfo> {
        self.parameters.iter().find(|p| p.name == name)
    }

    #[inline]
    pub fn return_type(&self) -> Option<&'static TypeInfo> {
        self.returns.map(|returns| returns())
    }

    #[inline]
    pub fn docs(&self) -> Option<&'static str> {
        self.docs
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        matches!(self.body, MethodBody::Static(_))
    }

    #[inline]
    pub fn body(&self) -> &MethodBody {
        &self.body
    }
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("name", &self.name)
            .field("declaring", &self.declaring_type().type_path())
            .field("static", &self.is_static())
            .field("parameters", &self.parameters)
            .field("returns", &self.return_type().map(TypeInfo::type_path))
            .finish()
    }
}
