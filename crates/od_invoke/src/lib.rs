//! Dynamic method invocation on top of [`od_reflect`].
//!
//! Host methods are described by [`MethodInfo`]: a name, the declaring type,
//! typed parameters and a call body. A [`MethodWrapper`] binds a method to its
//! receiver and calls it with raw JSON arguments, converting each argument to
//! the declared parameter type through a [`Reflector`](od_reflect::Reflector).
//!
//! ```
//! use od_invoke::{CallOutput, MethodInfo, MethodWrapper, ParameterInfo};
//! use od_reflect::{Reflector, derive::Reflect};
//! use serde_json::json;
//!
//! #[derive(Reflect)]
//! struct Math {}
//!
//! let add = MethodInfo::new_static::<Math>("add", |mut args| {
//!     let a: i64 = args.take(0)?;
//!     let b: i64 = args.take(1)?;
//!     Ok(CallOutput::ready(a + b))
//! })
//! .with_parameter(ParameterInfo::new::<i64>("a"))
//! .with_parameter(ParameterInfo::new::<i64>("b").with_default(1i64))
//! .with_return::<i64>();
//!
//! let reflector = Reflector::new();
//! let mut wrapper = MethodWrapper::new(&reflector, &add);
//!
//! let sum = wrapper.invoke_blocking(&json!({ "a": 2 })).unwrap().unwrap();
//! assert_eq!(sum.take::<i64>().unwrap(), 3);
//! ```

// -----------------------------------------------------------------------------
// Modules

mod args;
mod error;
mod method;
mod registry;
mod schema;
mod wrapper;

// -----------------------------------------------------------------------------
// Exports

pub use args::{Args, Arguments};
pub use error::InvokeError;
pub use method::{CallOutput, CallResult, InstanceFn, MethodBody, MethodInfo, ParameterInfo, StaticFn};
pub use registry::{MethodQuery, MethodRegistry};
pub use schema::arguments_schema;
pub use wrapper::MethodWrapper;
