use core::fmt;

use log::{trace, warn};
use od_reflect::info::TypeInfo;
use od_reflect::{DocumentNode, Reflect, ReflectError, Reflector};
use serde_json::Value as Json;

use crate::{Args, Arguments, CallOutput, CallResult, InvokeError, MethodBody, MethodInfo, ParameterInfo};

enum Target<'a> {
    None,
    Borrowed(&'a mut dyn Reflect),
    /// A default instance of the declaring type, built on first use.
    Lazy(Option<Box<dyn Reflect>>),
}

/// A method bound to its receiver, ready to be called with raw arguments.
///
/// Every supplied argument is first read as the exact parameter type from its
/// plain JSON form. When that fails and the argument is a document node
/// (an object with a `typeName`), it is deserialized through the reflector.
/// A missing or `null` argument takes the parameter default; optional
/// parameters without one receive `None`.
pub struct MethodWrapper<'a> {
    reflector: &'a Reflector,
    method: &'a MethodInfo,
    target: Target<'a>,
}

impl<'a> MethodWrapper<'a> {
    /// Binds `method` without an explicit receiver.
    ///
    /// An instance method is called on a default instance of its declaring
    /// type, constructed on the first call and kept for later calls.
    pub fn new(reflector: &'a Reflector, method: &'a MethodInfo) -> Self {
        let target = if method.is_static() {
            Target::None
        } else {
            Target::Lazy(None)
        };
        Self::bind(reflector, method, target)
    }

    /// Binds an instance method to `target`.
    pub fn with_target(
        reflector: &'a Reflector,
        method: &'a MethodInfo,
        target: &'a mut dyn Reflect,
    ) -> Self {
        Self::bind(reflector, method, Target::Borrowed(target))
    }

    fn bind(reflector: &'a Reflector, method: &'a MethodInfo, target: Target<'a>) -> Self {
        // Document arguments name their types.
        let mut types = reflector.types_mut();
        for parameter in method.parameters() {
            types.register_info(parameter.type_info());
        }
        drop(types);

        Self {
            reflector,
            method,
            target,
        }
    }

    #[inline]
    pub fn method(&self) -> &'a MethodInfo {
        self.method
    }

    /// The receiver, if bound or already constructed.
    pub fn target(&self) -> Option<&dyn Reflect> {
        match &self.target {
            Target::None => None,
            Target::Borrowed(target) => Some(&**target),
            Target::Lazy(target) => target.as_deref(),
        }
    }

    // -------------------------------------------------------------------------
    // Invoke

    /// Calls the method with positional arguments.
    #[inline]
    pub async fn invoke(&mut self, args: &[Json]) -> CallResult {
        self.invoke_with(Arguments::Positional(args)).await
    }

    /// Calls the method with arguments matched by parameter name.
    #[inline]
    pub async fn invoke_named(&mut self, args: &serde_json::Map<String, Json>) -> CallResult {
        self.invoke_with(Arguments::Named(args)).await
    }

    /// Calls the method, awaiting a pending result.
    pub async fn invoke_with(&mut self, args: Arguments<'_>) -> CallResult {
        let method = self.method;
        let result = match self.start(args) {
            Ok(CallOutput::Ready(value)) => Ok(value),
            Ok(CallOutput::Pending(future)) => future.await,
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            warn!(
                "`{}::{}` failed: {err}",
                method.declaring_type().type_path(),
                method.name(),
            );
        }
        result
    }

    /// Calls the method on the current thread, blocking on a pending result.
    pub fn invoke_blocking<'j>(&mut self, args: impl Into<Arguments<'j>>) -> CallResult {
        futures_lite::future::block_on(self.invoke_with(args.into()))
    }

    /// Calls the method and serializes the result.
    ///
    /// `None` for a method without a declared return type that returned
    /// nothing, an absent node when a declared return type got no value.
    pub async fn invoke_to_document(
        &mut self,
        args: Arguments<'_>,
    ) -> Result<Option<DocumentNode>, InvokeError> {
        let value = self.invoke_with(args).await?;
        let returns = self.method.return_type();
        let node = match value {
            Some(value) => Some(self.reflector.serialize(
                Some(&*value),
                None,
                None,
                true,
                self.reflector.config().flags,
            )?),
            None => returns.map(|info| DocumentNode::absent(info.type_path(), None)),
        };
        Ok(node)
    }

    fn start(&mut self, args: Arguments<'_>) -> Result<CallOutput, InvokeError> {
        let args = self.convert_all(args)?;
        let method = self.method;
        match method.body() {
            MethodBody::Static(body) => body(args),
            MethodBody::Instance(body) => {
                let target = self.receiver()?.ok_or(InvokeError::NoTarget(method.name()))?;
                body(target, args)
            }
        }
    }

    fn receiver(&mut self) -> Result<Option<&mut dyn Reflect>, InvokeError> {
        match &mut self.target {
            Target::None => Ok(None),
            Target::Borrowed(target) => Ok(Some(&mut **target)),
            Target::Lazy(slot) => {
                if slot.is_none() {
                    let info = self.method.declaring_type();
                    match info.default_value() {
                        Some(instance) => *slot = Some(instance),
                        None => return Ok(None),
                    }
                }
                Ok(slot.as_deref_mut())
            }
        }
    }

    // -------------------------------------------------------------------------
    // Arguments

    fn convert_all(&self, args: Arguments<'_>) -> Result<Args, InvokeError> {
        let method = self.method;
        let parameters = method.parameters();

        let supplied: Vec<Option<&Json>> = match args {
            Arguments::Positional(values) => {
                if values.len() > parameters.len() {
                    return Err(InvokeError::TooManyArguments {
                        method: method.name(),
                        expected: parameters.len(),
                        found: values.len(),
                    });
                }
                (0..parameters.len()).map(|index| values.get(index)).collect()
            }
            Arguments::Named(map) => {
                if let Some(name) = map.keys().find(|name| method.parameter(name).is_none()) {
                    return Err(InvokeError::UnknownParameter {
                        method: method.name(),
                        name: name.clone(),
                    });
                }
                parameters.iter().map(|p| map.get(p.name())).collect()
            }
        };

        let mut args = Args::new();
        for (parameter, raw) in parameters.iter().zip(supplied) {
            args.push(parameter.name(), self.convert(parameter, raw)?);
        }
        Ok(args)
    }

    fn convert(
        &self,
        parameter: &ParameterInfo,
        raw: Option<&Json>,
    ) -> Result<Box<dyn Reflect>, InvokeError> {
        let info = parameter.type_info();
        let conversion = |source| InvokeError::ArgumentConversion {
            parameter: parameter.name().to_owned(),
            type_path: info.type_path(),
            source,
        };

        let raw = match raw {
            Some(raw) if !raw.is_null() => raw,
            _ => {
                if let Some(value) = parameter.default_value() {
                    return Ok(value);
                }
                return match info.as_optional() {
                    Some(optional) => optional.from_inner(None).map_err(|value| {
                        conversion(ReflectError::TypeMismatch {
                            expected: info.type_path(),
                            found: value.reflect_type_path(),
                        })
                    }),
                    None => Err(InvokeError::MissingParameter(parameter.name().to_owned())),
                };
            }
        };

        match self.reflector.deserialize_json(raw, info) {
            Ok(value) => Ok(value),
            Err(err) if err.is_fatal() => Err(conversion(err)),
            Err(err) => match as_document(raw) {
                Some(node) => {
                    trace!("argument `{}` read as a document node", parameter.name());
                    self.from_document(&node, info).map_err(conversion)
                }
                None => Err(conversion(err)),
            },
        }
    }

    fn from_document(
        &self,
        node: &DocumentNode,
        declared: &'static TypeInfo,
    ) -> Result<Box<dyn Reflect>, ReflectError> {
        let info = self.reflector.resolve_member(node, declared)?;
        let mut report = od_reflect::document::PopulateReport::new();
        let value = self.reflector.deserialize_as(node, info, &mut report, 0)?;
        for entry in report.entries() {
            trace!("{entry}");
        }
        Ok(value)
    }
}

/// `raw` as a document node, if it looks like one.
fn as_document(raw: &Json) -> Option<DocumentNode> {
    let Json::Object(map) = raw else {
        return None;
    };
    if !map.contains_key("typeName") {
        return None;
    }
    serde_json::from_value(raw.clone()).ok()
}

impl fmt::Debug for MethodWrapper<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodWrapper")
            .field("method", &self.method.name())
            .field("target", &self.target())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParameterInfo;
    use od_reflect::derive::Reflect;
    use od_reflect::document::Value;
    use serde_json::json;

    #[derive(Reflect)]
    #[reflect(type_path = "demo::Math")]
    struct Math {}

    #[derive(Reflect, Default)]
    #[reflect(default, type_path = "demo::Vec2")]
    struct Vec2 {
        pub x: f32,
        pub y: f32,
    }

    #[derive(Reflect, Default)]
    #[reflect(default, type_path = "demo::Counter")]
    struct Counter {
        pub count: u32,
    }

    fn add() -> MethodInfo {
        MethodInfo::new_static::<Math>("add", |mut args| {
            let a: i32 = args.take(0)?;
            let b: i32 = args.take(1)?;
            Ok(CallOutput::ready(a + b))
        })
        .with_parameter(ParameterInfo::new::<i32>("a"))
        .with_parameter(ParameterInfo::new::<i32>("b"))
        .with_return::<i32>()
    }

    fn bump() -> MethodInfo {
        MethodInfo::new_instance::<Counter>("bump", |counter, mut args| {
            counter.count += args.take::<u32>(0)?;
            Ok(CallOutput::ready(counter.count))
        })
        .with_parameter(ParameterInfo::new::<u32>("by").with_default(1_u32))
        .with_return::<u32>()
    }

    fn result<T: od_reflect::info::Typed>(result: CallResult) -> T {
        result.unwrap().unwrap().take::<T>().unwrap()
    }

    #[test]
    fn named_arguments() {
        let reflector = Reflector::new();
        let add = add();
        let mut wrapper = MethodWrapper::new(&reflector, &add);

        assert_eq!(result::<i32>(wrapper.invoke_blocking(&json!({ "b": 3, "a": 2 }))), 5);
        assert_eq!(result::<i32>(wrapper.invoke_blocking(&json!([2, 3]))), 5);
    }

    #[test]
    fn argument_errors() {
        let reflector = Reflector::new();
        let add = add();
        let mut wrapper = MethodWrapper::new(&reflector, &add);

        assert!(matches!(
            wrapper.invoke_blocking(&json!({ "a": 2 })),
            Err(InvokeError::MissingParameter(name)) if name == "b"
        ));
        assert!(matches!(
            wrapper.invoke_blocking(&json!({ "a": 2, "b": null })),
            Err(InvokeError::MissingParameter(name)) if name == "b"
        ));
        assert!(matches!(
            wrapper.invoke_blocking(&json!([1, 2, 3])),
            Err(InvokeError::TooManyArguments { expected: 2, found: 3, .. })
        ));
        assert!(matches!(
            wrapper.invoke_blocking(&json!({ "a": 1, "b": 2, "c": 3 })),
            Err(InvokeError::UnknownParameter { name, .. }) if name == "c"
        ));
        assert!(matches!(
            wrapper.invoke_blocking(&json!({ "a": "two", "b": 2 })),
            Err(InvokeError::ArgumentConversion { parameter, .. }) if parameter == "a"
        ));
    }

    #[test]
    fn defaults_and_optional_parameters() {
        let greet = MethodInfo::new_static::<Math>("greet", |mut args| {
            let name: String = args.take(0)?;
            let suffix: Option<String> = args.take(1)?;
            let times: u8 = args.take(2)?;
            let once = format!("{name}{}", suffix.unwrap_or_default());
            Ok(CallOutput::ready(once.repeat(times as usize)))
        })
        .with_parameter(ParameterInfo::new::<String>("name"))
        .with_parameter(ParameterInfo::new::<Option<String>>("suffix"))
        .with_parameter(ParameterInfo::new::<u8>("times").with_default(1_u8));

        let reflector = Reflector::new();
        let mut wrapper = MethodWrapper::new(&reflector, &greet);

        assert_eq!(result::<String>(wrapper.invoke_blocking(&json!({ "name": "hi" }))), "hi");
        assert_eq!(
            result::<String>(wrapper.invoke_blocking(&json!(["hi", "!", 2]))),
            "hi!hi!",
        );
    }

    #[test]
    fn document_arguments() {
        let length = MethodInfo::new_static::<Vec2>("length", |mut args| {
            let v: Vec2 = args.take(0)?;
            Ok(CallOutput::ready((v.x * v.x + v.y * v.y).sqrt()))
        })
        .with_parameter(ParameterInfo::new::<Vec2>("v"));

        let reflector = Reflector::new();
        let mut wrapper = MethodWrapper::new(&reflector, &length);

        let plain = json!({ "v": { "x": 3.0, "y": 4.0 } });
        assert_eq!(result::<f32>(wrapper.invoke_blocking(&plain)), 5.0);

        let document = json!({ "v": {
            "typeName": "Vec2",
            "fields": [
                { "name": "x", "typeName": "f32", "value": 3.0 },
                { "name": "y", "typeName": "f32", "value": 4.0 },
            ],
        }});
        assert_eq!(result::<f32>(wrapper.invoke_blocking(&document)), 5.0);

        let wrong = json!({ "v": { "typeName": "Math" } });
        assert!(matches!(
            wrapper.invoke_blocking(&wrong),
            Err(InvokeError::ArgumentConversion { parameter, .. }) if parameter == "v"
        ));
    }

    #[test]
    fn pending_results_are_awaited() {
        let later = MethodInfo::new_static::<Math>("later", |_| {
            Ok(CallOutput::pending(async {
                Ok(Some(Box::new(7_u64) as Box<dyn Reflect>))
            }))
        });

        let reflector = Reflector::new();
        let mut wrapper = MethodWrapper::new(&reflector, &later);
        assert_eq!(result::<u64>(wrapper.invoke_blocking(&Json::Null)), 7);
    }

    #[test]
    fn instance_targets() {
        let reflector = Reflector::new();
        let bump = bump();

        let mut counter = Counter { count: 10 };
        let mut wrapper = MethodWrapper::with_target(&reflector, &bump, &mut counter);
        assert_eq!(result::<u32>(wrapper.invoke_blocking(&json!([5]))), 15);
        drop(wrapper);
        assert_eq!(counter.count, 15);

        let mut lazy = MethodWrapper::new(&reflector, &bump);
        assert!(lazy.target().is_none());
        assert_eq!(result::<u32>(lazy.invoke_blocking(&Json::Null)), 1);
        assert_eq!(result::<u32>(lazy.invoke_blocking(&Json::Null)), 2);
        assert!(lazy.target().unwrap().is::<Counter>());
    }

    #[test]
    fn instance_without_default_has_no_target() {
        let method = MethodInfo::new_instance::<Math>("noop", |_, _| Ok(CallOutput::empty()));

        let reflector = Reflector::new();
        let mut wrapper = MethodWrapper::new(&reflector, &method);
        assert!(matches!(
            wrapper.invoke_blocking(&Json::Null),
            Err(InvokeError::NoTarget("noop"))
        ));
    }

    #[test]
    fn failures_and_documents() {
        let fail = MethodInfo::new_static::<Math>("fail", |_| {
            Err(InvokeError::Failed(String::from("boom")))
        });
        let reflector = Reflector::new();

        let mut wrapper = MethodWrapper::new(&reflector, &fail);
        assert!(matches!(
            wrapper.invoke_blocking(&Json::Null),
            Err(InvokeError::Failed(message)) if message == "boom"
        ));

        let add = add();
        let mut wrapper = MethodWrapper::new(&reflector, &add);
        let args = json!([2, 3]);
        let node = futures_lite::future::block_on(wrapper.invoke_to_document((&args).into()))
            .unwrap()
            .unwrap();
        assert_eq!(node.type_name, "i32");
        assert_eq!(node.value, Some(Value::Int(5)));
    }
}
