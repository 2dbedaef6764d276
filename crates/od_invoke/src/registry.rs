use log::debug;
use od_utils::hash::HashMap;

use crate::MethodInfo;

// -----------------------------------------------------------------------------
// MethodQuery

/// Criteria selecting methods of a [`MethodRegistry`]. Unset criteria match
/// everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct MethodQuery<'q> {
    declaring: Option<&'q str>,
    name: Option<&'q str>,
    parameters: Option<&'q [&'q str]>,
}

impl<'q> MethodQuery<'q> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            declaring: None,
            name: None,
            parameters: None,
        }
    }

    /// Methods declared by the type with this path or short name.
    #[inline]
    pub const fn declared_by(mut self, type_name: &'q str) -> Self {
        self.declaring = Some(type_name);
        self
    }

    #[inline]
    pub const fn named(mut self, name: &'q str) -> Self {
        self.name = Some(name);
        self
    }

    /// Methods whose parameter names are exactly `parameters`, in order.
    #[inline]
    pub const fn with_parameters(mut self, parameters: &'q [&'q str]) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn matches(&self, method: &MethodInfo) -> bool {
        let declaring = method.declaring_type();
        self.declaring
            .is_none_or(|t| t == declaring.type_path() || t == declaring.type_name())
            && self.name.is_none_or(|name| name == method.name())
            && self.parameters.is_none_or(|names| {
                names.len() == method.parameters().len()
                    && names
                        .iter()
                        .zip(method.parameters())
                        .all(|(name, parameter)| *name == parameter.name())
            })
    }
}

// -----------------------------------------------------------------------------
// MethodRegistry

/// Methods available for dynamic invocation, grouped by declaring type.
///
/// A type may declare several methods with the same name as long as their
/// parameter lists differ.
#[derive(Default)]
pub struct MethodRegistry {
    methods: Vec<MethodInfo>,
    by_type: HashMap<&'static str, Vec<usize>>,
}

impl MethodRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `method`, returning `false` if an identical signature exists.
    pub fn register(&mut self, method: MethodInfo) -> bool {
        let declaring = method.declaring_type().type_path();
        let names: Vec<&str> = method.parameters().iter().map(|p| p.name()).collect();
        let query = MethodQuery::new()
            .declared_by(declaring)
            .named(method.name())
            .with_parameters(&names);
        if self.find(&query).next().is_some() {
            return false;
        }

        debug!("registered method `{declaring}::{}`", method.name());
        self.by_type
            .entry(declaring)
            .or_default()
            .push(self.methods.len());
        self.methods.push(method);
        true
    }

    /// The first method of `type_path` called `name`.
    pub fn get(&self, type_path: &str, name: &str) -> Option<&MethodInfo> {
        self.methods_of(type_path).find(|m| m.name() == name)
    }

    /// Methods declared by `type_path`, in registration order.
    pub fn methods_of(&self, type_path: &str) -> impl Iterator<Item = &MethodInfo> {
        self.by_type
            .get(type_path)
            .into_iter()
            .flatten()
            .map(|&index| &self.methods[index])
    }

    pub fn find<'r>(&'r self, query: &MethodQuery<'_>) -> impl Iterator<Item = &'r MethodInfo> {
        let query = *query;
        self.methods.iter().filter(move |m| query.matches(m))
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &MethodInfo> {
        self.methods.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl core::fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.methods.iter().map(MethodInfo::name)).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CallOutput, ParameterInfo};
    use od_reflect::derive::Reflect;

    #[derive(Reflect)]
    #[reflect(type_path = "demo::Tools")]
    struct Tools {}

    fn method(name: &'static str, parameters: &[&'static str]) -> MethodInfo {
        parameters.iter().fold(
            MethodInfo::new_static::<Tools>(name, |_| Ok(CallOutput::empty())),
            |method, p| method.with_parameter(ParameterInfo::new::<i32>(*p)),
        )
    }

    #[test]
    fn overloads_and_duplicates() {
        let mut registry = MethodRegistry::new();
        assert!(registry.register(method("move", &["x"])));
        assert!(registry.register(method("move", &["x", "y"])));
        assert!(!registry.register(method("move", &["x"])));
        assert!(registry.register(method("stop", &[])));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.methods_of("demo::Tools").count(), 3);
        assert_eq!(registry.get("demo::Tools", "stop").unwrap().name(), "stop");
        assert!(registry.get("demo::Other", "stop").is_none());
    }

    #[test]
    fn queries() {
        let mut registry = MethodRegistry::new();
        registry.register(method("move", &["x"]));
        registry.register(method("move", &["x", "y"]));

        let by_name = MethodQuery::new().declared_by("Tools").named("move");
        assert_eq!(registry.find(&by_name).count(), 2);

        let two = by_name.with_parameters(&["x", "y"]);
        let found: Vec<_> = registry.find(&two).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].parameters().len(), 2);

        let none = MethodQuery::new().declared_by("demo::Other");
        assert_eq!(registry.find(&none).count(), 0);
    }
}
