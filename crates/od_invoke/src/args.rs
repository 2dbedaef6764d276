use core::slice;

use od_reflect::info::Typed;
use od_reflect::{Reflect, ReflectError};
use serde_json::{Map, Value as Json};

use crate::InvokeError;

// -----------------------------------------------------------------------------
// Arguments

/// Raw arguments of an invocation.
#[derive(Clone, Copy, Debug)]
pub enum Arguments<'a> {
    /// Matched to the parameters in order.
    Positional(&'a [Json]),
    /// Matched to the parameters by name.
    Named(&'a Map<String, Json>),
}

impl<'a> From<&'a [Json]> for Arguments<'a> {
    #[inline]
    fn from(value: &'a [Json]) -> Self {
        Self::Positional(value)
    }
}

impl<'a> From<&'a Map<String, Json>> for Arguments<'a> {
    #[inline]
    fn from(value: &'a Map<String, Json>) -> Self {
        Self::Named(value)
    }
}

/// An array is positional, an object named and `null` empty; any other value
/// is the single positional argument.
impl<'a> From<&'a Json> for Arguments<'a> {
    fn from(value: &'a Json) -> Self {
        match value {
            Json::Array(values) => Self::Positional(values),
            Json::Object(map) => Self::Named(map),
            Json::Null => Self::Positional(&[]),
            other => Self::Positional(slice::from_ref(other)),
        }
    }
}

// -----------------------------------------------------------------------------
// Args

/// Converted arguments, one per parameter in declaration order.
///
/// Each value can be taken once.
#[derive(Debug, Default)]
pub struct Args {
    values: Vec<(&'static str, Option<Box<dyn Reflect>>)>,
}

impl Args {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, name: &'static str, value: Box<dyn Reflect>) {
        self.values.push((name, Some(value)));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.values.get(index)?.1.as_deref()
    }

    pub fn get_named(&self, name: &str) -> Option<&dyn Reflect> {
        let (_, value) = self.values.iter().find(|(n, _)| *n == name)?;
        value.as_deref()
    }

    /// Moves the argument at `index` out as a `T`.
    pub fn take<T: Typed>(&mut self, index: usize) -> Result<T, InvokeError> {
        let (name, slot) = self
            .values
            .get_mut(index)
            .ok_or_else(|| InvokeError::MissingParameter(format!("#{index}")))?;
        take_slot(*name, slot)
    }

    /// Moves the argument named `name` out as a `T`.
    pub fn take_named<T: Typed>(&mut self, name: &str) -> Result<T, InvokeError> {
        let (name, slot) = self
            .values
            .iter_mut()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| InvokeError::MissingParameter(name.to_owned()))?;
        take_slot(*name, slot)
    }
}

impl FromIterator<(&'static str, Box<dyn Reflect>)> for Args {
    fn from_iter<I: IntoIterator<Item = (&'static str, Box<dyn Reflect>)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name, Some(value)))
                .collect(),
        }
    }
}

fn take_slot<T: Typed>(
    name: &'static str,
    slot: &mut Option<Box<dyn Reflect>>,
) -> Result<T, InvokeError> {
    let value = slot
        .take()
        .ok_or_else(|| InvokeError::MissingParameter(name.to_owned()))?;
    value
        .take::<T>()
        .map_err(|value| InvokeError::ArgumentConversion {
            parameter: name.to_owned(),
            type_path: T::type_path(),
            source: ReflectError::TypeMismatch {
                expected: T::type_path(),
                found: value.reflect_type_path(),
            },
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_shapes() {
        let array = json!([1, 2]);
        let object = json!({ "a": 1 });
        let scalar = json!(3);

        assert!(matches!(Arguments::from(&array), Arguments::Positional(v) if v.len() == 2));
        assert!(matches!(Arguments::from(&object), Arguments::Named(m) if m.contains_key("a")));
        assert!(matches!(Arguments::from(&Json::Null), Arguments::Positional([])));
        assert!(matches!(Arguments::from(&scalar), Arguments::Positional([v]) if *v == 3));
    }

    #[test]
    fn values_are_taken_once() {
        let mut args: Args = [
            ("a", Box::new(2_i64) as Box<dyn Reflect>),
            ("b", Box::new(String::from("x"))),
        ]
        .into_iter()
        .collect();

        assert_eq!(args.len(), 2);
        assert!(args.get_named("b").is_some());
        assert_eq!(args.take::<i64>(0).unwrap(), 2);
        assert!(matches!(
            args.take::<i64>(0),
            Err(InvokeError::MissingParameter(name)) if name == "a"
        ));
        assert!(matches!(
            args.take_named::<i64>("b"),
            Err(InvokeError::ArgumentConversion { parameter, .. }) if parameter == "b"
        ));
        assert!(args.get(1).is_none());
        assert!(matches!(args.take::<i64>(5), Err(InvokeError::MissingParameter(_))));
    }
}
