use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::document::{Value, ValueError};

/// One node of a self-describing document.
///
/// - `name`: member or parameter label, `"[i]"` for list items, absent at the root.
/// - `type_name`: the type path of the described value. Never empty in a valid node.
/// - `value`: leaf payload, a handle for reference types.
/// - `fields` / `props`: ordered children for data fields and accessor properties.
///
/// A node with neither a value nor children is an explicit "no data" leaf.
///
/// ```
/// use od_reflect::DocumentNode;
///
/// let node = DocumentNode::new("demo::Point")
///     .with_field(DocumentNode::from_value("i32", Some("x"), 9));
///
/// let json = serde_json::to_string(&node).unwrap();
/// assert_eq!(
///     json,
///     r#"{"typeName":"demo::Point","fields":[{"name":"x","typeName":"i32","value":9}]}"#,
/// );
/// assert_eq!(serde_json::from_str::<DocumentNode>(&json).unwrap(), node);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<DocumentNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub props: Vec<DocumentNode>,
}

impl DocumentNode {
    /// A root node of the given type, without payload.
    #[inline]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// An opaque leaf carrying `value`.
    pub fn from_value(
        type_name: impl Into<String>,
        name: Option<&str>,
        value: impl Into<Value>,
    ) -> Self {
        Self::new(type_name)
            .with_name(name)
            .with_value(value)
    }

    /// A leaf carrying a raw JSON payload.
    ///
    /// Only scalar payloads (and the `{"$bytes": [..]}` form) are accepted.
    pub fn from_raw(
        type_name: impl Into<String>,
        name: Option<&str>,
        raw: &serde_json::Value,
    ) -> Result<Self, ValueError> {
        let value = Value::from_json(raw)?;
        Ok(Self::from_value(type_name, name, value))
    }

    /// The node of an absent source value: only the type is recorded.
    #[inline]
    pub fn absent(type_name: impl Into<String>, name: Option<&str>) -> Self {
        Self::new(type_name).with_name(name)
    }

    #[inline]
    pub fn with_name(mut self, name: Option<&str>) -> Self {
        self.name = name.map(ToOwned::to_owned);
        self
    }

    #[inline]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[inline]
    pub fn with_field(mut self, field: DocumentNode) -> Self {
        self.fields.push(field);
        self
    }

    #[inline]
    pub fn with_prop(mut self, prop: DocumentNode) -> Self {
        self.props.push(prop);
        self
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The first field child named `name`.
    pub fn field(&self, name: &str) -> Option<&DocumentNode> {
        self.fields.iter().find(|n| n.name() == Some(name))
    }

    /// The first property child named `name`.
    pub fn prop(&self, name: &str) -> Option<&DocumentNode> {
        self.props.iter().find(|n| n.name() == Some(name))
    }

    /// A node without value and without children.
    ///
    /// An explicit `null` value counts as no value.
    #[inline]
    pub fn is_empty_leaf(&self) -> bool {
        self.value.as_ref().is_none_or(Value::is_null)
            && self.fields.is_empty()
            && self.props.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_members_are_omitted() {
        let node = DocumentNode::absent("core::option::Option<i32>", Some("maybe"));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "maybe", "typeName": "core::option::Option<i32>" })
        );
        assert!(node.is_empty_leaf());
    }

    #[test]
    fn raw_payloads() {
        let node = DocumentNode::from_raw("i32", None, &serde_json::json!(42)).unwrap();
        assert_eq!(node.value, Some(Value::Int(42)));
        assert!(!node.is_empty_leaf());

        let err = DocumentNode::from_raw("i32", None, &serde_json::json!([1])).unwrap_err();
        assert_eq!(err, ValueError::NotScalar);
    }

    #[test]
    fn lookup_children() {
        let node = DocumentNode::new("demo::Rect")
            .with_field(DocumentNode::from_value("i32", Some("w"), 3))
            .with_prop(DocumentNode::from_value("i32", Some("area"), 9));

        assert_eq!(node.field("w").and_then(|n| n.value.clone()), Some(Value::Int(3)));
        assert!(node.field("area").is_none());
        assert!(node.prop("area").is_some());
    }

    #[test]
    fn missing_type_name_parses_as_empty() {
        let node: DocumentNode = serde_json::from_str(r#"{"value": 1}"#).unwrap();
        assert!(node.type_name.is_empty());
    }
}
