use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Key of the JSON object used to carry [`Value::Bytes`].
const BYTES_KEY: &str = "$bytes";

// -----------------------------------------------------------------------------
// ValueError

/// A leaf value could not be converted.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("value {value} is out of range for `{target}`")]
    OutOfRange { value: String, target: &'static str },
    #[error("`{value}` is not a variant of `{target}`")]
    UnknownVariant { value: String, target: &'static str },
    #[error("structured payloads cannot be used as a leaf value")]
    NotScalar,
}

// -----------------------------------------------------------------------------
// Value

/// The leaf payload of a [`DocumentNode`](crate::DocumentNode).
///
/// Unsigned integers that fit in `i64` are always stored as [`Value::Int`],
/// so a value keeps its variant through a JSON round trip.
///
/// ```
/// use od_reflect::document::Value;
///
/// assert_eq!(Value::from(7_u32), Value::Int(7));
/// assert_eq!(Value::from(u64::MAX), Value::UInt(u64::MAX));
///
/// let json = serde_json::to_string(&Value::Bytes(vec![1, 2])).unwrap();
/// assert_eq!(json, r#"{"$bytes":[1,2]}"#);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::UInt(_) => "integer",
            Self::Float(_) => "number",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Normalizing constructor for unsigned integers.
    #[inline]
    pub fn from_u64(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(v) => Self::Int(v),
            Err(_) => Self::UInt(value),
        }
    }

    fn mismatch(&self, expected: &'static str) -> ValueError {
        ValueError::Mismatch {
            expected,
            found: self.kind_name(),
        }
    }

    /// Reads a boolean, also accepting `"true"` and `"false"`.
    pub fn to_bool(&self) -> Result<bool, ValueError> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::String(s) => match s.trim() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(self.mismatch("boolean")),
            },
            _ => Err(self.mismatch("boolean")),
        }
    }

    /// Reads an integer of type `T`, checking its range.
    ///
    /// Integral floats and numeric strings are accepted.
    pub fn to_int<T>(&self, target: &'static str) -> Result<T, ValueError>
    where
        T: TryFrom<i64> + TryFrom<u64>,
    {
        let out_of_range = || ValueError::OutOfRange {
            value: self.to_string(),
            target,
        };
        match self {
            Self::Int(v) => T::try_from(*v).map_err(|_| out_of_range()),
            Self::UInt(v) => T::try_from(*v).map_err(|_| out_of_range()),
            Self::Float(f) => {
                if !f.is_finite() || f.fract() != 0.0 {
                    return Err(out_of_range());
                }
                if *f < 0.0 {
                    if *f < i64::MIN as f64 {
                        return Err(out_of_range());
                    }
                    T::try_from(*f as i64).map_err(|_| out_of_range())
                } else {
                    if *f >= u64::MAX as f64 {
                        return Err(out_of_range());
                    }
                    T::try_from(*f as u64).map_err(|_| out_of_range())
                }
            }
            Self::String(s) => {
                let s = s.trim();
                if let Ok(v) = s.parse::<i64>() {
                    T::try_from(v).map_err(|_| out_of_range())
                } else if let Ok(v) = s.parse::<u64>() {
                    T::try_from(v).map_err(|_| out_of_range())
                } else {
                    Err(self.mismatch("integer"))
                }
            }
            _ => Err(self.mismatch("integer")),
        }
    }

    /// Reads a floating point number, also accepting integers and numeric strings.
    pub fn to_f64(&self) -> Result<f64, ValueError> {
        match self {
            Self::Float(f) => Ok(*f),
            Self::Int(v) => Ok(*v as f64),
            Self::UInt(v) => Ok(*v as f64),
            Self::String(s) => s.trim().parse().map_err(|_| self.mismatch("number")),
            _ => Err(self.mismatch("number")),
        }
    }

    /// Converts a raw JSON payload.
    ///
    /// Arrays and objects are rejected with [`ValueError::NotScalar`], except
    /// the `{"$bytes": [..]}` form.
    pub fn from_json(raw: &serde_json::Value) -> Result<Self, ValueError> {
        use serde_json::Value as Json;

        match raw {
            Json::Null => Ok(Self::Null),
            Json::Bool(b) => Ok(Self::Bool(*b)),
            Json::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Ok(Self::Int(v))
                } else if let Some(v) = n.as_u64() {
                    Ok(Self::UInt(v))
                } else {
                    n.as_f64().map(Self::Float).ok_or(ValueError::NotScalar)
                }
            }
            Json::String(s) => Ok(Self::String(s.clone())),
            Json::Object(map) if map.len() == 1 => match map.get(BYTES_KEY) {
                Some(Json::Array(items)) => items
                    .iter()
                    .map(|item| {
                        item.as_u64()
                            .and_then(|v| u8::try_from(v).ok())
                            .ok_or(ValueError::NotScalar)
                    })
                    .collect::<Result<Vec<u8>, _>>()
                    .map(Self::Bytes),
                _ => Err(ValueError::NotScalar),
            },
            _ => Err(ValueError::NotScalar),
        }
    }

    /// The raw JSON form of the value.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Self::Null => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Int(v) => Json::from(*v),
            Self::UInt(v) => Json::from(*v),
            Self::Float(f) => Json::from(*f),
            Self::String(s) => Json::String(s.clone()),
            Self::Bytes(bytes) => {
                let mut map = serde_json::Map::new();
                map.insert(BYTES_KEY.to_owned(), Json::from(bytes.clone()));
                Json::Object(map)
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
            Self::Bytes(bytes) => write!(f, "{bytes:?}"),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::Int(value as i64)
            }
        }
    )*};
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::from_u64(value as u64)
            }
        }
    )*};
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f32> for Value {
    #[inline]
    fn from(value: f32) -> Self {
        Self::Float(value as f64)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<char> for Value {
    #[inline]
    fn from(value: char) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<Vec<u8>> for Value {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

// -----------------------------------------------------------------------------
// Serde

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::UInt(v) => serializer.serialize_u64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::String(s) => serializer.serialize_str(s),
            Self::Bytes(bytes) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(BYTES_KEY, bytes)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar value or a `$bytes` object")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from_u64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Value, E> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, _seq: A) -> Result<Value, A::Error> {
        Err(de::Error::custom(ValueError::NotScalar))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let Some(key) = map.next_key::<String>()? else {
            return Err(de::Error::custom(ValueError::NotScalar));
        };
        if key != BYTES_KEY {
            return Err(de::Error::custom(ValueError::NotScalar));
        }
        let bytes = map.next_value::<Vec<u8>>()?;
        if map.next_key::<String>()?.is_some() {
            return Err(de::Error::custom(ValueError::NotScalar));
        }
        Ok(Value::Bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn integer_conversion_checks_range() {
        assert_eq!(Value::Int(200).to_int::<u8>("u8"), Ok(200));
        assert!(matches!(
            Value::Int(300).to_int::<u8>("u8"),
            Err(ValueError::OutOfRange { target: "u8", .. })
        ));
        assert_eq!(Value::Float(4.0).to_int::<i32>("i32"), Ok(4));
        assert!(Value::Float(4.5).to_int::<i32>("i32").is_err());
        assert_eq!(Value::from(" -12 ").to_int::<i16>("i16"), Ok(-12));
        assert_eq!(Value::UInt(u64::MAX).to_int::<u64>("u64"), Ok(u64::MAX));
        assert!(Value::Bool(true).to_int::<i32>("i32").is_err());
    }

    #[test]
    fn json_forms() {
        let values = vec![
            Value::Null,
            Value::Bool(true),
            Value::Int(-3),
            Value::UInt(u64::MAX),
            Value::Float(1.5),
            Value::from("text"),
            Value::Bytes(vec![0, 255]),
        ];
        for value in values {
            let text = serde_json::to_string(&value).unwrap();
            let back: Value = serde_json::from_str(&text).unwrap();
            assert_eq!(back, value);
            assert_eq!(Value::from_json(&value.to_json()).unwrap(), value);
        }
    }

    #[test]
    fn structured_payloads_are_rejected() {
        let raw = serde_json::json!({ "a": 1 });
        assert_eq!(Value::from_json(&raw), Err(ValueError::NotScalar));
        assert!(serde_json::from_str::<Value>("[1, 2]").is_err());
        assert!(serde_json::from_str::<Value>(r#"{"x": 1}"#).is_err());
    }
}
