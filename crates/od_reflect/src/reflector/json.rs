use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec::Vec;

use serde_json::Value as Json;

use crate::document::Value;
use crate::handler::EnumHandler;
use crate::info::{TypeInfo, TypeKind};
use crate::ops::ReflectMut;
use crate::reflector::guard::Visit;
use crate::{Reflect, ReflectError, Reflector};

fn json_kind(raw: &Json) -> &'static str {
    match raw {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

impl Reflector {
    /// Builds an instance of `info` from plain JSON shaped like its schema.
    ///
    /// Objects map to struct members by name, arrays to list items, `null` to
    /// `None`, scalars to leaf values and enum variants. Unlike
    /// [`deserialize`](Self::deserialize) the walk is strict: an unknown or
    /// read-only member is an error.
    ///
    /// ```
    /// use od_reflect::Reflector;
    /// use od_reflect::info::Typed;
    ///
    /// let reflector = Reflector::new();
    /// let raw = serde_json::json!([1, null, 3]);
    /// let value = reflector
    ///     .deserialize_json(&raw, <Vec<Option<u8>>>::type_info())
    ///     .unwrap();
    /// assert_eq!(value.take::<Vec<Option<u8>>>().unwrap(), [Some(1), None, Some(3)]);
    /// ```
    pub fn deserialize_json(
        &self,
        raw: &Json,
        info: &'static TypeInfo,
    ) -> Result<Box<dyn Reflect>, ReflectError> {
        let _visit = Visit::enter_anonymous(self.config.max_depth)?;
        let mismatch = || ReflectError::TypeMismatch {
            expected: info.type_path(),
            found: json_kind(raw),
        };

        match info.kind() {
            TypeKind::Primitive(primitive) => {
                let value = Value::from_json(raw)?;
                Ok(primitive.from_value(&value)?)
            }
            TypeKind::Enum(enum_info) => {
                let value = Value::from_json(raw)?;
                EnumHandler::variant(info, enum_info, &value)
            }
            TypeKind::Optional(optional) => {
                let inner = match raw {
                    Json::Null => None,
                    raw => Some(self.deserialize_json(raw, optional.inner_info())?),
                };
                optional
                    .from_inner(inner)
                    .map_err(|rejected| ReflectError::TypeMismatch {
                        expected: optional.inner_info().type_path(),
                        found: rejected.reflect_type_path(),
                    })
            }
            TypeKind::List(list) => {
                let Json::Array(raw_items) = raw else {
                    return Err(mismatch());
                };
                let items = raw_items
                    .iter()
                    .map(|item| self.deserialize_json(item, list.item_info()))
                    .collect::<Result<Vec<_>, _>>()?;
                list.from_items(items).map_err(|_| match list.fixed_len() {
                    Some(expected) => ReflectError::LengthMismatch {
                        type_path: info.type_path(),
                        expected,
                        found: raw_items.len(),
                    },
                    None => mismatch(),
                })
            }
            TypeKind::Struct(struct_info) => {
                let Json::Object(members) = raw else {
                    return Err(mismatch());
                };
                let mut value = info
                    .default_value()
                    .ok_or(ReflectError::NoDefault(info.type_path()))?;
                let ReflectMut::Struct(target) = value.reflect_mut() else {
                    return Err(mismatch());
                };
                let unknown = |name: &str| ReflectError::UnknownMember {
                    type_path: info.type_path(),
                    name: name.to_string(),
                };

                for (name, raw_member) in members {
                    if let Some(field) = struct_info.field(name).filter(|f| f.is_writable()) {
                        let member = self.deserialize_json(raw_member, field.type_info())?;
                        let slot = target.field_mut(name).ok_or_else(|| unknown(name))?;
                        slot.set(member).map_err(|rejected| ReflectError::TypeMismatch {
                            expected: field.type_info().type_path(),
                            found: rejected.reflect_type_path(),
                        })?;
                    } else if let Some(property) =
                        struct_info.property(name).filter(|p| p.is_writable())
                    {
                        let member = self.deserialize_json(raw_member, property.type_info())?;
                        target.set_property(name, member).map_err(|rejected| {
                            ReflectError::TypeMismatch {
                                expected: property.type_info().type_path(),
                                found: rejected.reflect_type_path(),
                            }
                        })?;
                    } else {
                        return Err(unknown(name));
                    }
                }
                Ok(value)
            }
            TypeKind::Opaque => Err(ReflectError::UnsupportedType(info.type_path())),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::derive::Reflect;
    use crate::document::ValueError;
    use crate::info::Typed;
    use crate::{ReflectError, Reflector};

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Settings {
        pub volume: u8,
        pub label: Option<String>,
        #[reflect(readonly)]
        pub version: u32,
    }

    #[test]
    fn objects_fill_struct_members() {
        let reflector = Reflector::new();
        let raw = serde_json::json!({ "volume": 7, "label": "main" });
        let value = reflector
            .deserialize_json(&raw, Settings::type_info())
            .unwrap();
        assert_eq!(
            value.take::<Settings>().unwrap(),
            Settings {
                volume: 7,
                label: Some(String::from("main")),
                version: 0,
            }
        );
    }

    #[test]
    fn strict_members_and_ranges() {
        let reflector = Reflector::new();
        let info = Settings::type_info();

        let unknown = serde_json::json!({ "loudness": 1 });
        assert!(matches!(
            reflector.deserialize_json(&unknown, info),
            Err(ReflectError::UnknownMember { .. })
        ));

        let readonly = serde_json::json!({ "version": 2 });
        assert!(matches!(
            reflector.deserialize_json(&readonly, info),
            Err(ReflectError::UnknownMember { .. })
        ));

        let too_loud = serde_json::json!({ "volume": 300 });
        assert!(matches!(
            reflector.deserialize_json(&too_loud, info),
            Err(ReflectError::InvalidValue(ValueError::OutOfRange { .. }))
        ));

        let wrong_shape = serde_json::json!([1]);
        assert!(matches!(
            reflector.deserialize_json(&wrong_shape, info),
            Err(ReflectError::TypeMismatch { found: "array", .. })
        ));
    }
}
