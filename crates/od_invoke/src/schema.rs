use od_reflect::Reflector;
use serde_json::{Map, Value as Json, json};

use crate::MethodInfo;

/// The JSON schema of the named arguments of `method`.
///
/// An object with one property per parameter. Every parameter without a
/// default is `required`. Struct parameter types share one `$defs` table.
pub fn arguments_schema(reflector: &Reflector, method: &MethodInfo) -> Json {
    let mut builder = reflector.schema_builder();
    let mut properties = Map::new();
    let mut required = Vec::new();

    for parameter in method.parameters() {
        let mut schema = builder.describe(parameter.type_info());
        if let (Some(docs), Json::Object(map)) = (parameter.docs(), &mut schema) {
            map.insert(String::from("description"), Json::from(docs));
        }
        properties.insert(String::from(parameter.name()), schema);
        if !parameter.has_default() {
            required.push(Json::from(parameter.name()));
        }
    }

    let mut root = json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    });
    if let (Some(docs), Json::Object(map)) = (method.docs(), &mut root) {
        map.insert(String::from("description"), Json::from(docs));
    }
    builder.finish(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CallOutput, ParameterInfo};
    use od_reflect::derive::Reflect;

    #[derive(Reflect, Default)]
    #[reflect(default, type_path = "demo::Vec2")]
    struct Vec2 {
        pub x: f32,
        pub y: f32,
    }

    #[test]
    fn required_lists_parameters_without_default() {
        let scale = MethodInfo::new_static::<Vec2>("scale", |_| Ok(CallOutput::empty()))
            .with_parameter(ParameterInfo::new::<f32>("value"))
            .with_parameter(
                ParameterInfo::new::<f32>("factor")
                    .with_default(2.0_f32)
                    .with_docs("Multiplier."),
            )
            .with_docs("Scales a value.");

        let reflector = Reflector::new();
        assert_eq!(
            arguments_schema(&reflector, &scale),
            json!({
                "type": "object",
                "properties": {
                    "value": { "type": "number" },
                    "factor": { "type": "number", "description": "Multiplier." },
                },
                "required": ["value"],
                "additionalProperties": false,
                "description": "Scales a value.",
            }),
        );
    }

    #[test]
    fn struct_parameters_are_shared_definitions() {
        let segment = MethodInfo::new_static::<Vec2>("segment", |_| Ok(CallOutput::empty()))
            .with_parameter(ParameterInfo::new::<Vec2>("from"))
            .with_parameter(ParameterInfo::new::<Option<Vec2>>("to"));

        let reflector = Reflector::new();
        let schema = arguments_schema(&reflector, &segment);

        let reference = json!({ "$ref": "#/$defs/demo::Vec2" });
        assert_eq!(schema["properties"]["from"], reference);
        assert_eq!(schema["properties"]["to"], reference);
        assert_eq!(schema["required"], json!(["from", "to"]));
        assert_eq!(schema["$defs"]["demo::Vec2"]["required"], json!(["x", "y"]));
    }
}
