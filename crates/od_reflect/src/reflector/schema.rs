use alloc::format;
use alloc::string::String;

use od_utils::hash::HashSet;
use serde_json::{Map, Value as Json, json};

use crate::info::{AccessFlags, PrimitiveKind, StructInfo, TypeInfo, TypeKind, Typed};
use crate::Reflector;

/// Key of the definitions table of a schema document.
const DEFS: &str = "$defs";

fn ref_to(type_path: &str) -> Json {
    // JSON pointer escaping.
    let escaped = type_path.replace('~', "~0").replace('/', "~1");
    json!({ "$ref": format!("#/{DEFS}/{escaped}") })
}

fn with_description(mut schema: Json, docs: Option<&str>) -> Json {
    if let (Some(docs), Json::Object(map)) = (docs, &mut schema) {
        map.insert(String::from("description"), Json::from(docs.trim()));
    }
    schema
}

/// Derives JSON schemas from type information.
///
/// Struct types are emitted once into a `$defs` table and referenced with
/// `$ref`, so recursive types terminate. The table is keyed by type path;
/// `serde_json` keeps maps sorted, so the output only depends on the types.
///
/// A builder can describe several types sharing one `$defs` table, which is
/// how method argument schemas are assembled.
///
/// ```
/// use od_reflect::Reflector;
/// use od_reflect::info::Typed;
///
/// let reflector = Reflector::new();
/// let mut builder = reflector.schema_builder();
/// let a = builder.describe(<Vec<u8>>::type_info());
/// let b = builder.describe(<Option<bool>>::type_info());
///
/// assert_eq!(a["type"], "array");
/// assert_eq!(a["items"]["maximum"], 255);
/// assert_eq!(b, serde_json::json!({ "type": "boolean" }));
/// assert!(builder.finish(a.clone()).get("$defs").is_none());
/// ```
pub struct SchemaBuilder<'a> {
    reflector: &'a Reflector,
    flags: AccessFlags,
    defs: Map<String, Json>,
    referenced: HashSet<&'static str>,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(reflector: &'a Reflector, flags: AccessFlags) -> Self {
        Self {
            reflector,
            flags,
            defs: Map::new(),
            referenced: HashSet::default(),
        }
    }

    /// The schema of `info` for use inside another schema.
    ///
    /// Struct types become a `$ref` into the definitions table.
    pub fn describe(&mut self, info: &'static TypeInfo) -> Json {
        if let Some(custom) = self.custom(info) {
            return custom;
        }
        let schema = match info.kind() {
            TypeKind::Primitive(primitive) => match primitive.kind() {
                PrimitiveKind::Unit => json!({ "type": "null" }),
                PrimitiveKind::Bool => json!({ "type": "boolean" }),
                PrimitiveKind::Char => json!({ "type": "string", "minLength": 1, "maxLength": 1 }),
                PrimitiveKind::Signed | PrimitiveKind::Unsigned => match primitive.bounds() {
                    Some(bounds) => json!({
                        "type": "integer",
                        "minimum": bounds.min,
                        "maximum": bounds.max,
                    }),
                    None => json!({ "type": "integer" }),
                },
                PrimitiveKind::Float => json!({ "type": "number" }),
                PrimitiveKind::String => json!({ "type": "string" }),
            },
            TypeKind::Enum(enum_info) => {
                let names: Json = enum_info.variants().iter().map(|v| v.name()).collect();
                json!({ "type": "string", "enum": names })
            }
            TypeKind::List(list) => {
                let mut schema = json!({
                    "type": "array",
                    "items": self.describe(list.item_info()),
                });
                if let (Some(len), Json::Object(map)) = (list.fixed_len(), &mut schema) {
                    map.insert(String::from("minItems"), Json::from(len));
                    map.insert(String::from("maxItems"), Json::from(len));
                }
                schema
            }
            TypeKind::Optional(optional) => return self.describe(optional.inner_info()),
            TypeKind::Struct(struct_info) => {
                let path = info.type_path();
                self.referenced.insert(path);
                if !self.defs.contains_key(path) {
                    // Placeholder first, so self references stop here.
                    self.defs.insert(String::from(path), Json::Null);
                    let body = self.struct_body(info, struct_info);
                    self.defs.insert(String::from(path), body);
                }
                return ref_to(path);
            }
            TypeKind::Opaque => json!({}),
        };
        with_description(schema, info.docs())
    }

    /// The schema of `info` as a document root.
    ///
    /// A struct is described inline; its definition only stays in the table
    /// when it refers to itself.
    pub fn root(&mut self, info: &'static TypeInfo) -> Json {
        let Some(struct_info) = info.as_struct() else {
            return self.describe(info);
        };
        if self.custom(info).is_some() {
            return self.describe(info);
        }
        let path = info.type_path();
        let known = self.defs.contains_key(path);
        if !known {
            self.defs.insert(String::from(path), Json::Null);
        }
        let body = self.struct_body(info, struct_info);
        if !known {
            if self.referenced.contains(path) {
                self.defs.insert(String::from(path), body.clone());
            } else {
                self.defs.remove(path);
            }
        }
        body
    }

    /// Attaches the definitions table to `root`.
    pub fn finish(self, mut root: Json) -> Json {
        if !self.defs.is_empty()
            && let Json::Object(map) = &mut root
        {
            map.insert(String::from(DEFS), Json::Object(self.defs));
        }
        root
    }

    fn custom(&self, info: &'static TypeInfo) -> Option<Json> {
        self.reflector
            .handlers()
            .rank(info)
            .iter()
            .find_map(|handler| handler.schema(self.reflector, info))
    }

    fn struct_body(&mut self, info: &'static TypeInfo, struct_info: &StructInfo) -> Json {
        let mut properties = Map::new();
        let mut required = alloc::vec::Vec::new();

        for field in struct_info.fields() {
            if !self.flags.allows_field(field) || !field.is_writable() {
                continue;
            }
            let member = field.type_info();
            let schema = self.describe(member);
            properties.insert(String::from(field.name()), with_description(schema, field.docs()));
            if member.as_optional().is_none() {
                required.push(Json::from(field.name()));
            }
        }
        if self.flags.allows_properties() {
            for property in struct_info.properties() {
                if !property.is_writable() {
                    continue;
                }
                let schema = self.describe(property.type_info());
                properties.insert(
                    String::from(property.name()),
                    with_description(schema, property.docs()),
                );
            }
        }

        let mut body = json!({
            "type": "object",
            "properties": properties,
            "additionalProperties": false,
        });
        if let Json::Object(map) = &mut body
            && !required.is_empty()
        {
            map.insert(String::from("required"), Json::Array(required));
        }
        with_description(body, info.docs())
    }
}

impl Reflector {
    /// A builder using the configured access flags.
    #[inline]
    pub fn schema_builder(&self) -> SchemaBuilder<'_> {
        SchemaBuilder::new(self, self.config.flags)
    }

    /// The JSON schema of the plain JSON form of `info`.
    ///
    /// A schema returned by one of the type's handlers is used verbatim.
    /// Otherwise it is derived from the type structure: only writable
    /// members are listed, and optional members are not required.
    pub fn schema(&self, info: &'static TypeInfo) -> Json {
        let mut builder = self.schema_builder();
        let root = builder.root(info);
        builder.finish(root)
    }

    #[inline]
    pub fn schema_of<T: Typed>(&self) -> Json {
        self.schema(T::type_info())
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::format;
    use alloc::vec::Vec;

    use serde_json::json;

    use crate::derive::Reflect;
    use crate::document::DocumentNode;
    use crate::handler::{MAX_DEPTH, TypeHandler};
    use crate::info::{AccessFlags, TypeInfo, TypePath};
    use crate::{Reflect, ReflectError, Reflector};

    /// A tree of labels.
    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Tree {
        /// Shown to users.
        pub label: String,
        pub weight: Option<f32>,
        pub children: Vec<Tree>,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Pair {
        pub left: [u16; 2],
        #[reflect(readonly)]
        pub id: u8,
    }

    #[test]
    fn recursive_structs_use_defs() {
        let reflector = Reflector::new();
        let schema = reflector.schema_of::<Tree>();
        let path = Tree::type_path();

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["description"], "A tree of labels.");
        assert_eq!(schema["required"], json!(["label", "children"]));
        assert_eq!(schema["properties"]["label"]["description"], "Shown to users.");
        assert_eq!(schema["properties"]["weight"], json!({ "type": "number" }));
        assert_eq!(
            schema["properties"]["children"]["items"]["$ref"],
            format!("#/$defs/{path}")
        );
        assert_eq!(schema["$defs"][path]["type"], "object");
    }

    #[test]
    fn schema_is_idempotent() {
        let reflector = Reflector::new();
        assert_eq!(reflector.schema_of::<Tree>(), reflector.schema_of::<Tree>());
        assert_eq!(reflector.schema_of::<Pair>(), reflector.schema_of::<Pair>());
    }

    #[test]
    fn arrays_and_readonly_members() {
        let reflector = Reflector::new();
        let schema = reflector.schema_of::<Pair>();
        assert_eq!(
            schema,
            json!({
                "type": "object",
                "properties": {
                    "left": {
                        "type": "array",
                        "items": { "type": "integer", "minimum": 0, "maximum": 65535 },
                        "minItems": 2,
                        "maxItems": 2,
                    },
                },
                "required": ["left"],
                "additionalProperties": false,
            })
        );
    }

    struct Custom;

    impl TypeHandler for Custom {
        fn priority(&self, info: &'static TypeInfo) -> i32 {
            if info.type_path() == Pair::type_path() {
                MAX_DEPTH
            } else {
                0
            }
        }

        fn cascade_on_serialize(&self) -> bool {
            true
        }

        fn serialize(
            &self,
            _: &Reflector,
            _: &dyn Reflect,
            _: &'static TypeInfo,
            _: Option<&str>,
            _: bool,
            _: AccessFlags,
        ) -> Result<Option<DocumentNode>, ReflectError> {
            Ok(None)
        }

        fn schema(&self, _: &Reflector, _: &'static TypeInfo) -> Option<serde_json::Value> {
            Some(json!({ "type": "string" }))
        }
    }

    #[test]
    fn handler_schema_is_used_verbatim() {
        let reflector = Reflector::new();
        reflector.register_handler(Custom);
        assert_eq!(reflector.schema_of::<Pair>(), json!({ "type": "string" }));

        let node: Box<dyn Reflect> = Box::new(Pair::default());
        assert!(reflector.to_document(&*node).is_ok());
    }
}
