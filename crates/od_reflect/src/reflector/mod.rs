//! The conversion engine.
//!
//! A [`Reflector`] owns a [`TypeRegistry`] and a [`HandlerRegistry`] and
//! routes every conversion through the handler chains of the involved types.
//! Handlers re-enter the reflector for nested members, so a single
//! conversion walks the whole object graph.
//!
//! Each thread keeps a stack of the instances currently visited; an instance
//! reached again while still on the stack is a [`ReflectError::Cycle`], and
//! nesting beyond [`ReflectorConfig::max_depth`] is a
//! [`ReflectError::DepthLimit`].

// -----------------------------------------------------------------------------
// Modules

mod equality;
mod guard;
mod json;
mod schema;

// -----------------------------------------------------------------------------
// Exports

pub use schema::SchemaBuilder;

use alloc::boxed::Box;
use alloc::format;
use alloc::string::ToString;

use log::warn;
use od_os::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::document::{DocumentNode, PopulateReport};
use crate::handler::TypeHandler;
use crate::info::{AccessFlags, TypeInfo, Typed};
use crate::registry::{HandlerRegistry, TypeRegistry};
use crate::{Reflect, ReflectError};

use guard::Visit;

// -----------------------------------------------------------------------------
// ReflectorConfig

/// Runtime settings of a [`Reflector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReflectorConfig {
    /// Maximum nesting of a single operation.
    pub max_depth: usize,
    /// Members visited by [`Reflector::to_document`] and [`Reflector::schema`].
    pub flags: AccessFlags,
    /// Register the runtime type of every serialized value, so documents the
    /// reflector produced can always be read back.
    pub learn_types: bool,
}

impl ReflectorConfig {
    pub const DEFAULT: Self = Self {
        max_depth: 128,
        flags: AccessFlags::DEFAULT,
        learn_types: true,
    };
}

impl Default for ReflectorConfig {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

// -----------------------------------------------------------------------------
// Reflector

/// Converts values to [`DocumentNode`]s and back.
///
/// The reflector is `Sync`; registries can be extended while other threads
/// convert values.
///
/// ```
/// use od_reflect::{Reflector, derive::Reflect};
///
/// #[derive(Reflect, Default)]
/// #[reflect(default)]
/// struct Point {
///     pub x: i32,
///     pub y: i32,
/// }
///
/// let reflector = Reflector::new();
/// let mut point = Point { x: 1, y: 2 };
///
/// let mut patch = reflector.to_document(&Point { x: 9, y: 0 }).unwrap();
/// patch.fields.retain(|f| f.name() == Some("x"));
///
/// let report = reflector.populate(&mut point, &patch).unwrap();
/// assert_eq!((point.x, point.y), (9, 2));
/// assert_eq!(report.to_string(), "[Success] Field 'x' modified to '9'.");
/// ```
pub struct Reflector {
    config: ReflectorConfig,
    types: RwLock<TypeRegistry>,
    handlers: HandlerRegistry,
}

impl Default for Reflector {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Reflector {
    /// A reflector with the primitive types and the built-in handlers.
    pub fn new() -> Self {
        Self::with_config(ReflectorConfig::DEFAULT)
    }

    pub fn with_config(config: ReflectorConfig) -> Self {
        Self::from_parts(config, TypeRegistry::new(), HandlerRegistry::with_builtin())
    }

    pub fn from_parts(config: ReflectorConfig, types: TypeRegistry, handlers: HandlerRegistry) -> Self {
        Self {
            config,
            types: RwLock::new(types),
            handlers,
        }
    }

    #[inline]
    pub fn config(&self) -> &ReflectorConfig {
        &self.config
    }

    #[inline]
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Read access to the type registry.
    ///
    /// Do not hold the guard across calls into the reflector.
    #[inline]
    pub fn types(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.types.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write access to the type registry.
    #[inline]
    pub fn types_mut(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.types.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `T` and its dependencies. See [`TypeRegistry::register_info`].
    #[inline]
    pub fn register_type<T: Typed>(&self) -> bool {
        self.types_mut().register_info(T::type_info())
    }

    /// See [`HandlerRegistry::register`].
    #[inline]
    pub fn register_handler<H: TypeHandler>(&self, handler: H) -> bool {
        self.handlers.register(handler)
    }

    /// See [`HandlerRegistry::unregister`].
    #[inline]
    pub fn unregister_handler<H: TypeHandler>(&self) -> bool {
        self.handlers.unregister::<H>()
    }

    fn learn(&self, info: &'static TypeInfo) {
        if !self.config.learn_types {
            return;
        }
        let known = self.types().contains(info.ty_id());
        if !known {
            self.types_mut().register_info(info);
        }
    }

    /// Resolves a document `typeName`.
    pub fn resolve_type(&self, type_name: &str) -> Result<&'static TypeInfo, ReflectError> {
        if type_name.is_empty() {
            return Err(ReflectError::EmptyTypeName);
        }
        self.types()
            .resolve(type_name)
            .ok_or_else(|| ReflectError::UnknownType(type_name.to_string()))
    }

    /// `runtime` or the base of `runtime` named by `type_name`, by path or short name.
    fn match_own_type(runtime: &'static TypeInfo, type_name: &str) -> Option<&'static TypeInfo> {
        if type_name.is_empty() {
            return None;
        }
        core::iter::once(runtime)
            .chain(runtime.bases())
            .find(|info| info.type_path() == type_name || info.type_name() == type_name)
    }

    /// The type of a member node whose declared type is `declared`.
    ///
    /// An empty `typeName` means the declared type. Otherwise the named type
    /// must be assignable to the declared one; an optional member also accepts
    /// its inner type.
    pub fn resolve_member(
        &self,
        node: &DocumentNode,
        declared: &'static TypeInfo,
    ) -> Result<&'static TypeInfo, ReflectError> {
        let type_name = node.type_name.as_str();
        if type_name.is_empty() || type_name == declared.type_path() || type_name == declared.type_name()
        {
            return Ok(declared);
        }
        let info = self.resolve_type(type_name)?;
        if info.is_assignable_to(declared) {
            return Ok(info);
        }
        if declared
            .as_optional()
            .is_some_and(|optional| info.is_assignable_to(optional.inner_info()))
        {
            return Ok(declared);
        }
        Err(ReflectError::TypeMismatch {
            expected: declared.type_path(),
            found: info.type_path(),
        })
    }

    // -------------------------------------------------------------------------
    // Serialize

    /// Converts `value` into a node.
    ///
    /// - `info`: the type recorded in the node, the runtime type if `None`.
    /// - `name`: the member label of the node.
    /// - `recursive`: expand composite members; otherwise only leaf members are
    ///   written and nested composites are reference-only nodes.
    ///
    /// A `None` value gives an absent leaf of type `info`.
    pub fn serialize(
        &self,
        value: Option<&dyn Reflect>,
        info: Option<&'static TypeInfo>,
        name: Option<&str>,
        recursive: bool,
        flags: AccessFlags,
    ) -> Result<DocumentNode, ReflectError> {
        let Some(value) = value else {
            let info = info.ok_or(ReflectError::NullTarget)?;
            return Ok(DocumentNode::absent(info.type_path(), name));
        };
        let info = info.unwrap_or_else(|| value.reflect_type_info());
        self.learn(info);

        let _visit = Visit::enter(value, self.config.max_depth)?;
        for handler in self.handlers.serializer_chain(info) {
            match handler.serialize(self, value, info, name, recursive, flags) {
                Ok(Some(node)) => return Ok(node),
                Ok(None) => {}
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => warn!(
                    "`{}` failed to serialize `{}`: {err}",
                    handler.name(),
                    info.type_path(),
                ),
            }
        }
        Err(ReflectError::UnsupportedType(info.type_path()))
    }

    /// Recursive serialization of `value` with the configured access flags.
    #[inline]
    pub fn to_document(&self, value: &dyn Reflect) -> Result<DocumentNode, ReflectError> {
        self.serialize(Some(value), None, None, true, self.config.flags)
    }

    // -------------------------------------------------------------------------
    // Deserialize

    /// Builds a new instance of the type named by `node.type_name`.
    ///
    /// Skipped members are discarded, see [`deserialize_with_report`](Self::deserialize_with_report).
    pub fn deserialize(&self, node: &DocumentNode) -> Result<Box<dyn Reflect>, ReflectError> {
        let mut report = PopulateReport::new();
        self.deserialize_with_report(node, &mut report)
    }

    /// Like [`deserialize`](Self::deserialize), writing skipped members to `report`.
    pub fn deserialize_with_report(
        &self,
        node: &DocumentNode,
        report: &mut PopulateReport,
    ) -> Result<Box<dyn Reflect>, ReflectError> {
        let info = self.resolve_type(&node.type_name)?;
        self.deserialize_as(node, info, report, 0)
    }

    /// Builds a new instance of `info` from `node`, ignoring `node.type_name`.
    pub fn deserialize_as(
        &self,
        node: &DocumentNode,
        info: &'static TypeInfo,
        report: &mut PopulateReport,
        depth: usize,
    ) -> Result<Box<dyn Reflect>, ReflectError> {
        let _visit = Visit::enter_anonymous(self.config.max_depth)?;
        let handler = self
            .handlers
            .deserializer_chain(info)
            .ok_or(ReflectError::NoHandler(info.type_path()))?;
        handler.deserialize(self, node, info, report, depth)
    }

    /// Deserializes `node` as a `T`.
    ///
    /// An empty `typeName` is read as `T`.
    pub fn from_document<T: Typed>(&self, node: &DocumentNode) -> Result<T, ReflectError> {
        let info = self.resolve_member(node, T::type_info())?;
        let mut report = PopulateReport::new();
        self.deserialize_as(node, info, &mut report, 0)?
            .take::<T>()
            .map_err(|value| ReflectError::TypeMismatch {
                expected: T::type_path(),
                found: value.reflect_type_path(),
            })
    }

    // -------------------------------------------------------------------------
    // Populate

    /// Patches `target` in place from `node` and returns the per-member report.
    pub fn populate(
        &self,
        target: &mut dyn Reflect,
        node: &DocumentNode,
    ) -> Result<PopulateReport, ReflectError> {
        let mut report = PopulateReport::new();
        self.populate_into(Some(target), node, &mut report, 0)?;
        Ok(report)
    }

    /// Patches `target` in place, writing to a caller-owned report.
    ///
    /// Structural errors are returned; a type mismatch is also reported.
    pub fn populate_into(
        &self,
        target: Option<&mut dyn Reflect>,
        node: &DocumentNode,
        report: &mut PopulateReport,
        depth: usize,
    ) -> Result<(), ReflectError> {
        let target = target.ok_or(ReflectError::NullTarget)?;
        let runtime = target.reflect_type_info();
        let info = match Self::match_own_type(runtime, &node.type_name) {
            Some(info) => info,
            None => self.resolve_type(&node.type_name)?,
        };
        self.populate_as(target, node, info, report, depth)
    }

    /// Patches `target` from `node` read as an `info`.
    ///
    /// Every handler of the populator chain of the target's runtime type runs.
    pub fn populate_as(
        &self,
        target: &mut dyn Reflect,
        node: &DocumentNode,
        info: &'static TypeInfo,
        report: &mut PopulateReport,
        depth: usize,
    ) -> Result<(), ReflectError> {
        let runtime = target.reflect_type_info();
        if !runtime.is_assignable_to(info) {
            report.error(
                depth,
                format!(
                    "Type '{}' is not assignable to '{}'.",
                    runtime.type_path(),
                    info.type_path(),
                ),
            );
            return Err(ReflectError::TypeMismatch {
                expected: info.type_path(),
                found: runtime.type_path(),
            });
        }

        let _visit = Visit::enter(target, self.config.max_depth)?;
        let chain = self.handlers.populator_chain(runtime);
        if chain.is_empty() {
            return Err(ReflectError::NoHandler(runtime.type_path()));
        }
        for handler in chain {
            match handler.populate(self, target, node, runtime, report, depth) {
                Ok(()) => {}
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!(
                        "`{}` failed to populate `{}`: {err}",
                        handler.name(),
                        runtime.type_path(),
                    );
                    report.error(
                        depth,
                        format!("Value of type '{}' not modified: {err}.", runtime.type_path()),
                    );
                }
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Reflector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Reflector")
            .field("config", &self.config)
            .field("types", &self.types().len())
            .field("handlers", &self.handlers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::derive::Reflect;
    use crate::document::{ReportLevel, Value};
    use crate::info::TypePath;
    use crate::handler::{HandleHandler, HandleResolver};

    #[derive(Reflect, Default, Debug, Clone, PartialEq)]
    #[reflect(default, auto_register)]
    pub struct Vec3 {
        pub x: f32,
        pub y: f32,
        pub z: f32,
    }

    #[derive(Reflect, Default, Debug, Clone, Copy, PartialEq)]
    #[reflect(default)]
    pub enum Mode {
        #[default]
        Idle,
        Running,
    }

    /// A scene entity.
    #[derive(Reflect, Default, Debug, Clone, PartialEq)]
    #[reflect(default)]
    #[reflect(property(name = "speed", ty = f64, get = speed, set = set_speed))]
    pub struct Entity {
        pub name: String,
        pub position: Vec3,
        pub tags: Vec<String>,
        pub mode: Mode,
        pub parent: Option<u32>,
        #[reflect(readonly)]
        pub id: u64,
        hidden: i32,
        velocity: f64,
    }

    impl Entity {
        fn speed(&self) -> f64 {
            self.velocity
        }

        fn set_speed(&mut self, speed: f64) {
            self.velocity = speed;
        }
    }

    #[derive(Reflect, Default, Debug, Clone, PartialEq)]
    #[reflect(default)]
    pub struct Point {
        pub x: i32,
        pub y: i32,
    }

    #[derive(Reflect, Default, Debug, Clone, PartialEq)]
    #[reflect(default, base = Point)]
    pub struct Point3 {
        pub x: i32,
        pub y: i32,
        pub z: i32,
    }

    #[derive(Reflect, Debug)]
    pub struct Node {
        pub children: Vec<Node>,
    }

    fn entity() -> Entity {
        Entity {
            name: String::from("player"),
            position: Vec3 { x: 1.0, y: 2.0, z: 3.0 },
            tags: vec![String::from("a"), String::from("b")],
            mode: Mode::Running,
            parent: Some(4),
            id: 42,
            hidden: 7,
            velocity: 1.5,
        }
    }

    #[test]
    fn integer_leaf() {
        let reflector = Reflector::new();
        let node = reflector.to_document(&5_i32).unwrap();
        assert_eq!(node, DocumentNode::from_value("i32", None, 5));

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json, serde_json::json!({ "typeName": "i32", "value": 5 }));
        assert_eq!(reflector.from_document::<i32>(&node).unwrap(), 5);
    }

    #[test]
    fn three_field_composite() {
        let reflector = Reflector::new();
        let node = reflector
            .to_document(&Vec3 { x: 1.0, y: 2.0, z: 3.0 })
            .unwrap();

        assert_eq!(node.type_name, Vec3::type_path());
        let names: Vec<_> = node.fields.iter().filter_map(DocumentNode::name).collect();
        assert_eq!(names, ["x", "y", "z"]);
        assert_eq!(node.field("z").unwrap().value, Some(Value::Float(3.0)));
        assert!(node.props.is_empty());
    }

    #[test]
    fn round_trip_is_structurally_equal() {
        let reflector = Reflector::new();
        let original = entity();
        let node = reflector.to_document(&original).unwrap();

        // Non-public fields are skipped by default, the property carries `velocity`.
        assert!(node.field("hidden").is_none());
        assert_eq!(node.prop("speed").unwrap().value, Some(Value::Float(1.5)));

        let json = serde_json::to_string(&node).unwrap();
        let node: DocumentNode = serde_json::from_str(&json).unwrap();

        let mut report = PopulateReport::new();
        let back = reflector.deserialize_with_report(&node, &mut report).unwrap();
        let back = back.take::<Entity>().unwrap();

        // `id` is read-only and keeps its default.
        assert_eq!(report.error_count(), 1);
        assert_eq!(back.id, 0);
        assert_eq!(back.velocity, 1.5);
        assert!(
            reflector
                .are_equal(&back, &Entity { id: 0, hidden: 0, ..original })
                .unwrap()
        );
    }

    #[test]
    fn populate_single_field() {
        let reflector = Reflector::new();
        let mut point = Point { x: 1, y: 2 };
        let node = DocumentNode::new(Point::type_path())
            .with_field(DocumentNode::from_value("i32", Some("x"), 9));

        let report = reflector.populate(&mut point, &node).unwrap();
        assert_eq!(point, Point { x: 9, y: 2 });
        assert_eq!(report.len(), 1);
        assert_eq!(report.to_string(), "[Success] Field 'x' modified to '9'.");
    }

    #[test]
    fn populate_matches_the_target_type_without_registration() {
        let reflector = Reflector::new();
        assert!(!reflector.types().contains(core::any::TypeId::of::<Point3>()));

        let mut target = Point3 { x: 1, y: 2, z: 3 };
        let node = DocumentNode::new(Point3::type_name())
            .with_field(DocumentNode::from_value("i32", Some("x"), 9));
        let report = reflector.populate(&mut target, &node).unwrap();
        assert_eq!(target, Point3 { x: 9, y: 2, z: 3 });
        assert!(!report.has_errors(), "{report}");

        let node = DocumentNode::new(Point::type_path())
            .with_field(DocumentNode::from_value("i32", Some("y"), 5));
        reflector.populate(&mut target, &node).unwrap();
        assert_eq!(target, Point3 { x: 9, y: 5, z: 3 });
    }

    #[test]
    fn populate_warns_on_members_without_value() {
        let reflector = Reflector::new();
        let mut point = Point { x: 1, y: 2 };
        let node = DocumentNode::new(Point::type_path())
            .with_field(DocumentNode::new("i32").with_name(Some("y")));

        let report = reflector.populate(&mut point, &node).unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });
        assert_eq!(report.count(ReportLevel::Success), 0);
        assert_eq!(report.to_string(), "[Warning] Field 'y' has no value, not modified.");
    }

    #[test]
    fn populate_continues_after_missing_field() {
        let reflector = Reflector::new();
        let mut point = Point { x: 1, y: 2 };
        let node = DocumentNode::new(Point::type_path())
            .with_field(DocumentNode::from_value("i32", Some("w"), 5))
            .with_field(DocumentNode::from_value("i32", Some("y"), 6));

        let report = reflector.populate(&mut point, &node).unwrap();
        assert_eq!(point, Point { x: 1, y: 6 });
        assert_eq!(report.count(ReportLevel::Error), 1);
        assert_eq!(report.count(ReportLevel::Success), 1);
        assert!(report.entries()[0].message.contains("not found"));
    }

    #[test]
    fn populate_leaves_unrelated_fields() {
        let reflector = Reflector::new();
        let mut target = entity();
        let node = DocumentNode::new(Entity::type_path()).with_field(
            DocumentNode::new(Vec3::type_path())
                .with_name(Some("position"))
                .with_field(DocumentNode::from_value("f32", Some("y"), 8.0)),
        );

        let report = reflector.populate(&mut target, &node).unwrap();
        assert!(!report.has_errors(), "{report}");
        assert_eq!(target.position, Vec3 { x: 1.0, y: 8.0, z: 3.0 });
        assert_eq!(Entity { position: entity().position, ..target }, entity());
    }

    #[test]
    fn populate_rejects_bad_values_per_member() {
        let reflector = Reflector::new();
        let mut point = Point::default();
        let node = DocumentNode::new(Point::type_path())
            .with_field(DocumentNode::from_value("i32", Some("x"), "nope"))
            .with_field(DocumentNode::new("bool").with_name(Some("y")));

        let report = reflector.populate(&mut point, &node).unwrap();
        assert_eq!(point, Point::default());
        assert!(report.has_errors());
        assert_eq!(report.count(ReportLevel::Success), 0);
    }

    #[test]
    fn structural_errors() {
        let reflector = Reflector::new();
        let mut point = Point::default();

        let unnamed = DocumentNode::default();
        assert_eq!(reflector.deserialize(&unnamed).err(), Some(ReflectError::EmptyTypeName));

        let unknown = DocumentNode::new("demo::Missing");
        assert!(matches!(
            reflector.populate(&mut point, &unknown),
            Err(ReflectError::UnknownType(_))
        ));

        let mut report = PopulateReport::new();
        let node = DocumentNode::new(Point::type_path());
        assert_eq!(
            reflector.populate_into(None, &node, &mut report, 0),
            Err(ReflectError::NullTarget)
        );

        reflector.register_type::<Vec3>();
        let other = DocumentNode::new(Vec3::type_path());
        assert!(matches!(
            reflector.populate_into(Some(&mut point), &other, &mut report, 0),
            Err(ReflectError::TypeMismatch { .. })
        ));
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn derived_types_are_assignable_to_their_base() {
        let reflector = Reflector::new();
        reflector.register_type::<Point3>();
        assert!(reflector.types().contains(core::any::TypeId::of::<Point>()));

        let mut target = Point3::default();
        let node = DocumentNode::new(Point::type_path())
            .with_field(DocumentNode::from_value("i32", Some("z"), 3));
        let report = reflector.populate(&mut target, &node).unwrap();
        assert_eq!(target.z, 3);
        assert!(!report.has_errors());
    }

    #[test]
    fn non_recursive_nodes_keep_leaves() {
        let reflector = Reflector::new();
        let value = entity();
        let node = reflector
            .serialize(Some(&value), None, Some("e"), false, AccessFlags::DEFAULT)
            .unwrap();
        assert_eq!(node.name(), Some("e"));
        assert_eq!(node.field("name").unwrap().value, Some(Value::from(String::from("player"))));
        assert_eq!(node.field("parent").unwrap().value, Some(Value::Int(4)));
        assert_eq!(
            node.field("position").unwrap(),
            &DocumentNode::absent(Vec3::type_path(), Some("position"))
        );
        assert!(node.field("tags").unwrap().is_empty_leaf());

        let back = reflector.from_document::<Entity>(&node).unwrap();
        assert_eq!(back.name, "player");
        assert_eq!(back.mode, Mode::Running);
        assert_eq!(back.parent, Some(4));
        assert_eq!(back.velocity, 1.5);
        assert_eq!(back.position, Vec3::default());

        let none = reflector
            .serialize(None, Some(<Option<u8>>::type_info()), None, true, AccessFlags::DEFAULT)
            .unwrap();
        assert!(none.is_empty_leaf());
    }

    #[test]
    fn non_recursive_lists_reference_composite_items() {
        let reflector = Reflector::new();
        let points = vec![Point { x: 1, y: 2 }];
        let node = reflector
            .serialize(Some(&points), None, None, false, AccessFlags::DEFAULT)
            .unwrap();
        assert!(node.fields[0].is_empty_leaf());

        let node = reflector
            .serialize(Some(&vec![3_u8, 4]), None, None, false, AccessFlags::DEFAULT)
            .unwrap();
        assert_eq!(reflector.from_document::<Vec<u8>>(&node).unwrap(), [3, 4]);
    }

    #[test]
    fn access_flags_select_members() {
        let reflector = Reflector::new();
        let flags = AccessFlags::FIELDS | AccessFlags::PUBLIC | AccessFlags::NON_PUBLIC;
        let node = reflector
            .serialize(Some(&entity()), None, None, true, flags)
            .unwrap();
        assert_eq!(node.field("hidden").unwrap().value, Some(Value::Int(7)));
        assert!(node.props.is_empty());
    }

    #[test]
    fn lists_and_options() {
        let reflector = Reflector::new();
        let value: Vec<Option<u8>> = vec![Some(1), None];
        let node = reflector.to_document(&value).unwrap();
        assert_eq!(node.fields[0].name(), Some("[0]"));
        assert!(node.fields[1].is_empty_leaf());

        let back = reflector.from_document::<Vec<Option<u8>>>(&node).unwrap();
        assert_eq!(back, value);

        let mut target: [i32; 2] = [0, 0];
        let node = reflector.to_document(&[3, 4]).unwrap();
        reflector.populate(&mut target, &node).unwrap();
        assert_eq!(target, [3, 4]);

        let short = DocumentNode::new(node.type_name.clone())
            .with_field(DocumentNode::from_value("i32", None, 1));
        let report = reflector.populate(&mut target, &short).unwrap();
        assert!(report.has_errors());
        assert_eq!(target, [3, 4]);
    }

    #[test]
    fn enums_accept_names_and_indices() {
        let reflector = Reflector::new();
        reflector.register_type::<Mode>();
        let node = DocumentNode::from_value(Mode::type_path(), None, "Running");
        assert_eq!(reflector.from_document::<Mode>(&node).unwrap(), Mode::Running);

        let mut mode = Mode::Running;
        let node = DocumentNode::from_value(Mode::type_path(), None, 0);
        reflector.populate(&mut mode, &node).unwrap();
        assert_eq!(mode, Mode::Idle);
    }

    #[test]
    fn depth_limit_is_reported() {
        let reflector = Reflector::with_config(ReflectorConfig {
            max_depth: 3,
            ..ReflectorConfig::DEFAULT
        });
        let deep = Node {
            children: vec![Node {
                children: vec![Node { children: Vec::new() }],
            }],
        };
        assert!(matches!(
            reflector.to_document(&deep),
            Err(ReflectError::DepthLimit(3))
        ));
    }

    #[derive(Debug)]
    struct ById;

    impl HandleResolver for ById {
        fn to_handle(&self, value: &dyn Reflect) -> Option<Value> {
            value.downcast_ref::<Vec3>().map(|v| Value::from(v.x))
        }

        fn resolve(&self, handle: &Value, _: &'static TypeInfo) -> Option<Box<dyn Reflect>> {
            let x = handle.to_f64().ok()? as f32;
            Some(Box::new(Vec3 { x, y: -1.0, z: -1.0 }))
        }
    }

    #[test]
    fn handles_carry_structure_and_resolve() {
        let reflector = Reflector::new();
        assert!(reflector.register_handler(HandleHandler::<Vec3, _>::new(ById)));

        let node = reflector
            .to_document(&Vec3 { x: 2.0, y: 0.0, z: 0.0 })
            .unwrap();
        assert_eq!(node.value, Some(Value::Float(2.0)));
        assert_eq!(node.fields.len(), 3);

        let handle_only = DocumentNode::from_value(Vec3::type_path(), None, 5.0);
        let mut target = Vec3::default();
        let report = reflector.populate(&mut target, &handle_only).unwrap();
        assert_eq!(target, Vec3 { x: 5.0, y: -1.0, z: -1.0 });
        assert_eq!(report.count(ReportLevel::Success), 1);

        assert!(reflector.unregister_handler::<HandleHandler<Vec3, ById>>());
        assert!(reflector.to_document(&Vec3::default()).unwrap().value.is_none());
    }
}
