use alloc::boxed::Box;
use alloc::format;
use core::fmt;
use core::marker::PhantomData;

use log::warn;

use crate::document::{DocumentNode, PopulateReport, Value};
use crate::handler::{StructHandler, TypeHandler, object_priority};
use crate::info::{AccessFlags, TypeInfo, Typed};
use crate::ops::ReflectRef;
use crate::{Reflect, ReflectError, Reflector};

/// Maps values to stable handles and back.
///
/// Used by [`HandleHandler`] for objects that live in a host-owned store
/// (scene objects, assets, database rows) and are referenced rather than
/// copied.
pub trait HandleResolver: Send + Sync + 'static {
    /// The handle of `value`, `None` if it has none.
    fn to_handle(&self, value: &dyn Reflect) -> Option<Value>;

    /// The value identified by `handle`, as an instance of `info`.
    fn resolve(&self, handle: &Value, info: &'static TypeInfo) -> Option<Box<dyn Reflect>>;
}

/// Handler for host objects addressed by a handle.
///
/// Applies to `T` and every type declaring `T` in its base chain. The node
/// `value` carries the handle; with `recursive` serialization the member
/// breakdown of [`StructHandler`] is added next to it. It cascades, so the
/// next ranked handler still runs after it.
///
/// ```
/// use od_reflect::document::Value;
/// use od_reflect::handler::{HandleHandler, HandleResolver};
/// use od_reflect::info::TypeInfo;
/// use od_reflect::{Reflect, Reflector, derive::Reflect};
///
/// #[derive(Reflect, Default, Clone)]
/// #[reflect(default)]
/// struct Asset {
///     pub id: u32,
/// }
///
/// struct ById;
///
/// impl HandleResolver for ById {
///     fn to_handle(&self, value: &dyn Reflect) -> Option<Value> {
///         value.downcast_ref::<Asset>().map(|asset| Value::from(asset.id))
///     }
///
///     fn resolve(&self, handle: &Value, _: &'static TypeInfo) -> Option<Box<dyn Reflect>> {
///         let id = handle.to_int::<u32>("u32").ok()?;
///         Some(Box::new(Asset { id }))
///     }
/// }
///
/// let reflector = Reflector::new();
/// reflector.register_handler(HandleHandler::<Asset, _>::new(ById));
///
/// let node = reflector.to_document(&Asset { id: 7 }).unwrap();
/// assert_eq!(node.value, Some(Value::Int(7)));
/// assert_eq!(node.fields.len(), 1);
/// ```
pub struct HandleHandler<T, R> {
    resolver: R,
    marker: PhantomData<fn() -> T>,
}

impl<T: Typed, R: HandleResolver> HandleHandler<T, R> {
    pub const fn new(resolver: R) -> Self {
        Self {
            resolver,
            marker: PhantomData,
        }
    }

    #[inline]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}

impl<T, R: fmt::Debug> fmt::Debug for HandleHandler<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleHandler")
            .field("type", &core::any::type_name::<T>())
            .field("resolver", &self.resolver)
            .finish()
    }
}

impl<T: Typed, R: HandleResolver> TypeHandler for HandleHandler<T, R> {
    fn priority(&self, info: &'static TypeInfo) -> i32 {
        object_priority::<T>(info)
    }

    fn cascade_on_serialize(&self) -> bool {
        true
    }

    fn cascade_on_populate(&self) -> bool {
        true
    }

    fn serialize(
        &self,
        reflector: &Reflector,
        value: &dyn Reflect,
        info: &'static TypeInfo,
        name: Option<&str>,
        recursive: bool,
        flags: AccessFlags,
    ) -> Result<Option<DocumentNode>, ReflectError> {
        let Some(handle) = self.resolver.to_handle(value) else {
            return Ok(None);
        };
        let mut node = DocumentNode::absent(info.type_path(), name).with_value(handle);
        if recursive
            && let ReflectRef::Struct(members) = value.reflect_ref()
            && let Some(struct_info) = value.reflect_type_info().as_struct()
        {
            StructHandler::serialize_members(reflector, members, struct_info, &mut node, recursive, flags)?;
        }
        Ok(Some(node))
    }

    fn deserialize(
        &self,
        reflector: &Reflector,
        node: &DocumentNode,
        info: &'static TypeInfo,
        report: &mut PopulateReport,
        depth: usize,
    ) -> Result<Box<dyn Reflect>, ReflectError> {
        if let Some(handle) = node.value.as_ref().filter(|v| !v.is_null()) {
            if let Some(value) = self.resolver.resolve(handle, info) {
                return Ok(value);
            }
            warn!("handle '{handle}' of '{}' did not resolve", info.type_path());
            report.warning(
                depth,
                format!("Handle '{handle}' of '{}' not found.", info.type_path()),
            );
        }
        StructHandler.deserialize(reflector, node, info, report, depth)
    }

    fn populate(
        &self,
        _reflector: &Reflector,
        target: &mut dyn Reflect,
        node: &DocumentNode,
        info: &'static TypeInfo,
        report: &mut PopulateReport,
        depth: usize,
    ) -> Result<(), ReflectError> {
        let Some(handle) = node.value.as_ref().filter(|v| !v.is_null()) else {
            return Ok(());
        };
        match self.resolver.resolve(handle, info) {
            Some(value) => match target.set(value) {
                Ok(()) => report.success(depth, format!("Handle '{handle}' resolved.")),
                Err(rejected) => report.error(
                    depth,
                    format!(
                        "Value of type '{}' cannot be assigned to '{}'.",
                        rejected.reflect_type_path(),
                        target.reflect_type_path(),
                    ),
                ),
            },
            None => report.warning(
                depth,
                format!("Handle '{handle}' of '{}' not found.", info.type_path()),
            ),
        }
        Ok(())
    }
}
