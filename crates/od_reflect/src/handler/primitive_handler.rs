use alloc::boxed::Box;
use alloc::format;

use crate::document::{DocumentNode, PopulateReport};
use crate::handler::{MAX_DEPTH, TypeHandler};
use crate::info::{AccessFlags, TypeInfo};
use crate::ops::{ReflectMut, ReflectRef};
use crate::{Reflect, ReflectError, Reflector};

/// Leaf handler for [`Primitive`](crate::ops::Primitive) types.
///
/// Values travel as the node's `value`; a node without value deserializes to
/// the type's default and leaves a populate target untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrimitiveHandler;

impl TypeHandler for PrimitiveHandler {
    fn priority(&self, info: &'static TypeInfo) -> i32 {
        if info.as_primitive().is_some() {
            MAX_DEPTH + 1
        } else {
            0
        }
    }

    fn serialize(
        &self,
        _reflector: &Reflector,
        value: &dyn Reflect,
        info: &'static TypeInfo,
        name: Option<&str>,
        _recursive: bool,
        _flags: AccessFlags,
    ) -> Result<Option<DocumentNode>, ReflectError> {
        let ReflectRef::Primitive(primitive) = value.reflect_ref() else {
            return Ok(None);
        };
        Ok(Some(DocumentNode::from_value(
            info.type_path(),
            name,
            primitive.to_value(),
        )))
    }

    fn deserialize(
        &self,
        _reflector: &Reflector,
        node: &DocumentNode,
        info: &'static TypeInfo,
        _report: &mut PopulateReport,
        _depth: usize,
    ) -> Result<Box<dyn Reflect>, ReflectError> {
        let primitive = info
            .as_primitive()
            .ok_or(ReflectError::NoHandler(info.type_path()))?;
        match &node.value {
            Some(value) => Ok(primitive.from_value(value)?),
            None => info
                .default_value()
                .ok_or(ReflectError::NoDefault(info.type_path())),
        }
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
        let Some(value) = &node.value else {
            return Ok(());
        };
        let found = target.reflect_type_path();
        let ReflectMut::Primitive(primitive) = target.reflect_mut() else {
            return Err(ReflectError::TypeMismatch {
                expected: info.type_path(),
                found,
            });
        };
        if let Err(err) = primitive.set_value(value) {
            report.error(
                depth,
                format!("Value '{value}' cannot be assigned to '{found}': {err}."),
            );
        }
        Ok(())
    }
}
