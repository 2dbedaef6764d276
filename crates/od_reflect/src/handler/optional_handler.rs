use alloc::boxed::Box;
use alloc::format;

use crate::document::{DocumentNode, PopulateReport};
use crate::handler::{MAX_DEPTH, TypeHandler, assign};
use crate::info::{AccessFlags, TypeInfo};
use crate::ops::{ReflectMut, ReflectRef};
use crate::{Reflect, ReflectError, Reflector};

/// Transparent handler for [`Optional`](crate::ops::Optional) types.
///
/// `None` is an empty leaf node; `Some(v)` is the node of `v` carrying the
/// optional's type name.
#[derive(Clone, Copy, Debug, Default)]
pub struct OptionalHandler;

impl TypeHandler for OptionalHandler {
    fn priority(&self, info: &'static TypeInfo) -> i32 {
        if info.as_optional().is_some() {
            MAX_DEPTH + 1
        } else {
            0
        }
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
        let ReflectRef::Optional(optional) = value.reflect_ref() else {
            return Ok(None);
        };
        let Some(inner) = optional.inner() else {
            return Ok(Some(DocumentNode::absent(info.type_path(), name)));
        };
        let mut node = reflector.serialize(Some(inner), None, name, recursive, flags)?;
        info.type_path().clone_into(&mut node.type_name);
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
        let optional = info
            .as_optional()
            .ok_or(ReflectError::NoHandler(info.type_path()))?;
        let inner = if node.is_empty_leaf() {
            None
        } else {
            let inner_info = optional.inner_info();
            Some(reflector.deserialize_as(node, inner_info, report, depth)?)
        };
        optional
            .from_inner(inner)
            .map_err(|rejected| ReflectError::TypeMismatch {
                expected: optional.inner_info().type_path(),
                found: rejected.reflect_type_path(),
            })
    }

    fn populate(
        &self,
        reflector: &Reflector,
        target: &mut dyn Reflect,
        node: &DocumentNode,
        info: &'static TypeInfo,
        report: &mut PopulateReport,
        depth: usize,
    ) -> Result<(), ReflectError> {
        let optional = info
            .as_optional()
            .ok_or(ReflectError::NoHandler(info.type_path()))?;
        let inner_info = optional.inner_info();

        if !node.is_empty_leaf() {
            let found = target.reflect_type_path();
            let ReflectMut::Optional(current) = target.reflect_mut() else {
                return Err(ReflectError::TypeMismatch {
                    expected: info.type_path(),
                    found,
                });
            };
            if let Some(inner) = current.inner_mut() {
                return reflector.populate_as(inner, node, inner_info, report, depth);
            }
        }

        let value = if node.is_empty_leaf() {
            optional.from_inner(None)
        } else {
            match reflector.deserialize_as(node, inner_info, report, depth) {
                Ok(inner) => optional.from_inner(Some(inner)),
                Err(err) => {
                    report.error(
                        depth,
                        format!("Value of type '{}' cannot be built: {err}.", inner_info.type_path()),
                    );
                    return Ok(());
                }
            }
        };
        match value {
            Ok(value) => {
                assign(target, value, report, depth);
            }
            Err(rejected) => report.error(
                depth,
                format!(
                    "Value of type '{}' cannot be wrapped in '{}'.",
                    rejected.reflect_type_path(),
                    info.type_path(),
                ),
            ),
        }
        Ok(())
    }
}
