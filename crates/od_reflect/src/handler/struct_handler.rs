use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;

use log::warn;

use crate::document::{DocumentNode, PopulateReport};
use crate::handler::{MAX_DEPTH, TypeHandler, reference_node, serialize_member};
use crate::info::{AccessFlags, StructInfo, TypeInfo, TypeKind};
use crate::ops::{ReflectMut, ReflectRef, Struct};
use crate::{Reflect, ReflectError, Reflector};

/// Generic reflection handler for [`Struct`] types.
///
/// Serializes selected fields into `fields` and readable properties into
/// `props`. Deserializing starts from the type's default instance and then
/// populates it; populating resolves every child by name and delegates to the
/// member type's populator chain, writing one report line per member.
#[derive(Clone, Copy, Debug, Default)]
pub struct StructHandler;

/// A member node that cannot change a primitive, enum or struct member.
fn carries_nothing(child: &DocumentNode, member_info: &'static TypeInfo) -> bool {
    child.is_empty_leaf()
        && matches!(
            member_info.kind(),
            TypeKind::Primitive(_) | TypeKind::Enum(_) | TypeKind::Struct(_)
        )
}

fn modified(kind: &str, name: &str, child: &DocumentNode) -> String {
    match &child.value {
        Some(value) if !value.is_null() && child.fields.is_empty() && child.props.is_empty() => {
            format!("{kind} '{name}' modified to '{value}'.")
        }
        _ => format!("{kind} '{name}' modified."),
    }
}

impl StructHandler {
    /// Appends the selected members of `value` to `node`.
    ///
    /// Members without a serializer are left out with a warning. Without
    /// `recursive` only leaf members are expanded.
    pub fn serialize_members(
        reflector: &Reflector,
        value: &dyn Struct,
        struct_info: &StructInfo,
        node: &mut DocumentNode,
        recursive: bool,
        flags: AccessFlags,
    ) -> Result<(), ReflectError> {
        for field in struct_info.fields() {
            if !flags.allows_field(field) {
                continue;
            }
            let Some(member) = value.field(field.name()) else {
                continue;
            };
            match serialize_member(reflector, member, field.name(), recursive, flags) {
                Ok(child) => node.fields.push(child),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => warn!("field `{}` skipped: {err}", field.name()),
            }
        }

        if flags.allows_properties() {
            for property in struct_info.properties() {
                if !property.is_readable() {
                    continue;
                }
                let Some(member) = value.property(property.name()) else {
                    continue;
                };
                match serialize_member(reflector, &*member, property.name(), recursive, flags) {
                    Ok(child) => node.props.push(child),
                    Err(err) if err.is_fatal() => return Err(err),
                    Err(err) => warn!("property `{}` skipped: {err}", property.name()),
                }
            }
        }
        Ok(())
    }

    /// Applies the `fields` and `props` of `node` to `target`.
    ///
    /// Only cycle and depth errors are returned; every other problem becomes a
    /// report line.
    pub fn populate_members(
        reflector: &Reflector,
        target: &mut dyn Reflect,
        node: &DocumentNode,
        report: &mut PopulateReport,
        depth: usize,
    ) -> Result<(), ReflectError> {
        let owner = target.reflect_type_info();
        let struct_info = owner
            .as_struct()
            .ok_or(ReflectError::NoHandler(owner.type_path()))?;
        let ReflectMut::Struct(target) = target.reflect_mut() else {
            return Err(ReflectError::NoHandler(owner.type_path()));
        };

        for child in &node.fields {
            Self::populate_field(reflector, target, owner, struct_info, child, report, depth)?;
        }
        for child in &node.props {
            Self::populate_property(reflector, target, owner, struct_info, child, report, depth)?;
        }
        Ok(())
    }

    fn populate_field(
        reflector: &Reflector,
        target: &mut dyn Struct,
        owner: &'static TypeInfo,
        struct_info: &StructInfo,
        child: &DocumentNode,
        report: &mut PopulateReport,
        depth: usize,
    ) -> Result<(), ReflectError> {
        let Some(name) = child.name() else {
            report.error(depth, "Field without a name skipped.");
            return Ok(());
        };
        let (Some(field), Some(_)) = (struct_info.field(name), target.field(name)) else {
            report.error(
                depth,
                format!("Field '{name}' not found in type '{}'.", owner.type_path()),
            );
            return Ok(());
        };
        if !field.is_writable() {
            report.error(depth, format!("Field '{name}' is read-only."));
            return Ok(());
        }
        let member_info = match reflector.resolve_member(child, field.type_info()) {
            Ok(member_info) => member_info,
            Err(err) => {
                report.error(depth, format!("Field '{name}' skipped: {err}."));
                return Ok(());
            }
        };
        if carries_nothing(child, member_info) {
            report.warning(depth, format!("Field '{name}' has no value, not modified."));
            return Ok(());
        }
        let Some(member) = target.field_mut(name) else {
            return Ok(());
        };

        let errors = report.error_count();
        match reflector.populate_as(member, child, member_info, report, depth + 1) {
            Ok(()) if report.error_count() == errors => {
                report.success(depth, modified("Field", name, child));
            }
            Ok(()) => report.warning(depth, format!("Field '{name}' partially modified.")),
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => report.error(depth, format!("Field '{name}' cannot be modified: {err}.")),
        }
        Ok(())
    }

    fn populate_property(
        reflector: &Reflector,
        target: &mut dyn Struct,
        owner: &'static TypeInfo,
        struct_info: &StructInfo,
        child: &DocumentNode,
        report: &mut PopulateReport,
        depth: usize,
    ) -> Result<(), ReflectError> {
        let Some(name) = child.name() else {
            report.error(depth, "Property without a name skipped.");
            return Ok(());
        };
        let Some(property) = struct_info.property(name) else {
            report.error(
                depth,
                format!("Property '{name}' not found in type '{}'.", owner.type_path()),
            );
            return Ok(());
        };
        if !property.is_writable() {
            report.error(depth, format!("Property '{name}' is read-only."));
            return Ok(());
        }
        let member_info = match reflector.resolve_member(child, property.type_info()) {
            Ok(member_info) => member_info,
            Err(err) => {
                report.error(depth, format!("Property '{name}' skipped: {err}."));
                return Ok(());
            }
        };

        if carries_nothing(child, member_info) {
            report.warning(depth, format!("Property '{name}' has no value, not modified."));
            return Ok(());
        }

        let errors = report.error_count();
        let current = if property.is_readable() {
            target.property(name)
        } else {
            None
        };
        let built = match current {
            Some(mut current) => reflector
                .populate_as(current.as_mut(), child, member_info, report, depth + 1)
                .map(|()| current),
            None => reflector.deserialize_as(child, member_info, report, depth + 1),
        };
        let value = match built {
            Ok(value) => value,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                report.error(depth, format!("Property '{name}' cannot be modified: {err}."));
                return Ok(());
            }
        };

        match target.set_property(name, value) {
            Ok(()) if report.error_count() == errors => {
                report.success(depth, modified("Property", name, child));
            }
            Ok(()) => report.warning(depth, format!("Property '{name}' partially modified.")),
            Err(rejected) => report.error(
                depth,
                format!(
                    "Property '{name}' rejected a value of type '{}'.",
                    rejected.reflect_type_path(),
                ),
            ),
        }
        Ok(())
    }
}

impl TypeHandler for StructHandler {
    fn priority(&self, info: &'static TypeInfo) -> i32 {
        if info.as_struct().is_none() {
            return 0;
        }
        let distance = i32::try_from(info.base_depth() + 1).unwrap_or(MAX_DEPTH);
        MAX_DEPTH.saturating_sub(distance)
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
        let ReflectRef::Struct(members) = value.reflect_ref() else {
            return Ok(None);
        };
        let Some(struct_info) = value.reflect_type_info().as_struct() else {
            return Ok(None);
        };
        let mut node = reference_node(info, name);
        Self::serialize_members(reflector, members, struct_info, &mut node, recursive, flags)?;
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
        let mut value = info
            .default_value()
            .ok_or(ReflectError::NoDefault(info.type_path()))?;
        Self::populate_members(reflector, value.as_mut(), node, report, depth)?;
        Ok(value)
    }

    fn populate(
        &self,
        reflector: &Reflector,
        target: &mut dyn Reflect,
        node: &DocumentNode,
        _info: &'static TypeInfo,
        report: &mut PopulateReport,
        depth: usize,
    ) -> Result<(), ReflectError> {
        Self::populate_members(reflector, target, node, report, depth)
    }
}
