use alloc::boxed::Box;
use alloc::format;
use alloc::string::ToString;

use crate::document::{DocumentNode, PopulateReport, Value, ValueError};
use crate::handler::{MAX_DEPTH, TypeHandler, assign};
use crate::info::{AccessFlags, EnumInfo, TypeInfo};
use crate::ops::ReflectRef;
use crate::{Reflect, ReflectError, Reflector};

/// Leaf handler for unit-variant enums.
///
/// A variant travels as its name; a variant index is accepted on input.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnumHandler;

impl EnumHandler {
    pub(crate) fn variant(
        info: &'static TypeInfo,
        enum_info: &EnumInfo,
        value: &Value,
    ) -> Result<Box<dyn Reflect>, ReflectError> {
        let unknown = || ValueError::UnknownVariant {
            value: value.to_string(),
            target: info.type_path(),
        };
        let name = match value {
            Value::String(name) => name.as_str(),
            Value::Int(_) | Value::UInt(_) => {
                let index = value.to_int::<usize>("usize").map_err(|_| unknown())?;
                enum_info.variant_at(index).ok_or_else(unknown)?.name()
            }
            _ => {
                return Err(ValueError::Mismatch {
                    expected: "variant name",
                    found: value.kind_name(),
                }
                .into());
            }
        };
        Ok(enum_info.from_variant(name).ok_or_else(unknown)?)
    }
}

impl TypeHandler for EnumHandler {
    fn priority(&self, info: &'static TypeInfo) -> i32 {
        if info.as_enum().is_some() {
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
        let ReflectRef::Enum(value) = value.reflect_ref() else {
            return Ok(None);
        };
        Ok(Some(DocumentNode::from_value(
            info.type_path(),
            name,
            value.variant_name(),
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
        let enum_info = info
            .as_enum()
            .ok_or(ReflectError::NoHandler(info.type_path()))?;
        match &node.value {
            Some(value) => Self::variant(info, enum_info, value),
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
        let enum_info = info
            .as_enum()
            .ok_or(ReflectError::NoHandler(info.type_path()))?;
        match Self::variant(info, enum_info, value) {
            Ok(variant) => {
                assign(target, variant, report, depth);
            }
            Err(err) => report.error(
                depth,
                format!("Value '{value}' cannot be assigned to '{}': {err}.", info.type_path()),
            ),
        }
        Ok(())
    }
}
