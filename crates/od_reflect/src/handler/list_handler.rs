use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::document::{DocumentNode, PopulateReport};
use crate::handler::{MAX_DEPTH, TypeHandler, assign, reference_node, serialize_member};
use crate::info::{AccessFlags, ListShape, TypeInfo};
use crate::ops::ReflectRef;
use crate::{Reflect, ReflectError, Reflector};

/// Handler for [`List`](crate::ops::List) types.
///
/// Items are written as `fields` named `"[i]"`; without `recursive`,
/// composite items are reference-only nodes. Populating a list replaces its
/// whole content with the items of the node.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListHandler;

fn item_label(index: usize) -> String {
    format!("[{index}]")
}

impl TypeHandler for ListHandler {
    fn priority(&self, info: &'static TypeInfo) -> i32 {
        match info.as_list().map(|list| list.shape()) {
            Some(ListShape::Vec | ListShape::Array(_)) => MAX_DEPTH + 1,
            Some(ListShape::Sequence) => MAX_DEPTH / 4,
            None => 0,
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
        let ReflectRef::List(list) = value.reflect_ref() else {
            return Ok(None);
        };
        let mut node = reference_node(info, name);
        node.fields.reserve(list.len());
        for (index, item) in list.iter().enumerate() {
            let label = item_label(index);
            let child = serialize_member(reflector, item, &label, recursive, flags)?;
            node.fields.push(child);
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
        let list = info
            .as_list()
            .ok_or(ReflectError::NoHandler(info.type_path()))?;
        let item_info = list.item_info();

        let mut items: Vec<Box<dyn Reflect>> = Vec::with_capacity(node.fields.len());
        for (index, child) in node.fields.iter().enumerate() {
            let label = child.name().map_or_else(|| item_label(index), String::from);
            let child_info = match reflector.resolve_member(child, item_info) {
                Ok(child_info) => child_info,
                Err(err) => {
                    report.error(depth, format!("Item '{label}' skipped: {err}."));
                    continue;
                }
            };
            match reflector.deserialize_as(child, child_info, report, depth + 1) {
                Ok(item) if item.ty_id() == item_info.ty_id() => items.push(item),
                Ok(item) => report.error(
                    depth,
                    format!(
                        "Item '{label}' skipped: '{}' is not a '{}'.",
                        item.reflect_type_path(),
                        item_info.type_path(),
                    ),
                ),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => report.error(depth, format!("Item '{label}' skipped: {err}.")),
            }
        }

        let found = items.len();
        list.from_items(items).map_err(|_| match list.fixed_len() {
            Some(expected) => ReflectError::LengthMismatch {
                type_path: info.type_path(),
                expected,
                found,
            },
            None => ReflectError::TypeMismatch {
                expected: item_info.type_path(),
                found: info.type_path(),
            },
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
        match self.deserialize(reflector, node, info, report, depth) {
            Ok(list) => {
                assign(target, list, report, depth);
            }
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => report.error(
                depth,
                format!("List '{}' cannot be rebuilt: {err}.", info.type_path()),
            ),
        }
        Ok(())
    }
}
