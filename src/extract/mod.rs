// Field reference extraction - some helpers reserved for future use
#![allow(dead_code)]

mod expr;
mod visual;

pub use expr::{FieldDescriptor, QueryExpr, SourceRef};
pub use visual::{ReportVisuals, VisualRow};

use serde_json::Value;
use std::collections::HashMap;

/// Normalize a visual's `Select` clause into canonical field references.
///
/// Select entries reference tables by short alias; the `From`-clause
/// mapping resolves each alias to its entity name. Entries with no
/// resolvable entity are dropped.
pub fn selected_field_refs(select: &[Value], aliases: &HashMap<String, String>) -> Vec<String> {
    select
        .iter()
        .map(QueryExpr::decode)
        .filter_map(|expr| {
            expr.terminal()
                .and_then(|desc| desc.resolve(Some(aliases)))
        })
        .collect()
}

/// Build the alias -> entity mapping from a `From` clause
pub fn alias_map(from: &[Value]) -> HashMap<String, String> {
    from.iter()
        .filter_map(|item| {
            let name = item.get("Name")?.as_str()?;
            let entity = item.get("Entity")?.as_str()?;
            Some((name.to_string(), entity.to_string()))
        })
        .collect()
}

/// Normalize an applied-filter list into canonical field references.
///
/// Each filter carries an `expression` object; logical wrappers are
/// unwrapped recursively until a terminal column/measure reference is
/// found. Filters without one contribute nothing.
pub fn filter_field_refs(filters: &[Value]) -> Vec<String> {
    filters
        .iter()
        .filter_map(|filter| filter.get("expression"))
        .map(QueryExpr::decode)
        .filter_map(|expr| expr.terminal().and_then(|desc| desc.resolve(None)))
        .collect()
}

/// Recursively search object/vcObject settings for field references.
///
/// These substructures are arbitrarily deep maps of arbitrary keys to
/// nested maps or lists; every branch is searched for the
/// `{Expression: {SourceRef}, Property}` shape. Scalar leaves contribute
/// nothing and recursion terminates on any depth because the input is a
/// finite tree.
pub fn object_field_refs(value: &Value) -> Vec<String> {
    let mut refs = Vec::new();
    collect_object_refs(value, &mut refs);
    refs
}

fn collect_object_refs(value: &Value, refs: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for child in map.values() {
                if let Some(descriptor) = object_descriptor(child) {
                    // Shape matched; emit if resolvable, never recurse inside
                    if let Some(field) = descriptor.resolve(None) {
                        refs.push(field);
                    }
                } else {
                    collect_object_refs(child, refs);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_object_refs(item, refs);
            }
        }
        // Numbers, strings, booleans, null
        _ => {}
    }
}

/// Match the `{Expression: {SourceRef: ...}, Property}` descriptor shape.
///
/// Returns the descriptor whenever the shape is present, even if the
/// entity cannot be resolved; callers decide whether to drop it.
fn object_descriptor(value: &Value) -> Option<FieldDescriptor> {
    let map = value.as_object()?;
    map.get("Property")?;
    map.get("Expression")?.get("SourceRef")?;
    Some(expr::decode_descriptor(value))
}

/// Join references for display; the lists stay semicolon-delimited in
/// every surface that renders them.
pub fn join_refs(refs: &[String]) -> String {
    refs.join("; ")
}
