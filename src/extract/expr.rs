// Query expression decoding
//
// Visual definitions carry several historical dialects of the same query
// schema. Instead of duck-typing nested maps everywhere, each raw
// substructure is decoded once at the boundary into a closed variant set;
// the extractors then operate over explicit shapes only.

#![allow(dead_code)] // Some variants reserved for dialects seen in the wild

use serde_json::Value;
use std::collections::HashMap;

/// Where a field descriptor points: a `From`-clause alias, a directly
/// embedded entity name, or nothing resolvable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// Short alias that must be resolved through the From-clause map
    Alias(String),
    /// Full entity name embedded in the reference
    Entity(String),
    Unknown,
}

/// A terminal column/measure descriptor: a source plus a property name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub source: SourceRef,
    pub property: String,
}

impl FieldDescriptor {
    /// Resolve to a canonical `Entity[Property]` reference.
    ///
    /// Aliases resolve through the mapping; a missing mapping entry or an
    /// unknown source drops the reference (soft miss, never an error).
    pub fn resolve(&self, aliases: Option<&HashMap<String, String>>) -> Option<String> {
        let entity = match &self.source {
            SourceRef::Alias(alias) => aliases.and_then(|map| map.get(alias)).cloned()?,
            SourceRef::Entity(entity) => entity.clone(),
            SourceRef::Unknown => return None,
        };
        if entity.is_empty() || self.property.is_empty() {
            return None;
        }
        Some(format!("{}[{}]", entity, self.property))
    }
}

/// One decoded query/filter expression
#[derive(Debug, Clone)]
pub enum QueryExpr {
    /// Reference to a table column
    Column(FieldDescriptor),
    /// Reference to a measure
    Measure(FieldDescriptor),
    /// Aggregation wrapping an underlying expression
    Aggregation(Box<QueryExpr>),
    /// Logical negation wrapper
    Not(Box<QueryExpr>),
    /// Inclusion-list wrapper (`IN (...)` predicates)
    In(Vec<QueryExpr>),
    /// Comparison/condition wrapper; only the left side can carry a field
    Condition(Box<QueryExpr>),
    /// Anything the closed set does not model
    Opaque,
}

impl QueryExpr {
    /// Decode a raw expression substructure into the variant set.
    ///
    /// Unknown shapes decode to `Opaque` rather than erroring; the report
    /// format has accumulated shapes this analysis has no use for.
    pub fn decode(value: &Value) -> QueryExpr {
        let Some(map) = value.as_object() else {
            return QueryExpr::Opaque;
        };

        if let Some(inner) = map.get("Column") {
            return QueryExpr::Column(decode_descriptor(inner));
        }
        if let Some(inner) = map.get("Measure") {
            return QueryExpr::Measure(decode_descriptor(inner));
        }
        if let Some(inner) = map.get("Aggregation") {
            let wrapped = inner.get("Expression").unwrap_or(inner);
            return QueryExpr::Aggregation(Box::new(QueryExpr::decode(wrapped)));
        }
        if let Some(inner) = map.get("Not") {
            let wrapped = inner.get("Expression").unwrap_or(inner);
            return QueryExpr::Not(Box::new(QueryExpr::decode(wrapped)));
        }
        if let Some(inner) = map.get("In") {
            let exprs = inner
                .get("Expressions")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(QueryExpr::decode).collect())
                .unwrap_or_default();
            return QueryExpr::In(exprs);
        }
        if let Some(inner) = map.get("Comparison") {
            let left = inner.get("Left").unwrap_or(inner);
            return QueryExpr::Condition(Box::new(QueryExpr::decode(left)));
        }

        QueryExpr::Opaque
    }

    /// Recursively unwrap to the first terminal column/measure descriptor.
    ///
    /// A structure with no terminal reference yields `None`; that is a
    /// soft extraction miss, not an error.
    pub fn terminal(&self) -> Option<&FieldDescriptor> {
        match self {
            QueryExpr::Column(desc) | QueryExpr::Measure(desc) => Some(desc),
            QueryExpr::Aggregation(inner)
            | QueryExpr::Not(inner)
            | QueryExpr::Condition(inner) => inner.terminal(),
            QueryExpr::In(exprs) => exprs.iter().find_map(QueryExpr::terminal),
            QueryExpr::Opaque => None,
        }
    }
}

/// Decode the `{Expression: {SourceRef: ...}, Property}` descriptor shape
pub(crate) fn decode_descriptor(value: &Value) -> FieldDescriptor {
    let property = value
        .get("Property")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let source_ref = value.get("Expression").and_then(|e| e.get("SourceRef"));
    let source = match source_ref {
        Some(sr) => {
            if let Some(entity) = sr.get("Entity").and_then(Value::as_str) {
                SourceRef::Entity(entity.to_string())
            } else if let Some(alias) = sr.get("Source").and_then(Value::as_str) {
                SourceRef::Alias(alias.to_string())
            } else {
                SourceRef::Unknown
            }
        }
        None => SourceRef::Unknown,
    };

    FieldDescriptor { source, property }
}
