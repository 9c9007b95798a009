// Usage aggregation
//
// Reduces every visual's field references to the set of measure names
// directly consumed somewhere on the report surface.

use crate::extract::ReportVisuals;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Collect the set of measure names directly referenced by any visual's
/// selected fields, applied filters, or formatting objects.
///
/// Each `Entity[Property]` reference is reduced to its trailing bracketed
/// property. Column properties and measure properties are syntactically
/// indistinguishable at that point, so when `known_measures` is supplied
/// only names that case-insensitively match a known measure are retained,
/// resolved to the known measure's canonical casing. An ambiguous match
/// resolves to the first known measure in sorted order. Without a known
/// universe every extracted trailing identifier is kept verbatim.
pub fn used_measures(visuals: &ReportVisuals, known_measures: Option<&[String]>) -> HashSet<String> {
    // First-in-sorted-order wins for case-insensitive collisions
    let canonical: Option<HashMap<String, &String>> = known_measures.map(|names| {
        let mut sorted: Vec<&String> = names.iter().collect();
        sorted.sort();
        let mut map = HashMap::new();
        for name in sorted {
            map.entry(name.to_lowercase()).or_insert(name);
        }
        map
    });

    let mut used = HashSet::new();
    for row in visuals.rows() {
        for field in row.all_field_refs() {
            let Some(property) = trailing_property(field) else {
                continue;
            };
            match &canonical {
                Some(map) => {
                    if let Some(&name) = map.get(&property.to_lowercase()) {
                        used.insert(name.clone());
                    }
                }
                None => {
                    used.insert(property.to_string());
                }
            }
        }
    }

    debug!("Found {} directly used measures", used.len());
    used
}

/// The substring after the final `[`, excluding a trailing `]`; empty
/// results are noise and yield None.
fn trailing_property(field: &str) -> Option<&str> {
    let after = field.rsplit('[').next().unwrap_or(field);
    let property = after.trim_end_matches(']').trim();
    if property.is_empty() {
        None
    } else {
        Some(property)
    }
}
