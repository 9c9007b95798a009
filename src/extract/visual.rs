// Report visual extraction
//
// Walks a report definition JSON and flattens every surface that can
// reference a field - global filters, page filters, and each visual's
// query, filters and formatting objects - into one row per surface.

use super::{alias_map, filter_field_refs, object_field_refs, selected_field_refs};
use miette::{IntoDiagnostic, Result, WrapErr};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// One extracted visual (or filter surface) and its field references
#[derive(Debug, Clone, Default)]
pub struct VisualRow {
    /// Page display name ("All Pages" for report-level filters)
    pub page: String,
    /// Visual type, or a filter-surface marker
    pub visual_type: String,
    /// Visual (or filter) name
    pub visual_name: String,
    /// References from the visual's Select clause
    pub select_fields: Vec<String>,
    /// References from applied filters
    pub filter_fields: Vec<String>,
    /// References from vcObjects formatting settings
    pub vc_object_fields: Vec<String>,
    /// References from objects formatting settings
    pub object_fields: Vec<String>,
}

impl VisualRow {
    /// Iterate every field reference this row carries, in order
    pub fn all_field_refs(&self) -> impl Iterator<Item = &String> {
        self.select_fields
            .iter()
            .chain(self.filter_fields.iter())
            .chain(self.vc_object_fields.iter())
            .chain(self.object_fields.iter())
    }
}

/// All field-reference rows extracted from one report definition
#[derive(Debug, Clone, Default)]
pub struct ReportVisuals {
    rows: Vec<VisualRow>,
}

impl ReportVisuals {
    /// Parse a report definition JSON file
    pub fn parse(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read report definition: {}", path.display()))?;
        let data: Value = serde_json::from_str(&content)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to parse report definition: {}", path.display()))?;
        Ok(Self::from_value(&data))
    }

    /// Extract visual rows from parsed report JSON
    pub fn from_value(data: &Value) -> Self {
        let mut visuals = Self::default();

        // Report-level filters apply to every page
        if let Some(row) = filter_row(data, "All Pages", "Global Level Filters") {
            visuals.rows.push(row);
        }

        if let Some(sections) = data.get("sections").and_then(Value::as_array) {
            for section in sections {
                visuals.process_section(section);
            }
        }

        debug!("Extracted {} visual rows", visuals.rows.len());
        visuals
    }

    fn process_section(&mut self, section: &Value) {
        let page_name = section
            .get("displayName")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if let Some(row) = filter_row(section, &page_name, "Page Level Filters") {
            self.rows.push(row);
        }

        if let Some(containers) = section.get("visualContainers").and_then(Value::as_array) {
            for visual in containers {
                self.rows.push(extract_visual(visual, &page_name));
            }
        }
    }

    /// Build directly from rows already in `Entity[Property]` form
    /// (exporters sometimes hand us the flattened table instead of the
    /// raw report JSON)
    pub fn from_rows(rows: Vec<VisualRow>) -> Self {
        Self { rows }
    }

    /// Extracted rows, in report order
    pub fn rows(&self) -> &[VisualRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build a filter-surface row from a node carrying a `filters` payload.
/// Returns None when there are no filters or none of them resolve.
fn filter_row(node: &Value, page: &str, surface: &str) -> Option<VisualRow> {
    let filters = embedded_array(node, "filters");
    if filters.is_empty() {
        return None;
    }

    let filter_name = filters[0]
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let filter_fields = filter_field_refs(&filters);
    if filter_fields.is_empty() {
        return None;
    }

    Some(VisualRow {
        page: page.to_string(),
        visual_type: surface.to_string(),
        visual_name: filter_name,
        filter_fields,
        ..Default::default()
    })
}

/// Extract one visual container into a row
fn extract_visual(visual: &Value, page: &str) -> VisualRow {
    let config = match embedded_object(visual, "config") {
        Some(config) => config,
        None => {
            return VisualRow {
                page: page.to_string(),
                visual_type: "Unknown visual type".to_string(),
                ..Default::default()
            }
        }
    };

    // Config key names vary by dialect; find whichever entry carries
    // the visualType marker.
    let visual_config = config
        .as_object()
        .into_iter()
        .flat_map(|map| map.values())
        .find(|value| value.get("visualType").is_some());

    let Some(visual_config) = visual_config else {
        return VisualRow {
            page: page.to_string(),
            visual_type: "Unknown visual type".to_string(),
            ..Default::default()
        };
    };

    let visual_type = visual_config
        .get("visualType")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let visual_name = config
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let mut row = VisualRow {
        page: page.to_string(),
        visual_type,
        visual_name,
        ..Default::default()
    };

    // A visual without a query binds no data; its filters and formatting
    // objects cannot reference fields either, so the row stays empty.
    let Some(query) = visual_config.get("prototypeQuery") else {
        return row;
    };

    let aliases = query
        .get("From")
        .and_then(Value::as_array)
        .map(|from| alias_map(from))
        .unwrap_or_default();
    if let Some(select) = query.get("Select").and_then(Value::as_array) {
        row.select_fields = selected_field_refs(select, &aliases);
    }

    row.filter_fields = filter_field_refs(&embedded_array(visual, "filters"));

    if let Some(objects) = visual_config.get("objects") {
        row.object_fields = object_field_refs(objects);
    }
    if let Some(vc_objects) = visual_config.get("vcObjects") {
        row.vc_object_fields = object_field_refs(vc_objects);
    }

    row
}

/// Parse a JSON-string-embedded array field (`filters` payloads are
/// stored as strings inside the report JSON)
fn embedded_array(node: &Value, key: &str) -> Vec<Value> {
    let Some(raw) = node.get(key).and_then(Value::as_str) else {
        return Vec::new();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => Vec::new(),
        Err(err) => {
            warn!("Skipping unparseable embedded {} payload: {}", key, err);
            Vec::new()
        }
    }
}

/// Parse a JSON-string-embedded object field (visual `config` payloads)
fn embedded_object(node: &Value, key: &str) -> Option<Value> {
    let raw = node.get(key).and_then(Value::as_str)?;
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => Some(value),
        Ok(_) => None,
        Err(err) => {
            warn!("Skipping unparseable embedded {} payload: {}", key, err);
            None
        }
    }
}
