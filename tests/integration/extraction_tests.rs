//! Integration tests for visual extraction and field-reference
//! normalization against the report fixture.

use measurelens::analysis::used_measures;
use measurelens::extract::ReportVisuals;
use std::path::PathBuf;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_visuals() -> ReportVisuals {
    ReportVisuals::parse(&fixtures_path().join("report.json"))
        .expect("Failed to parse report fixture")
}

#[test]
fn test_all_surfaces_extracted() {
    let visuals = load_visuals();

    // One page-filter row plus four visual containers
    assert_eq!(visuals.len(), 5);

    let types: Vec<&str> = visuals
        .rows()
        .iter()
        .map(|row| row.visual_type.as_str())
        .collect();
    assert_eq!(
        types,
        vec![
            "Page Level Filters",
            "columnChart",
            "card",
            "card",
            "Unknown visual type",
        ]
    );
}

#[test]
fn test_page_filter_fields() {
    let visuals = load_visuals();
    let filter_row = &visuals.rows()[0];

    assert_eq!(filter_row.page, "Overview");
    assert_eq!(filter_row.visual_name, "Filter-Year");
    assert_eq!(filter_row.filter_fields, vec!["Dates[Year]"]);
    assert!(filter_row.select_fields.is_empty());
}

#[test]
fn test_select_alias_resolution_drops_unmapped() {
    let visuals = load_visuals();
    let chart = &visuals.rows()[1];

    assert_eq!(chart.visual_name, "chart1");
    // The chart's Select also names an alias missing from its From
    // clause; that reference is dropped, not erred.
    assert_eq!(chart.select_fields, vec!["Sales[Region]"]);
}

#[test]
fn test_visual_filter_unwraps_logical_wrappers() {
    let visuals = load_visuals();
    let chart = &visuals.rows()[1];

    // The fixture filter is Not(In(Column)): unwrapping reaches the column
    assert_eq!(chart.filter_fields, vec!["Sales[Region]"]);
}

#[test]
fn test_vc_objects_searched_recursively() {
    let visuals = load_visuals();
    let card = &visuals.rows()[3];

    assert_eq!(card.visual_name, "card1");
    assert_eq!(card.vc_object_fields, vec!["Metrics[Margin %]"]);
}

#[test]
fn test_usage_verbatim_mode_includes_columns() {
    let visuals = load_visuals();

    // Without a known-measure universe, every trailing identifier is
    // kept, column properties included.
    let used = used_measures(&visuals, None);
    assert!(used.contains("Year"));
    assert!(used.contains("Region"));
    assert!(used.contains("Total Sales"));
    assert!(used.contains("Margin %"));
}

#[test]
fn test_usage_known_mode_is_case_insensitive() {
    let visuals = load_visuals();
    let known = vec!["TOTAL SALES".to_string(), "margin %".to_string()];
    let used = used_measures(&visuals, Some(&known));

    // Canonical casing comes from the known universe
    assert!(used.contains("TOTAL SALES"));
    assert!(used.contains("margin %"));
    assert_eq!(used.len(), 2);
}
