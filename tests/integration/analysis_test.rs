//! Integration tests for the measurelens analysis pipeline
//!
//! These tests run the full pipeline against the test fixtures: parse the
//! dependency dataset, extract the report visuals, aggregate usage, and
//! run the cascading liveness analysis.

use measurelens::analysis::{used_measures, CascadeAnalyzer, ImpactLeveler, UnusedReason};
use measurelens::extract::ReportVisuals;
use measurelens::graph::{DependencyDataset, GraphBuilder};
use std::collections::HashSet;
use std::path::PathBuf;

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_dataset() -> DependencyDataset {
    DependencyDataset::parse(&fixtures_path().join("MeasureDependencies.tsv"))
        .expect("Failed to parse dependency fixture")
}

fn load_visuals() -> ReportVisuals {
    ReportVisuals::parse(&fixtures_path().join("report.json"))
        .expect("Failed to parse report fixture")
}

#[test]
fn test_dataset_fixture_parses() {
    let dataset = load_dataset();
    assert_eq!(dataset.len(), 7);

    let margin = dataset.get("Margin").expect("Margin record");
    assert_eq!(margin.inputs, vec!["Total Sales", "Total Cost"]);
    assert_eq!(margin.consumers, vec!["Margin %"]);

    assert_eq!(
        dataset.final_measures(),
        vec!["Legacy Ratio", "Margin %", "Orphan KPI"]
    );
}

#[test]
fn test_graph_shape_from_fixture() {
    let dataset = load_dataset();
    let graph = GraphBuilder::build_from_dataset(&dataset);

    // 7 measures + 3 distinct root-measure columns
    assert_eq!(graph.node_count(), 10);
    assert_eq!(graph.edge_count(), 9);

    // Column edges only exist for root measures
    assert!(graph.get_node("Sales[Amount]").is_some());
    let amount_deps: HashSet<&str> =
        graph.direct_dependents("Total Sales").into_iter().collect();
    assert!(amount_deps.contains("Margin"));
    assert!(amount_deps.contains("Margin %"));
}

#[test]
fn test_edge_dedup_across_duplicate_rows() {
    let dataset = load_dataset();
    let once = GraphBuilder::build_from_dataset(&dataset);

    // Feeding every record twice must not duplicate any (source, target)
    let mut builder = GraphBuilder::new();
    for record in dataset.records() {
        builder.add_record(record);
        builder.add_record(record);
    }
    let twice = builder.build();

    assert_eq!(once.edge_count(), twice.edge_count());
    assert_eq!(once.node_count(), twice.node_count());
}

#[test]
fn test_directly_used_measures() {
    let dataset = load_dataset();
    let visuals = load_visuals();
    let all = dataset.all_measures();

    let used = used_measures(&visuals, Some(&all));
    let expected: HashSet<String> = ["Total Sales", "Margin %"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(used, expected);
}

#[test]
fn test_cascading_unused_analysis() {
    let dataset = load_dataset();
    let visuals = load_visuals();
    let all = dataset.all_measures();
    let used = used_measures(&visuals, Some(&all));

    let analyzer = CascadeAnalyzer::new(dataset.record_map());
    let analysis = analyzer.analyze(&all, &used);

    assert_eq!(
        analysis.all_unused,
        vec!["Legacy Base", "Legacy Ratio", "Orphan KPI"]
    );
    assert_eq!(
        analysis.deletion_waves,
        vec![
            vec!["Legacy Ratio".to_string(), "Orphan KPI".to_string()],
            vec!["Legacy Base".to_string()],
        ]
    );
    assert_eq!(analysis.total_unused, 3);
    assert_eq!(analysis.immediate_unused, 2);
    assert_eq!(analysis.cascade_unused, 1);

    assert_eq!(
        analysis.impact["Orphan KPI"].reason,
        UnusedReason::NeverReferenced
    );
    assert_eq!(
        analysis.impact["Legacy Base"].reason,
        UnusedReason::ConsumersAllUnused
    );
    assert_eq!(analysis.impact["Legacy Base"].wave, 1);

    // Measures with a live consumer chain must survive
    assert!(!analysis.all_unused.contains(&"Margin".to_string()));
    assert!(!analysis.all_unused.contains(&"Total Cost".to_string()));
}

#[test]
fn test_no_false_cascade_on_fixture() {
    let dataset = load_dataset();
    let visuals = load_visuals();
    let all = dataset.all_measures();
    let used = used_measures(&visuals, Some(&all));
    let analysis = CascadeAnalyzer::new(dataset.record_map()).analyze(&all, &used);

    let unused: HashSet<&String> = analysis.all_unused.iter().collect();
    for name in &analysis.all_unused {
        let record = dataset.get(name).expect("unused measure has a record");
        for consumer in &record.consumers {
            assert!(
                unused.contains(consumer),
                "{} marked unused while consumer {} is live",
                name,
                consumer
            );
        }
    }
}

#[test]
fn test_analysis_is_idempotent() {
    let dataset = load_dataset();
    let visuals = load_visuals();
    let all = dataset.all_measures();
    let used = used_measures(&visuals, Some(&all));
    let analyzer = CascadeAnalyzer::new(dataset.record_map());

    let first = analyzer.analyze(&all, &used);
    let second = analyzer.analyze(&all, &used);

    assert_eq!(first.all_unused, second.all_unused);
    assert_eq!(first.deletion_waves, second.deletion_waves);
}

#[test]
fn test_deletion_impact_on_fixture() {
    let dataset = load_dataset();
    let graph = GraphBuilder::build_from_dataset(&dataset);
    let leveler = ImpactLeveler::new(&graph, dataset.record_map());

    // Deleting both of Margin's inputs breaks Margin (level 1), and then
    // Margin % loses Margin but still has Total Sales... which is also a
    // candidate here, so Margin % goes at level 2.
    let impact = leveler.assess(&["Total Sales".to_string(), "Total Cost".to_string()]);
    assert_eq!(impact.levels[0], vec!["Margin"]);
    assert_eq!(impact.levels[1], vec!["Margin %"]);
    assert_eq!(impact.score, 1 + 2);

    // Deleting only Total Cost breaks nothing outright
    let partial = leveler.assess(&["Total Cost".to_string()]);
    assert_eq!(partial.score, 0);
}
