//! CLI integration tests using assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn cmd() -> Command {
    Command::cargo_bin("measurelens").expect("binary builds")
}

#[test]
fn test_terminal_report_lists_unused() {
    cmd()
        .arg("--dependencies")
        .arg(fixtures_path().join("MeasureDependencies.tsv"))
        .arg("--report")
        .arg(fixtures_path().join("report.json"))
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Orphan KPI"))
        .stdout(predicate::str::contains("Legacy Base"))
        .stdout(predicate::str::contains("Wave 1"));
}

#[test]
fn test_json_report_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.json");

    cmd()
        .arg("--dependencies")
        .arg(fixtures_path().join("MeasureDependencies.tsv"))
        .arg("--report")
        .arg(fixtures_path().join("report.json"))
        .arg("--format")
        .arg("json")
        .arg("--output")
        .arg(&out)
        .arg("--quiet")
        .assert()
        .success();

    let payload: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(payload["unused"]["total_unused"], 3);
    assert_eq!(
        payload["unused"]["all_unused"],
        serde_json::json!(["Legacy Base", "Legacy Ratio", "Orphan KPI"])
    );
    assert!(payload["graph"]["nodes"].as_array().unwrap().len() > 0);
    assert_eq!(
        payload["measures"]["final"],
        serde_json::json!(["Legacy Ratio", "Margin %", "Orphan KPI"])
    );
}

#[test]
fn test_missing_inputs_fail() {
    cmd()
        .arg("--quiet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("dependency dataset"));
}

#[test]
fn test_malformed_dataset_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let tsv = dir.path().join("bad.tsv");
    std::fs::write(&tsv, "Measure\tExpression\nOnlyTwo\tcolumns\n").unwrap();

    cmd()
        .arg("--dependencies")
        .arg(&tsv)
        .arg("--report")
        .arg(fixtures_path().join("report.json"))
        .arg("--quiet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed"));
}

#[test]
fn test_config_show_detail_off_hides_dependency_lines() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("measurelens.toml");
    std::fs::write(
        &cfg,
        format!(
            "dependencies_path = \"{}\"\nreport_path = \"{}\"\n\n[report]\nshow_detail = false\n",
            fixtures_path().join("MeasureDependencies.tsv").display(),
            fixtures_path().join("report.json").display()
        ),
    )
    .unwrap();

    cmd()
        .arg("--config")
        .arg(&cfg)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Legacy Base"))
        .stdout(predicate::str::contains("inputs:").not());

    // Default config keeps the detail lines
    cmd()
        .arg("--dependencies")
        .arg(fixtures_path().join("MeasureDependencies.tsv"))
        .arg("--report")
        .arg(fixtures_path().join("report.json"))
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("inputs:"));
}

#[test]
fn test_impact_flag_reports_levels() {
    cmd()
        .arg("--dependencies")
        .arg(fixtures_path().join("MeasureDependencies.tsv"))
        .arg("--report")
        .arg(fixtures_path().join("report.json"))
        .arg("--impact")
        .arg("Total Sales; Total Cost")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("level 1:"))
        .stdout(predicate::str::contains("Margin"));
}
