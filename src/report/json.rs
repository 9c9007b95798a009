use super::AnalysisReport;
use crate::analysis::UnusedAnalysis;
use crate::graph::NodeKind;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, report: &AnalysisReport) -> Result<()> {
        let payload = JsonReport::from_report(report);
        let json = serde_json::to_string_pretty(&payload).into_diagnostic()?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    measures: JsonMeasures,
    graph: JsonGraph,
    unused: &'a UnusedAnalysis,
}

#[derive(Serialize)]
struct JsonMeasures {
    all: Vec<String>,
    /// Measures no other measure consumes (display classification)
    r#final: Vec<String>,
}

#[derive(Serialize)]
struct JsonGraph {
    nodes: Vec<JsonNode>,
    edges: Vec<JsonEdge>,
}

#[derive(Serialize)]
struct JsonNode {
    id: String,
    label: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    node_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expression: Option<String>,
}

#[derive(Serialize)]
struct JsonEdge {
    from: String,
    to: String,
}

impl<'a> JsonReport<'a> {
    fn from_report(report: &AnalysisReport<'a>) -> Self {
        // Expression text goes out with escape sequences expanded so
        // consumers render multi-line formulas as authored
        let mut expressions: HashMap<String, String> =
            report.dataset.expressions().into_iter().collect();

        let nodes = report
            .graph
            .nodes()
            .map(|node| JsonNode {
                id: node.id.clone(),
                label: node.label.clone(),
                node_type: match node.kind {
                    NodeKind::Column => Some("column"),
                    NodeKind::Measure => None,
                },
                expression: expressions
                    .remove(&node.id)
                    .or_else(|| node.expression.clone()),
            })
            .collect();

        let edges = report
            .graph
            .edges()
            .map(|edge| JsonEdge {
                from: edge.from.clone(),
                to: edge.to.clone(),
            })
            .collect();

        Self {
            version: "1.1",
            measures: JsonMeasures {
                all: report.dataset.all_measures(),
                r#final: report.dataset.final_measures(),
            },
            graph: JsonGraph { nodes, edges },
            unused: report.analysis,
        }
    }
}
