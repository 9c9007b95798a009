mod json;
mod terminal;

pub use json::JsonReporter;
pub use terminal::TerminalReporter;

use crate::analysis::UnusedAnalysis;
use crate::graph::{DependencyDataset, LineageGraph};
use miette::Result;
use std::path::PathBuf;

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Terminal,
    Json,
}

/// Everything a reporter needs to render one analysis run
pub struct AnalysisReport<'a> {
    pub dataset: &'a DependencyDataset,
    pub graph: &'a LineageGraph,
    pub analysis: &'a UnusedAnalysis,
}

/// Dispatches to the concrete reporter for the chosen format
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
    show_detail: bool,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>, show_detail: bool) -> Self {
        Self {
            format,
            output_path,
            show_detail,
        }
    }

    pub fn report(&self, report: &AnalysisReport) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => TerminalReporter::new()
                .with_detail(self.show_detail)
                .report(report),
            ReportFormat::Json => JsonReporter::new(self.output_path.clone()).report(report),
        }
    }
}
