use super::AnalysisReport;
use crate::analysis::UnusedReason;
use colored::Colorize;
use miette::Result;

/// Terminal reporter with colored output
pub struct TerminalReporter {
    /// Show per-measure dependency detail in output
    show_detail: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self { show_detail: true }
    }

    pub fn with_detail(mut self, show: bool) -> Self {
        self.show_detail = show;
        self
    }

    pub fn report(&self, report: &AnalysisReport) -> Result<()> {
        let analysis = report.analysis;

        println!();
        println!(
            "{}",
            format!(
                "Model: {} measures, {} graph nodes, {} edges",
                report.dataset.len(),
                report.graph.node_count(),
                report.graph.edge_count()
            )
            .dimmed()
        );

        if analysis.is_empty() {
            println!("{}", "No unused measures found!".green().bold());
            return Ok(());
        }

        println!();
        println!(
            "{}",
            format!(
                "Found {} unused measures ({} immediately, {} via cascade):",
                analysis.total_unused, analysis.immediate_unused, analysis.cascade_unused
            )
            .yellow()
            .bold()
        );
        println!();

        for (index, wave) in analysis.deletion_waves.iter().enumerate() {
            let header = if index == 0 {
                format!("Wave {} - safe to delete now:", index)
            } else {
                format!("Wave {} - safe once waves < {} are removed:", index, index)
            };
            println!("{}", header.cyan().bold());

            for name in wave {
                self.print_measure(report, name);
            }
            println!();
        }

        self.print_summary(report);

        Ok(())
    }

    fn print_measure(&self, report: &AnalysisReport, name: &str) {
        let Some(impact) = report.analysis.impact.get(name) else {
            println!("  {} {}", "○".yellow(), name);
            return;
        };

        let marker = match impact.reason {
            UnusedReason::NeverReferenced => "○".yellow(),
            UnusedReason::ConsumersAllUnused => "◉".red(),
        };
        println!(
            "  {} {} {}",
            marker,
            name.bold(),
            format!("({})", impact.reason).dimmed()
        );

        if self.show_detail {
            if !impact.inputs.is_empty() {
                println!("      {} {}", "inputs:".dimmed(), impact.inputs.join("; "));
            }
            if !impact.consumers.is_empty() {
                println!(
                    "      {} {}",
                    "consumers:".dimmed(),
                    impact.consumers.join("; ")
                );
            }
        }
    }

    fn print_summary(&self, report: &AnalysisReport) {
        let final_measures = report.dataset.final_measures();
        println!(
            "{}",
            format!(
                "Summary: {} unused / {} total measures, {} final measures, {} deletion waves",
                report.analysis.total_unused,
                report.dataset.len(),
                final_measures.len(),
                report.analysis.deletion_waves.len()
            )
            .dimmed()
        );
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
