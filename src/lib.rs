//! measurelens - Fast unused-measure detection for BI report models
//!
//! This library analyzes a report's internal dependency structure to
//! determine which computed measures are actually reachable from anything
//! a user can see, and which are dead.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **Dataset Parsing** - Parse the measure dependency TSV export
//! 2. **Graph Building** - Build the measure/column lineage graph
//! 3. **Field Extraction** - Normalize visual definitions into canonical
//!    `Entity[Property]` references
//! 4. **Usage Aggregation** - Collect the directly-used measure set
//! 5. **Cascading Liveness** - Find every measure safe to remove, in
//!    deletion-order waves
//! 6. **Reporting** - Output results in terminal or JSON form

pub mod analysis;
pub mod config;
pub mod extract;
pub mod graph;
pub mod report;

pub use analysis::{
    used_measures, CascadeAnalyzer, DeletionImpact, ImpactLeveler, MeasureImpact, UnusedAnalysis,
    UnusedReason,
};
pub use config::Config;
pub use extract::{ReportVisuals, VisualRow};
pub use graph::{DependencyDataset, GraphBuilder, LineageGraph, MeasureRecord};
pub use report::{Reporter, ReportFormat};
