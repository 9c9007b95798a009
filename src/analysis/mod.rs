// Analysis module - some types reserved for future use
#![allow(dead_code)]

mod impact;
mod liveness;
mod usage;

pub use impact::{DeletionImpact, ImpactLeveler};
pub use liveness::CascadeAnalyzer;
pub use usage::used_measures;

use serde::Serialize;
use std::collections::BTreeMap;

/// Why a measure was classified unused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnusedReason {
    /// Not on any visual surface and consumed by no other measure
    NeverReferenced,
    /// Not on any visual surface; had consumers, but every one of them
    /// is itself unused
    ConsumersAllUnused,
}

impl UnusedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnusedReason::NeverReferenced => "never referenced",
            UnusedReason::ConsumersAllUnused => "all consumers unused",
        }
    }

    pub fn describe(&self, name: &str) -> String {
        match self {
            UnusedReason::NeverReferenced => {
                format!("Measure '{}' is never used and feeds no other measure", name)
            }
            UnusedReason::ConsumersAllUnused => {
                format!(
                    "Measure '{}' is never used directly and every measure consuming it is unused",
                    name
                )
            }
        }
    }
}

impl std::fmt::Display for UnusedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-measure impact record for one unused measure
#[derive(Debug, Clone, Serialize)]
pub struct MeasureImpact {
    /// Upstream measures this one's formula consumes
    pub inputs: Vec<String>,
    /// Downstream measures whose formulas consume this one
    pub consumers: Vec<String>,
    pub reason: UnusedReason,
    /// Index of the deletion wave this measure belongs to
    pub wave: usize,
}

/// Result of one cascading liveness run.
///
/// Recomputed fresh from the dependency records and the used-measure set
/// on every invocation; never persisted or mutated incrementally.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UnusedAnalysis {
    /// Every measure safe to remove, sorted for determinism
    pub all_unused: Vec<String>,
    /// Safe removal order: wave 0 can be deleted immediately, wave k
    /// requires waves < k already removed
    pub deletion_waves: Vec<Vec<String>>,
    /// Impact record per unused measure
    pub impact: BTreeMap<String, MeasureImpact>,
    pub total_unused: usize,
    /// Measures unused without any cascade (wave 0)
    pub immediate_unused: usize,
    /// Measures that became unused only through cascading
    pub cascade_unused: usize,
}

impl UnusedAnalysis {
    pub fn is_empty(&self) -> bool {
        self.all_unused.is_empty()
    }
}
