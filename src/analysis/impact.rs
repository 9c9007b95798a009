// Deletion impact leveling
//
// Given an arbitrary candidate set of measures to delete, estimate what
// else would break. Bounded at three dependent levels; this is an
// interactive approximation, not a full fixpoint.

use crate::graph::{LineageGraph, MeasureRecord};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

/// How many dependent levels the leveler explores
const MAX_LEVELS: usize = 3;

/// Bounded impact assessment for a candidate deletion set
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeletionImpact {
    /// Additional measures broken per level: direct dependents, then
    /// dependents-of-dependents, then one level further
    pub levels: Vec<Vec<String>>,
    /// Weighted score: level-1 hits weigh 1, level-2 weigh 2, level-3 weigh 3
    pub score: usize,
}

impl DeletionImpact {
    pub fn total_affected(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }
}

/// Assesses the blast radius of deleting a set of measures
pub struct ImpactLeveler<'a> {
    graph: &'a LineageGraph,
    records: &'a HashMap<String, MeasureRecord>,
}

impl<'a> ImpactLeveler<'a> {
    pub fn new(graph: &'a LineageGraph, records: &'a HashMap<String, MeasureRecord>) -> Self {
        Self { graph, records }
    }

    /// Compute which additional measures would lose *all* of their inputs
    /// if the candidates (plus anything classified at an earlier level)
    /// were deleted.
    pub fn assess(&self, candidates: &[String]) -> DeletionImpact {
        let mut classified: HashSet<String> = candidates.iter().cloned().collect();
        let mut levels: Vec<Vec<String>> = Vec::new();
        let mut score = 0;

        for level in 1..=MAX_LEVELS {
            // Dependents reachable from the current classified set
            let frontier: BTreeSet<String> = classified
                .iter()
                .flat_map(|name| self.graph.direct_dependents(name))
                .map(str::to_string)
                .filter(|name| !classified.contains(name))
                .collect();

            let hits: Vec<String> = frontier
                .into_iter()
                .filter(|name| self.inputs_all_classified(name, &classified))
                .collect();

            if hits.is_empty() {
                break;
            }

            score += level * hits.len();
            for name in &hits {
                classified.insert(name.clone());
            }
            levels.push(hits);
        }

        DeletionImpact { levels, score }
    }

    /// A dependent counts only when its input list is non-empty and
    /// entirely inside the classified set.
    fn inputs_all_classified(&self, name: &str, classified: &HashSet<String>) -> bool {
        match self.records.get(name) {
            Some(record) => {
                !record.inputs.is_empty()
                    && record.inputs.iter().all(|input| classified.contains(input))
            }
            None => false,
        }
    }
}
