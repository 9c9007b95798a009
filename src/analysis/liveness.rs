// Cascading liveness analysis
//
// Mark-and-sweep over the measure dependency records: a measure is safe
// to remove when nothing a user can see reaches it, directly or through
// any chain of consumers. Removal eligibility propagates in waves so the
// output doubles as a safe deletion order.

use super::{MeasureImpact, UnusedAnalysis, UnusedReason};
use crate::graph::MeasureRecord;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Fixpoint analyzer for cascading unused-measure detection
pub struct CascadeAnalyzer<'a> {
    records: &'a HashMap<String, MeasureRecord>,
}

impl<'a> CascadeAnalyzer<'a> {
    pub fn new(records: &'a HashMap<String, MeasureRecord>) -> Self {
        Self { records }
    }

    /// Compute the full unused set, deletion waves and per-measure impact.
    ///
    /// `all_measures` is the known-measure universe; `used` is the set of
    /// names directly referenced on the report surface. A measure enters
    /// a wave only when every member of its consumer list is already in
    /// the unused set, so a consumer that stays live (or is unknown to
    /// the dataset) blocks its feeders forever. Cycles of mutually
    /// consuming measures therefore never cascade, which is the safe
    /// default on data that is assumed acyclic.
    pub fn analyze(&self, all_measures: &[String], used: &HashSet<String>) -> UnusedAnalysis {
        // Candidates: everything not directly used
        let candidates: Vec<&String> = all_measures.iter().filter(|m| !used.contains(*m)).collect();

        let mut unused: HashSet<String> = HashSet::new();
        let mut deletion_waves: Vec<Vec<String>> = Vec::new();
        let mut wave_of: HashMap<String, usize> = HashMap::new();

        loop {
            // Promotion checks the set as of the previous wave; the wave
            // under construction must not see its own members.
            let wave: BTreeSet<String> = candidates
                .iter()
                .filter(|m| !unused.contains(**m))
                .filter(|m| self.all_consumers_unused(m, &unused))
                .map(|m| (*m).clone())
                .collect();

            if wave.is_empty() {
                break;
            }

            for name in &wave {
                unused.insert(name.clone());
                wave_of.insert(name.clone(), deletion_waves.len());
            }
            deletion_waves.push(wave.into_iter().collect());
        }

        let mut all_unused: Vec<String> = unused.iter().cloned().collect();
        all_unused.sort();

        let impact = all_unused
            .iter()
            .map(|name| {
                let record = self.records.get(name);
                let consumers: Vec<String> =
                    record.map(|r| r.consumers.clone()).unwrap_or_default();
                let reason = if consumers.is_empty() {
                    UnusedReason::NeverReferenced
                } else {
                    UnusedReason::ConsumersAllUnused
                };
                let impact = MeasureImpact {
                    inputs: record.map(|r| r.inputs.clone()).unwrap_or_default(),
                    consumers,
                    reason,
                    wave: wave_of.get(name).copied().unwrap_or_default(),
                };
                (name.clone(), impact)
            })
            .collect();

        let total_unused = all_unused.len();
        let immediate_unused = deletion_waves.first().map(Vec::len).unwrap_or(0);
        debug!(
            "Liveness: {} unused of {} measures in {} waves",
            total_unused,
            all_measures.len(),
            deletion_waves.len()
        );

        UnusedAnalysis {
            all_unused,
            cascade_unused: total_unused - immediate_unused,
            deletion_waves,
            impact,
            total_unused,
            immediate_unused,
        }
    }

    /// True when the measure's consumer list is empty or entirely inside
    /// the unused set. A consumer with no dataset record counts as live.
    fn all_consumers_unused(&self, name: &str, unused: &HashSet<String>) -> bool {
        match self.records.get(name) {
            Some(record) => record.consumers.iter().all(|c| unused.contains(c)),
            None => true,
        }
    }
}
