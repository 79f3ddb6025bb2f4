//! Deterministic ranking of influence scores.

use crate::graph::ModelGraph;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One row of a ranking or per-iteration snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub id: String,
    pub influence: f64,
}

/// Ranks the graph's current influence scores.
///
/// Sorted by influence descending; ties broken by node id ascending so
/// the output is stable across runs. The graph is not mutated.
pub fn rank(graph: &ModelGraph) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = graph
        .nodes()
        .map(|node| RankedEntry {
            id: node.id.clone(),
            influence: node.influence,
        })
        .collect();
    sort_descending(&mut entries);
    entries
}

/// Sorts entries by influence descending, ties by id ascending.
///
/// Influence values are finite by construction, so the partial
/// comparison never actually falls back to `Equal` for NaN.
pub fn sort_descending(entries: &mut [RankedEntry]) {
    entries.sort_by(|a, b| {
        b.influence
            .partial_cmp(&a.influence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
}
