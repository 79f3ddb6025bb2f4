//! Influence propagation: the fixed-point solver.
//!
//! Each iteration recomputes every node's influence from the previous
//! iteration's full snapshot (Jacobi-style). No value written in the
//! current step is ever read in the same step, so the result is
//! independent of node visitation order. Cycles are harmless: every
//! read is neighbor-local against the frozen snapshot, no recursion.

use crate::convergence::ConvergenceMonitor;
use crate::error::GraphError;
use crate::graph::{ModelGraph, NodeId};
use crate::ranking::{sort_descending, RankedEntry};
use crate::self_influence::self_influence;
use modelrank_core::{ArtifactTable, ConfigError, InfluenceConfig};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Optional per-iteration audit hook.
///
/// Receives the iteration number (1-based) and the ranked snapshot of
/// that iteration's influence values. Purely a side channel: it never
/// affects termination or results.
pub type SnapshotObserver<'a> = &'a mut dyn FnMut(usize, &[RankedEntry]);

/// Result of a propagation run.
///
/// An exhausted iteration budget is reported here, not raised as an
/// error: the influence map on the graph is still the best-effort
/// result and the caller judges acceptability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PropagationOutcome {
    /// Whether the total change fell below tolerance.
    pub converged: bool,

    /// Number of update steps executed.
    pub iterations: usize,

    /// Total absolute change of the last step.
    pub final_diff: f64,
}

/// The fixed-point solver.
///
/// Owns nothing but the configuration; the graph and artifact table are
/// borrowed per run. The graph's structure is never modified, only the
/// per-node `influence` field on finalization.
#[derive(Debug, Clone)]
pub struct PropagationEngine {
    config: InfluenceConfig,
}

impl PropagationEngine {
    /// Creates an engine, validating the configuration up front.
    pub fn new(config: InfluenceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration this engine runs with.
    pub fn config(&self) -> &InfluenceConfig {
        &self.config
    }

    /// Runs propagation to convergence or budget exhaustion.
    pub fn run(
        &self,
        graph: &mut ModelGraph,
        artifacts: &ArtifactTable,
    ) -> Result<PropagationOutcome, GraphError> {
        self.run_observed(graph, artifacts, None)
    }

    /// Runs propagation, feeding each iteration's ranked snapshot to an
    /// observer.
    pub fn run_observed(
        &self,
        graph: &mut ModelGraph,
        artifacts: &ArtifactTable,
        mut observer: Option<SnapshotObserver>,
    ) -> Result<PropagationOutcome, GraphError> {
        if graph.node_count() == 0 {
            return Err(GraphError::MissingInput("graph has no nodes"));
        }

        let config = &self.config;
        let indices: Vec<NodeId> = graph.node_indexes().collect();
        let slots = indices.iter().map(|i| i.index()).max().unwrap_or(0) + 1;

        // Initialized: influence starts at self-influence. Computed
        // once and reused; it does not depend on the iteration.
        let mut self_inf = vec![0.0; slots];
        for &idx in &indices {
            self_inf[idx.index()] = self_influence(&graph.graph[idx], artifacts, config);
        }
        let mut prev = self_inf.clone();

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            max_iter = config.max_iter,
            "starting influence propagation"
        );

        let mut monitor = ConvergenceMonitor::new(config.tol);
        for iteration in 1..=config.max_iter {
            let mut next = vec![0.0; slots];
            for &idx in &indices {
                let slot = idx.index();

                let mut child_sum = 0.0;
                let mut out_degree = 0usize;
                for edge_ref in graph.graph.edges_directed(idx, Direction::Outgoing) {
                    child_sum += edge_ref.weight().weight * prev[edge_ref.target().index()];
                    out_degree += 1;
                }
                let child_term = child_sum / out_degree.max(1) as f64;

                let mut parent_sum = 0.0;
                let mut in_degree = 0usize;
                for edge_ref in graph.graph.edges_directed(idx, Direction::Incoming) {
                    parent_sum += edge_ref.weight().weight * prev[edge_ref.source().index()];
                    in_degree += 1;
                }
                let parent_term = parent_sum / in_degree.max(1) as f64;

                next[slot] = config.alpha1 * self_inf[slot]
                    + config.alpha2 * child_term
                    + config.alpha3 * parent_term;
            }

            let diff: f64 = indices
                .iter()
                .map(|i| (next[i.index()] - prev[i.index()]).abs())
                .sum();
            debug!(iteration, diff, "propagation step");

            // Whole-snapshot swap: the new map becomes visible at once.
            prev = next;

            if let Some(obs) = observer.as_deref_mut() {
                let snapshot = ranked_snapshot(graph, &indices, &prev);
                obs(iteration, &snapshot);
            }

            if monitor.record(diff) {
                break;
            }
        }

        let converged = monitor.has_converged();
        if !converged {
            warn!(
                iterations = monitor.iterations(),
                final_diff = monitor.final_diff(),
                "iteration budget exhausted before convergence"
            );
        }

        // Finalized: write the scores back onto the graph.
        for &idx in &indices {
            graph.graph[idx].influence = prev[idx.index()];
        }

        let outcome = PropagationOutcome {
            converged,
            iterations: monitor.iterations(),
            final_diff: monitor.final_diff().unwrap_or(0.0),
        };
        info!(
            converged = outcome.converged,
            iterations = outcome.iterations,
            final_diff = outcome.final_diff,
            "propagation finished"
        );
        Ok(outcome)
    }
}

fn ranked_snapshot(graph: &ModelGraph, indices: &[NodeId], values: &[f64]) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = indices
        .iter()
        .map(|&idx| RankedEntry {
            id: graph.graph[idx].id.clone(),
            influence: values[idx.index()],
        })
        .collect();
    sort_descending(&mut entries);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{DerivationEdge, DerivationKind};
    use modelrank_core::ModelNode;

    /// Config where self-influence equals the like count exactly.
    fn likes_only() -> InfluenceConfig {
        InfluenceConfig {
            w1: 0.0,
            w2: 1.0,
            w3: 0.0,
            w4: 0.0,
            ..InfluenceConfig::default()
        }
    }

    fn node_with_likes(id: &str, likes: u64) -> ModelNode {
        ModelNode::new(id, "tester").with_likes(likes)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = InfluenceConfig {
            alpha1: 0.9,
            ..InfluenceConfig::default()
        };
        assert!(PropagationEngine::new(config).is_err());
    }

    #[test]
    fn test_empty_graph_is_missing_input() {
        let engine = PropagationEngine::new(InfluenceConfig::default()).unwrap();
        let mut graph = ModelGraph::new();
        let result = engine.run(&mut graph, &ArtifactTable::new());
        assert!(matches!(result, Err(GraphError::MissingInput(_))));
    }

    #[test]
    fn test_isolated_node_fixed_point() {
        // With no neighbors both neighbor terms are 0, so the update
        // maps any value to alpha1 * self. The second step repeats it
        // exactly and the diff drops to zero.
        let engine = PropagationEngine::new(likes_only()).unwrap();
        let mut graph = ModelGraph::new();
        let idx = graph.add_node(node_with_likes("lonely", 10));

        let outcome = engine.run(&mut graph, &ArtifactTable::new()).unwrap();

        assert!(outcome.converged);
        assert_eq!(outcome.iterations, 2);
        assert!((graph.influence(idx) - 0.6 * 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_isolated_node_keeps_self_influence_under_pure_self_weight() {
        let config = InfluenceConfig {
            alpha1: 1.0,
            alpha2: 0.0,
            alpha3: 0.0,
            ..likes_only()
        };
        let engine = PropagationEngine::new(config).unwrap();
        let mut graph = ModelGraph::new();
        let idx = graph.add_node(node_with_likes("lonely", 10));

        let outcome = engine.run(&mut graph, &ArtifactTable::new()).unwrap();

        // Zero additional steps needed: the first step changes nothing.
        assert!(outcome.converged);
        assert_eq!(outcome.iterations, 1);
        assert_eq!(graph.influence(idx), 10.0);
    }

    #[test]
    fn test_two_node_single_step_values() {
        // A -> B, self(A)=10, self(B)=2, default alphas. After one
        // step: A = 0.6*10 + 0.3*2 = 6.6, B = 0.6*2 + 0.1*10 = 2.2.
        let config = InfluenceConfig {
            max_iter: 1,
            ..likes_only()
        };
        let engine = PropagationEngine::new(config).unwrap();

        let mut graph = ModelGraph::new();
        let a = graph.add_node(node_with_likes("a", 10));
        let b = graph.add_node(node_with_likes("b", 2));
        graph.add_edge(a, b, DerivationEdge::new(DerivationKind::Finetune));

        let outcome = engine.run(&mut graph, &ArtifactTable::new()).unwrap();

        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, 1);
        assert!((graph.influence(a) - 6.6).abs() < 1e-12);
        assert!((graph.influence(b) - 2.2).abs() < 1e-12);
    }

    #[test]
    fn test_determinism_across_insertion_orders() {
        let build = |order: &[(&str, u64)]| {
            let mut graph = ModelGraph::new();
            for &(id, likes) in order {
                graph.add_node(node_with_likes(id, likes).with_downloads(likes * 7));
            }
            let edge = |g: &mut ModelGraph, from: &str, to: &str| {
                let f = g.get_index(from).unwrap();
                let t = g.get_index(to).unwrap();
                g.add_edge(f, t, DerivationEdge::new(DerivationKind::Merge));
            };
            edge(&mut graph, "a", "b");
            edge(&mut graph, "b", "c");
            edge(&mut graph, "c", "a");
            graph
        };

        let engine = PropagationEngine::new(InfluenceConfig::default()).unwrap();
        let table = ArtifactTable::new();

        let mut first = build(&[("a", 12), ("b", 3), ("c", 40)]);
        let mut second = build(&[("c", 40), ("a", 12), ("b", 3)]);

        let outcome_first = engine.run(&mut first, &table).unwrap();
        let outcome_second = engine.run(&mut second, &table).unwrap();

        assert_eq!(outcome_first.iterations, outcome_second.iterations);
        assert_eq!(outcome_first.converged, outcome_second.converged);
        for id in ["a", "b", "c"] {
            let x = first.get_by_id(id).unwrap().influence;
            let y = second.get_by_id(id).unwrap().influence;
            assert!((x - y).abs() < 1e-9, "{id}: {x} vs {y}");
        }
    }

    #[test]
    fn test_influence_stays_nonnegative() {
        // Diamond with a cycle back to the root.
        let mut graph = ModelGraph::new();
        let root = graph.add_node(node_with_likes("root", 100).with_downloads(50_000));
        let left = graph.add_node(node_with_likes("left", 5));
        let right = graph.add_node(node_with_likes("right", 0));
        let leaf = graph.add_node(node_with_likes("leaf", 1));

        graph.add_edge(root, left, DerivationEdge::new(DerivationKind::Finetune));
        graph.add_edge(root, right, DerivationEdge::new(DerivationKind::Quantized));
        graph.add_edge(left, leaf, DerivationEdge::new(DerivationKind::Adapter));
        graph.add_edge(right, leaf, DerivationEdge::new(DerivationKind::Merge));
        graph.add_edge(leaf, root, DerivationEdge::new(DerivationKind::Merge));

        let engine = PropagationEngine::new(InfluenceConfig::default()).unwrap();
        engine.run(&mut graph, &ArtifactTable::new()).unwrap();

        for node in graph.nodes() {
            assert!(node.influence.is_finite());
            assert!(node.influence >= 0.0, "{}: {}", node.id, node.influence);
        }
    }

    #[test]
    fn test_budget_caps_divergent_run() {
        // Edge weight 5.0 makes the neighbor terms amplifying, so the
        // diff grows every step and the tolerance is never reached.
        let config = InfluenceConfig {
            max_iter: 7,
            ..likes_only()
        };
        let engine = PropagationEngine::new(config).unwrap();

        let mut graph = ModelGraph::new();
        let a = graph.add_node(node_with_likes("a", 10));
        let b = graph.add_node(node_with_likes("b", 10));
        graph.add_edge(a, b, DerivationEdge::with_weight(DerivationKind::Merge, 5.0));
        graph.add_edge(b, a, DerivationEdge::with_weight(DerivationKind::Merge, 5.0));

        let outcome = engine.run(&mut graph, &ArtifactTable::new()).unwrap();

        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, 7);
        assert!(outcome.final_diff.is_finite());
        assert!(graph.influence(a).is_finite());
    }

    #[test]
    fn test_observer_sees_every_iteration_ranked() {
        let config = InfluenceConfig {
            max_iter: 3,
            ..likes_only()
        };
        let engine = PropagationEngine::new(config).unwrap();

        let mut graph = ModelGraph::new();
        let a = graph.add_node(node_with_likes("a", 10));
        let b = graph.add_node(node_with_likes("b", 2));
        graph.add_edge(a, b, DerivationEdge::new(DerivationKind::Finetune));

        let mut snapshots: Vec<(usize, Vec<RankedEntry>)> = Vec::new();
        let mut capture = |iteration: usize, snapshot: &[RankedEntry]| {
            snapshots.push((iteration, snapshot.to_vec()));
        };

        let outcome = engine
            .run_observed(&mut graph, &ArtifactTable::new(), Some(&mut capture))
            .unwrap();

        assert_eq!(snapshots.len(), outcome.iterations);
        assert_eq!(snapshots[0].0, 1);

        // First iteration snapshot carries the literal one-step values.
        let first = &snapshots[0].1;
        assert_eq!(first[0].id, "a");
        assert!((first[0].influence - 6.6).abs() < 1e-12);
        assert!((first[1].influence - 2.2).abs() < 1e-12);

        for (_, snapshot) in &snapshots {
            for pair in snapshot.windows(2) {
                assert!(pair[0].influence >= pair[1].influence);
            }
        }
    }
}
