//! Modelrank Graph - Influence propagation over model derivation graphs
//!
//! This crate holds the directed graph of model artifacts and the
//! fixed-point solver that turns raw popularity signals into a
//! converged influence score per model.
//!
//! # Architecture
//!
//! The graph uses petgraph internally with a string-id index for
//! lookups. Scoring runs in two layers:
//! - self-influence: a pure per-node function of downloads, likes,
//!   auxiliary artifacts, and age
//! - propagation: a Jacobi-style iteration blending self-influence with
//!   normalized neighbor contributions until the total change falls
//!   below tolerance
//!
//! # Example
//!
//! ```
//! use modelrank_core::{ArtifactTable, InfluenceConfig, ModelNode};
//! use modelrank_graph::{DerivationEdge, DerivationKind, ModelGraph, PropagationEngine};
//!
//! let mut graph = ModelGraph::new();
//! let base = graph.add_node(ModelNode::new("acme/base", "acme").with_likes(25));
//! let tuned = graph.add_node(ModelNode::new("acme/base-chat", "acme").with_likes(3));
//! graph.add_edge(base, tuned, DerivationEdge::new(DerivationKind::Finetune));
//!
//! let engine = PropagationEngine::new(InfluenceConfig::default()).unwrap();
//! let outcome = engine.run(&mut graph, &ArtifactTable::new()).unwrap();
//! assert!(outcome.converged);
//! ```

mod convergence;
mod edge;
mod error;
mod graph;
mod propagate;
mod ranking;
mod self_influence;
mod store;

pub use convergence::ConvergenceMonitor;
pub use edge::{DerivationEdge, DerivationKind, ExportEdge};
pub use error::GraphError;
pub use graph::{GraphStats, ModelGraph, NodeId};
pub use propagate::{PropagationEngine, PropagationOutcome, SnapshotObserver};
pub use ranking::{rank, sort_descending, RankedEntry};
pub use self_influence::{artifact_influence, self_influence};
pub use store::GraphStore;
