//! Core graph data structure.
//!
//! The ModelGraph wraps petgraph and adds a string-id index for
//! lookups. It's the container everything else works with: built once
//! by the ingestion side, scored in place by the propagation engine,
//! read by ranking and visualization consumers.

use crate::edge::{DerivationEdge, ExportEdge};
use modelrank_core::ModelNode;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef; // For edge_references
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a node in the graph.
pub type NodeId = NodeIndex;

/// The model derivation graph.
///
/// Nodes are model artifacts, edges are base → derived relations. The
/// structure is fixed for the duration of a propagation run; only the
/// per-node `influence` field is mutated by the engine. Looking up a
/// [`NodeId`] that was never handed out by this graph is a programmer
/// error and panics.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelGraph {
    /// The underlying petgraph graph.
    pub(crate) graph: DiGraph<ModelNode, DerivationEdge>,

    /// Maps string IDs to graph node indexes.
    id_index: HashMap<String, NodeId>,
}

impl Default for ModelGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            id_index: HashMap::new(),
        }
    }

    /// Adds a model node to the graph.
    ///
    /// Returns the node's index for adding edges later.
    pub fn add_node(&mut self, node: ModelNode) -> NodeId {
        let id = node.id.clone();
        let index = self.graph.add_node(node);
        self.id_index.insert(id, index);
        index
    }

    /// Adds a derivation edge from a base model to a derived model.
    pub fn add_edge(&mut self, base: NodeId, derived: NodeId, edge: DerivationEdge) {
        self.graph.add_edge(base, derived, edge);
    }

    /// Gets a node by its graph index.
    pub fn get(&self, index: NodeId) -> Option<&ModelNode> {
        self.graph.node_weight(index)
    }

    /// Gets a node by its string ID.
    pub fn get_by_id(&self, id: &str) -> Option<&ModelNode> {
        let index = self.id_index.get(id)?;
        self.graph.node_weight(*index)
    }

    /// Gets the node index for a string ID.
    pub fn get_index(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// Iterates over the derived models of a node.
    pub fn successors(&self, index: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.neighbors_directed(index, Direction::Outgoing)
    }

    /// Iterates over the base models of a node.
    pub fn predecessors(&self, index: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.neighbors_directed(index, Direction::Incoming)
    }

    /// Gets the edge from `base` to `derived`, if one exists.
    pub fn edge(&self, base: NodeId, derived: NodeId) -> Option<&DerivationEdge> {
        let edge_idx = self.graph.find_edge(base, derived)?;
        self.graph.edge_weight(edge_idx)
    }

    /// Reads a node's influence score.
    pub fn influence(&self, index: NodeId) -> f64 {
        self.graph[index].influence
    }

    /// Writes a node's influence score.
    pub fn set_influence(&mut self, index: NodeId, influence: f64) {
        self.graph[index].influence = influence;
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &ModelNode> {
        self.graph.node_weights()
    }

    /// Iterates over all node indexes.
    pub fn node_indexes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices()
    }

    /// Returns all edges with source and target IDs for export.
    pub fn export_edges(&self) -> Vec<ExportEdge> {
        self.graph
            .edge_references()
            .map(|edge_ref| {
                let source = self.graph[edge_ref.source()].id.clone();
                let target = self.graph[edge_ref.target()].id.clone();
                let weight = edge_ref.weight();
                ExportEdge {
                    source,
                    target,
                    kind: weight.kind,
                    weight: weight.weight,
                }
            })
            .collect()
    }

    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        let authors: std::collections::HashSet<&str> =
            self.nodes().map(|node| node.author.as_str()).collect();
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            authors: authors.len(),
        }
    }
}

/// Graph statistics for status output.
#[derive(Debug, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub authors: usize,
}
