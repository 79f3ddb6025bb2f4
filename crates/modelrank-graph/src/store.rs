//! On-disk persistence for scored graphs.
//!
//! The scored graph is what downstream ranking and visualization
//! consumers read; this store lets a scoring run hand it to them
//! without keeping the process alive.

use crate::error::GraphError;
use crate::graph::ModelGraph;
use sled::Db;
use std::path::Path;

const GRAPH_KEY: &str = "model_graph";

/// Persists a [`ModelGraph`] in a sled database.
pub struct GraphStore {
    db: Db,
}

impl GraphStore {
    /// Opens or creates a graph store at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GraphError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Saves the entire graph to the store.
    ///
    /// The graph is serialized with bincode under a fixed key.
    pub fn save_graph(&self, graph: &ModelGraph) -> Result<(), GraphError> {
        let bytes = bincode::serialize(graph)?;
        self.db.insert(GRAPH_KEY, bytes)?;
        self.db.flush()?;
        Ok(())
    }

    /// Loads the graph from the store.
    pub fn load_graph(&self) -> Result<Option<ModelGraph>, GraphError> {
        if let Some(bytes) = self.db.get(GRAPH_KEY)? {
            let graph: ModelGraph = bincode::deserialize(&bytes)?;
            Ok(Some(graph))
        } else {
            Ok(None)
        }
    }

    /// Clears the stored graph.
    pub fn clear(&self) -> Result<(), GraphError> {
        self.db.remove(GRAPH_KEY)?;
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{DerivationEdge, DerivationKind};
    use modelrank_core::ModelNode;
    use tempfile::tempdir;

    #[test]
    fn test_save_load_scored_graph() {
        let dir = tempdir().unwrap();
        let store = GraphStore::open(dir.path()).unwrap();

        let mut graph = ModelGraph::new();
        let base = graph.add_node(ModelNode::new("acme/base", "acme").with_likes(9));
        let derived = graph.add_node(ModelNode::new("acme/tuned", "acme"));
        graph.add_edge(base, derived, DerivationEdge::new(DerivationKind::Finetune));
        graph.set_influence(base, 4.5);

        store.save_graph(&graph).unwrap();

        let loaded = store.load_graph().unwrap().unwrap();
        assert_eq!(loaded.node_count(), 2);
        assert_eq!(loaded.edge_count(), 1);
        assert_eq!(loaded.get_by_id("acme/base").unwrap().influence, 4.5);
    }

    #[test]
    fn test_empty_store_loads_none() {
        let dir = tempdir().unwrap();
        let store = GraphStore::open(dir.path()).unwrap();
        assert!(store.load_graph().unwrap().is_none());

        store.clear().unwrap();
        assert!(store.load_graph().unwrap().is_none());
    }
}
