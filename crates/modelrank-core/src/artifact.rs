//! Auxiliary-artifact metadata.
//!
//! Models accumulate influence from demo applications built on top of
//! them. The scraper hands the engine a flat lookup table of those
//! artifacts; the engine only reads likes and age from it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Popularity signals for one auxiliary artifact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactMeta {
    /// Like count. Missing upstream data deserializes to 0.
    #[serde(default)]
    pub likes: u64,

    /// Creation timestamp. `None` counts as age zero.
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl ArtifactMeta {
    /// Creates artifact metadata.
    pub fn new(likes: u64, created_at: Option<NaiveDateTime>) -> Self {
        Self { likes, created_at }
    }

    /// Whole days between creation and `as_of`, floored at zero.
    pub fn age_days(&self, as_of: NaiveDateTime) -> i64 {
        match self.created_at {
            Some(created) => (as_of - created).num_days().max(0),
            None => 0,
        }
    }
}

/// Lookup table from artifact identifier to its metadata.
///
/// Read-only during a propagation run. Identifiers that are referenced
/// by a node but absent here simply contribute nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactTable {
    entries: HashMap<String, ArtifactMeta>,
}

impl ArtifactTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an artifact.
    pub fn insert(&mut self, id: impl Into<String>, meta: ArtifactMeta) {
        self.entries.insert(id.into(), meta);
    }

    /// Looks up an artifact by identifier.
    pub fn get(&self, id: &str) -> Option<&ArtifactMeta> {
        self.entries.get(id)
    }

    /// Returns the number of artifacts in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no artifacts.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<HashMap<String, ArtifactMeta>> for ArtifactTable {
    fn from(entries: HashMap<String, ArtifactMeta>) -> Self {
        Self { entries }
    }
}
