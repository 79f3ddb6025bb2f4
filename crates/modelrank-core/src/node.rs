//! The model artifact record.
//!
//! A node carries the raw popularity signals scraped for one model plus
//! the mutable influence score the engine writes back. Every numeric
//! field has a defined default so half-filled upstream records never
//! abort a run.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Classification of the account that published a model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgKind {
    /// A personal account.
    Individual,

    /// An organization, tagged with its nature ("company",
    /// "non-profit", "university", ...).
    Organization(String),

    /// Account metadata was missing or could not be classified.
    #[default]
    Unknown,
}

impl std::fmt::Display for OrgKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Individual => write!(f, "individual"),
            Self::Organization(nature) => write!(f, "{}", nature),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// One model artifact in the derivation graph.
///
/// The engine treats everything here as read-only except `influence`,
/// which it overwrites when a propagation run finalizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelNode {
    /// Globally unique model identifier, e.g. "acme/base-7b".
    pub id: String,

    /// Download count. Missing upstream data deserializes to 0.
    #[serde(default)]
    pub downloads: u64,

    /// Like count. Missing upstream data deserializes to 0.
    #[serde(default)]
    pub likes: u64,

    /// Publishing account identifier.
    pub author: String,

    /// Classification of the publishing account.
    #[serde(default)]
    pub org: OrgKind,

    /// Publication timestamp. `None` means the source had no usable
    /// date and the node counts as age zero.
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,

    /// Language tags attached to the model card.
    #[serde(default)]
    pub languages: BTreeSet<String>,

    /// Identifiers of auxiliary artifacts (demo apps, spaces) built on
    /// this model. Looked up in the [`ArtifactTable`] during scoring.
    ///
    /// [`ArtifactTable`]: crate::ArtifactTable
    #[serde(default)]
    pub artifacts: Vec<String>,

    /// Propagated influence score. Written by the engine; 0.0 until a
    /// run has finalized.
    #[serde(default)]
    pub influence: f64,

    /// Attributes the engine does not interpret (task type, author
    /// display name, avatar URL). Carried through for downstream
    /// consumers.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl ModelNode {
    /// Creates a node with all signals at their defaults.
    pub fn new(id: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            downloads: 0,
            likes: 0,
            author: author.into(),
            org: OrgKind::Unknown,
            created_at: None,
            languages: BTreeSet::new(),
            artifacts: Vec::new(),
            influence: 0.0,
            extra: BTreeMap::new(),
        }
    }

    /// Sets the download count.
    pub fn with_downloads(mut self, downloads: u64) -> Self {
        self.downloads = downloads;
        self
    }

    /// Sets the like count.
    pub fn with_likes(mut self, likes: u64) -> Self {
        self.likes = likes;
        self
    }

    /// Sets the account classification.
    pub fn with_org(mut self, org: OrgKind) -> Self {
        self.org = org;
        self
    }

    /// Sets the publication timestamp.
    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the associated auxiliary-artifact identifiers.
    pub fn with_artifacts(mut self, artifacts: Vec<String>) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Sets the language tags.
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Whole days between publication and `as_of`, floored at zero.
    ///
    /// A missing timestamp counts as age zero, the sentinel minimum.
    pub fn age_days(&self, as_of: NaiveDateTime) -> i64 {
        match self.created_at {
            Some(created) => (as_of - created).num_days().max(0),
            None => 0,
        }
    }
}
