//! Modelrank Core - Domain types for the model influence engine
//!
//! This crate defines the vocabulary shared by the rest of the
//! workspace: the model artifact record, the auxiliary-artifact lookup
//! table, and the immutable configuration handed to the propagation
//! engine.
//!
//! # Example
//!
//! ```
//! use modelrank_core::{InfluenceConfig, ModelNode, OrgKind};
//!
//! let node = ModelNode::new("acme/base-7b", "acme")
//!     .with_downloads(120_000)
//!     .with_likes(340)
//!     .with_org(OrgKind::Organization("company".into()));
//!
//! let config = InfluenceConfig::default();
//! assert!(config.validate().is_ok());
//! # let _ = node;
//! ```

mod artifact;
mod config;
mod error;
mod node;

pub use artifact::{ArtifactMeta, ArtifactTable};
pub use config::InfluenceConfig;
pub use error::ConfigError;
pub use node::{ModelNode, OrgKind};
