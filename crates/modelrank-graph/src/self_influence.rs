//! Self-influence: the neighbor-independent part of a model's score.
//!
//! This is a pure function of one node's own signals. It is also the
//! single point where missing or nonsensical input turns into defaults,
//! so everything downstream can assume finite numbers.

use modelrank_core::{ArtifactTable, InfluenceConfig, ModelNode};

/// Computes a node's self-influence.
///
/// `w1*ln(max(downloads, 1)) + w2*likes + w3*aux + w4*exp(-lambda*age)`
/// where `aux` is the decayed like total of the node's auxiliary
/// artifacts. Never fails: absent signals contribute their defaults.
pub fn self_influence(node: &ModelNode, artifacts: &ArtifactTable, config: &InfluenceConfig) -> f64 {
    let downloads = node.downloads.max(1) as f64;
    let likes = node.likes as f64;
    let aux = artifact_influence(&node.artifacts, artifacts, config);
    let time_factor = (-config.lambda * node.age_days(config.as_of) as f64).exp();

    config.w1 * downloads.ln() + config.w2 * likes + config.w3 * aux + config.w4 * time_factor
}

/// Sums the decayed influence of a node's auxiliary artifacts.
///
/// Each artifact contributes `likes * exp(-lambda_aux * age_days)`.
/// Identifiers absent from the table contribute 0.
pub fn artifact_influence(ids: &[String], table: &ArtifactTable, config: &InfluenceConfig) -> f64 {
    ids.iter()
        .filter_map(|id| table.get(id))
        .map(|meta| meta.likes as f64 * (-config.lambda_aux * meta.age_days(config.as_of) as f64).exp())
        .sum()
}
