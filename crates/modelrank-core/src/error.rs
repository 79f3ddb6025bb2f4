use thiserror::Error;

/// Rejections produced by [`InfluenceConfig::validate`].
///
/// These are fatal and surface before any iteration starts; malformed
/// per-node data, by contrast, is absorbed by defaulting and never
/// errors.
///
/// [`InfluenceConfig::validate`]: crate::InfluenceConfig::validate
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("weight {name} must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("{group} must sum to 1.0, got {sum}")]
    WeightSum { group: &'static str, sum: f64 },

    #[error("tolerance must be a positive finite number, got {0}")]
    InvalidTolerance(f64),

    #[error("iteration budget must be at least 1")]
    ZeroIterationBudget,
}
