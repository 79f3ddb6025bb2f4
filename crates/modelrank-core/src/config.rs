//! Engine configuration.
//!
//! All numeric constants of the algorithm live here as one immutable
//! value object, so experiments and tests can pin every knob instead of
//! fighting hard-wired constants.

use crate::error::ConfigError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Weight-group sums are checked against 1.0 within this slack.
const WEIGHT_SUM_EPSILON: f64 = 1e-9;

/// Tunable parameters for a propagation run.
///
/// The defaults reproduce the reference scoring pipeline. Construct
/// with struct-update syntax to override individual knobs:
///
/// ```
/// use modelrank_core::InfluenceConfig;
///
/// let config = InfluenceConfig {
///     tol: 1e-9,
///     max_iter: 500,
///     ..InfluenceConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluenceConfig {
    /// Weight of `ln(max(downloads, 1))` in self-influence.
    pub w1: f64,
    /// Weight of the like count in self-influence.
    pub w2: f64,
    /// Weight of the auxiliary-artifact term in self-influence.
    pub w3: f64,
    /// Weight of the time-decay factor in self-influence.
    pub w4: f64,

    /// Weight of a node's own self-influence in the update step.
    pub alpha1: f64,
    /// Weight of the normalized successor contribution.
    pub alpha2: f64,
    /// Weight of the normalized predecessor contribution.
    pub alpha3: f64,

    /// Time-decay rate for the node age term, per day.
    ///
    /// The reference value of 1.0/day drives `exp(-lambda * age)` to
    /// effectively zero for anything older than ~20 days, so the age
    /// term is negligible for nearly all real inputs. Suspected unit
    /// mismatch in the reference pipeline; confirm against reference
    /// output before changing it.
    pub lambda: f64,

    /// Time-decay rate for auxiliary-artifact ages, per day.
    pub lambda_aux: f64,

    /// Convergence threshold on the summed absolute change per step.
    pub tol: f64,

    /// Iteration budget. Exhausting it is a reported condition, not an
    /// error.
    pub max_iter: usize,

    /// Reference instant ages are measured against. Fixing this makes
    /// runs reproducible; callers that want wall-clock behavior pass
    /// the current time.
    pub as_of: NaiveDateTime,
}

impl Default for InfluenceConfig {
    fn default() -> Self {
        Self {
            w1: 0.2,
            w2: 0.4,
            w3: 0.2,
            w4: 0.2,
            alpha1: 0.6,
            alpha2: 0.3,
            alpha3: 0.1,
            lambda: 1.0,
            lambda_aux: 0.001,
            tol: 1e-6,
            max_iter: 100,
            as_of: NaiveDateTime::UNIX_EPOCH,
        }
    }
}

impl InfluenceConfig {
    /// Checks the configuration before a run.
    ///
    /// Both weight groups must be non-negative, finite, and sum to 1.0;
    /// the tolerance must be positive and the iteration budget nonzero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("w1", self.w1),
            ("w2", self.w2),
            ("w3", self.w3),
            ("w4", self.w4),
            ("alpha1", self.alpha1),
            ("alpha2", self.alpha2),
            ("alpha3", self.alpha3),
            ("lambda", self.lambda),
            ("lambda_aux", self.lambda_aux),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }

        let self_sum = self.w1 + self.w2 + self.w3 + self.w4;
        if (self_sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::WeightSum {
                group: "w1..w4",
                sum: self_sum,
            });
        }

        let alpha_sum = self.alpha1 + self.alpha2 + self.alpha3;
        if (alpha_sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::WeightSum {
                group: "alpha1..alpha3",
                sum: alpha_sum,
            });
        }

        if !self.tol.is_finite() || self.tol <= 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tol));
        }
        if self.max_iter == 0 {
            return Err(ConfigError::ZeroIterationBudget);
        }

        Ok(())
    }
}
