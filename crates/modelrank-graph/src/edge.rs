//! Edge types for the derivation graph.
//!
//! An edge base → derived records that the derived model was produced
//! from the base via one transformation kind. The kinds mirror what the
//! upstream model-tree crawler reports.

use serde::{Deserialize, Serialize};

/// How a derived model was produced from its base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivationKind {
    /// Weight merge of two or more models.
    Merge,

    /// Adapter (e.g. LoRA) trained on top of the base.
    Adapter,

    /// Full or partial fine-tune of the base.
    Finetune,

    /// Quantized repackaging of the base weights.
    Quantized,
}

impl std::fmt::Display for DerivationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Merge => "merge",
            Self::Adapter => "adapter",
            Self::Finetune => "finetune",
            Self::Quantized => "quantized",
        };
        write!(f, "{}", s)
    }
}

/// A derivation relation with its propagation weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivationEdge {
    /// The kind of derivation.
    pub kind: DerivationKind,

    /// Multiplier applied to the neighbor's influence during
    /// propagation. Defaults to 1.0 when the source data has none.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl DerivationEdge {
    /// Creates an edge with the default weight.
    pub fn new(kind: DerivationKind) -> Self {
        Self { kind, weight: 1.0 }
    }

    /// Creates an edge with an explicit weight.
    pub fn with_weight(kind: DerivationKind, weight: f64) -> Self {
        Self { kind, weight }
    }
}

/// A flattened edge for graph export/visualization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportEdge {
    pub source: String,
    pub target: String,
    pub kind: DerivationKind,
    pub weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weight() {
        assert_eq!(DerivationEdge::new(DerivationKind::Merge).weight, 1.0);
    }

    #[test]
    fn test_missing_weight_deserializes_to_one() {
        let edge: DerivationEdge = serde_json::from_str(r#"{"kind": "adapter"}"#).unwrap();
        assert_eq!(edge.kind, DerivationKind::Adapter);
        assert_eq!(edge.weight, 1.0);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(DerivationKind::Quantized.to_string(), "quantized");
        assert_eq!(DerivationKind::Finetune.to_string(), "finetune");
    }
}
