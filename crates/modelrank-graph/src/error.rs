use thiserror::Error;

/// Errors surfaced by the graph layer.
///
/// Per-node data problems never show up here; those are absorbed by
/// defaulting. This enum covers absent inputs and the persistence
/// layer.
#[derive(Error, Debug)]
pub enum GraphError {
    /// The engine was handed nothing to work on.
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error("database error: {0}")]
    Sled(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),
}
