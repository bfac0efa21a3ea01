use thiserror::Error;

/// Errors surfaced by the engine and its collaborators.
///
/// Only caller mistakes end up here: malformed tensors, bad configuration,
/// unreadable config files. Numerical trouble inside a step is clamped
/// away and never reported.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{what}: expected length {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{tensor}: expected shape {expected:?}, found {found:?}")]
    ShapeMismatch {
        tensor: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("unknown task type `{0}` (expected `classification` or `regression`)")]
    UnknownTaskType(String),

    #[error("dataset has no examples")]
    EmptyDataset,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
