use thiserror::Error;

/// Errors surfaced by network construction, inference and training.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("invalid input: expected rows of width {expected}, found {found}")]
    InvalidInput { expected: usize, found: usize },

    #[error("invalid layer sizes {0:?}: need at least two layers, each with at least one neuron")]
    InvalidLayerSizes(Vec<usize>),

    #[error("shape mismatch in {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("batch contains no rows")]
    EmptyBatch,

    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("learning rate must be finite and non-negative, got {0}")]
    InvalidLearningRate(f64),

    #[error("{0} is not implemented")]
    NotImplemented(String),

    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
