use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Shape mismatch in {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Degenerate vector: norm is numerically zero")]
    DegenerateVector,

    #[error("Invalid threshold {0}: must lie in [0, 1]")]
    InvalidThreshold(f32),

    #[error("Non-finite similarity score at index {index}")]
    NonFiniteScore { index: usize },

    #[error("Invalid class label {label}: model has {num_classes} classes")]
    InvalidLabel { label: usize, num_classes: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
