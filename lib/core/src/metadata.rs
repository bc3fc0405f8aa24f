//! Checkpoint metadata
//!
//! The checkpoint loader writes a small JSON file next to the weights. Only
//! `embedding_dim` matters here; it is used to reject vectors of the wrong
//! length before scoring.

use crate::{Error, Result, Vector};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Embedding length assumed when the metadata file omits it
pub const DEFAULT_EMBEDDING_DIM: usize = 128;

fn default_embedding_dim() -> usize {
    DEFAULT_EMBEDDING_DIM
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelMetadata {
    pub num_classes: usize,
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,
}

impl ModelMetadata {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let meta: Self = serde_json::from_str(json)?;
        if meta.embedding_dim == 0 {
            return Err(Error::InvalidConfig(
                "embedding_dim must be non-zero".to_string(),
            ));
        }
        Ok(meta)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn check_dim(&self, v: &Vector) -> Result<()> {
        if v.dim() != self.embedding_dim {
            return Err(Error::DimensionMismatch {
                expected: self.embedding_dim,
                actual: v.dim(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedding_dim_defaults() {
        let meta = ModelMetadata::from_json_str(r#"{"num_classes": 12}"#).unwrap();
        assert_eq!(meta.embedding_dim, 128);
        assert_eq!(meta.num_classes, 12);
    }

    #[test]
    fn test_from_file_and_check_dim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"num_classes": 3, "embedding_dim": 4}}"#).unwrap();

        let meta = ModelMetadata::from_json_file(file.path()).unwrap();
        assert!(meta.check_dim(&Vector::new(vec![0.0; 4])).is_ok());
        assert!(matches!(
            meta.check_dim(&Vector::new(vec![0.0; 5])),
            Err(Error::DimensionMismatch { expected: 4, actual: 5 })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ModelMetadata::from_json_file("/nonexistent/model_config.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_zero_dim_rejected() {
        let err = ModelMetadata::from_json_str(r#"{"num_classes": 3, "embedding_dim": 0}"#);
        assert!(matches!(err, Err(Error::InvalidConfig(_))));
    }
}
