//! Storage error types.

use std::path::PathBuf;
use thiserror::Error;

/// Storage operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O error.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("failed to move {temp_path} into place at {target_path}: {source}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed.
    #[error("failed to (de)serialize {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Stored rows do not match their recorded digest.
    #[error("partition {path} is corrupt (expected digest {expected}, got {actual})")]
    DigestMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// A partition file holds a different country than its name implies.
    #[error("partition {path} holds country '{found}', expected '{expected}'")]
    CountryMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// CSV export failed.
    #[error("failed to write CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },
}

impl StoreError {
    pub(crate) fn io(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
