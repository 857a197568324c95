//! Error types for table ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading input tables.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Input file not found.
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding label not understood.
    #[error("unknown text encoding '{label}' for {path}")]
    UnknownEncoding { label: String, path: PathBuf },

    /// Malformed CSV.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Required columns absent from the header row.
    #[error("required column(s) {} not found in {path}", .columns.join(", "))]
    MissingColumns { columns: Vec<String>, path: PathBuf },

    /// Cell value that cannot be interpreted.
    #[error("invalid {field} value '{value}' on line {line} of {path}")]
    InvalidValue {
        field: String,
        value: String,
        line: usize,
        path: PathBuf,
    },

    /// Override table violates its uniqueness constraint.
    #[error("override table {path} is invalid: {source}")]
    OverrideTable {
        path: PathBuf,
        #[source]
        source: geolink_model::ModelError,
    },
}

impl IngestError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::FileRead { path, source }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
