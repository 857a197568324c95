//! Error types for validation.

use thiserror::Error;

use geolink_store::StoreError;

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Two deduplicated reference rows share a subdivision code.
    #[error("subdivision code '{code}' resolves to more than one reference row")]
    AmbiguousReferenceCode { code: String },

    /// A stored row does not decode into a match record after reconciliation.
    #[error("row {row} of partition '{country}' is malformed: {source}")]
    MalformedRow {
        country: String,
        row: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ValidateError>;
