//! Error types for oracle calls and matching.

use thiserror::Error;

/// Failure reported by a similarity oracle.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    Transport(String),

    #[error("oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("oracle response could not be decoded: {0}")]
    Decode(String),

    #[error("oracle candidate index {index} is out of range for {candidates} candidates")]
    IndexOutOfRange { index: usize, candidates: usize },

    #[error("oracle probability {probability} for candidate {index} is outside [0, 1]")]
    InvalidProbability { index: usize, probability: f64 },

    #[error("environment variable {0} holding the oracle API key is not set")]
    MissingApiKey(String),
}

impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Failure of a whole country partition.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("oracle failed for {country} on '{query}': {source}")]
    Oracle {
        country: String,
        query: String,
        #[source]
        source: OracleError,
    },
}

impl MatchError {
    pub fn country(&self) -> &str {
        match self {
            Self::Oracle { country, .. } => country,
        }
    }
}
