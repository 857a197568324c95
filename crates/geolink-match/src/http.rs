//! Remote oracle reached over HTTP.
//!
//! Sends one JSON request per source name:
//!
//! ```json
//! {"source_name": "...", "candidates": ["..."], "record_type": "...", "instructions": "..."}
//! ```
//!
//! and expects `{"matches": [{"index": 0, "probability": 0.87}]}` back.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};

use crate::error::OracleError;
use crate::oracle::{OracleCandidate, OracleContext, SimilarityOracle};

const USER_AGENT_VALUE: &str = concat!("geolink/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`HttpOracle`].
#[derive(Debug, Clone)]
pub struct HttpOracleConfig {
    pub endpoint: String,
    /// Bearer token, if the service needs one.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl HttpOracleConfig {
    /// Reads the API key from the environment variable `api_key_env`.
    pub fn with_api_key_from_env(mut self, api_key_env: &str) -> Result<Self, OracleError> {
        let key = std::env::var(api_key_env)
            .map_err(|_| OracleError::MissingApiKey(api_key_env.to_string()))?;
        self.api_key = Some(key);
        Ok(self)
    }
}

#[derive(Debug, Serialize)]
struct MatchRequest<'a> {
    source_name: &'a str,
    candidates: &'a [String],
    record_type: &'a str,
    instructions: &'a str,
}

#[derive(Debug, Deserialize)]
struct MatchResponse {
    #[serde(default)]
    matches: Vec<OracleCandidate>,
}

/// Blocking HTTP client for a remote similarity service.
#[derive(Debug, Clone)]
pub struct HttpOracle {
    client: Client,
    config: HttpOracleConfig,
}

impl HttpOracle {
    pub fn new(config: HttpOracleConfig) -> Result<Self, OracleError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| OracleError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }
}

impl SimilarityOracle for HttpOracle {
    fn name(&self) -> &'static str {
        "http"
    }

    fn match_candidates(
        &self,
        source_name: &str,
        candidates: &[String],
        context: &OracleContext,
    ) -> Result<Vec<OracleCandidate>, OracleError> {
        let body = MatchRequest {
            source_name,
            candidates,
            record_type: &context.record_type,
            instructions: &context.instructions,
        };
        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        tracing::trace!(endpoint = %self.config.endpoint, source_name, "oracle request");
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let payload: MatchResponse = response.json()?;
        Ok(payload.matches)
    }
}
