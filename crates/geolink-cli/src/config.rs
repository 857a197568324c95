//! `geolink.toml` configuration.
//!
//! ```toml
//! [paths]
//! archive = "data/archive.csv"
//! reference = "data/iso3166_2.csv"
//! overrides = "data/overrides.csv"
//! work_dir = "work"
//!
//! [reference]
//! encoding = "windows-1252"
//! sort_before_dedup = false
//!
//! [oracle]
//! kind = "lexical"
//! min_probability = 0.6
//! max_candidates = 3
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use geolink_ingest::DEFAULT_REFERENCE_ENCODING;
use geolink_match::lexical::{DEFAULT_MAX_CANDIDATES, DEFAULT_MIN_PROBABILITY};
use geolink_match::{HttpOracle, HttpOracleConfig, LexicalOracle, SimilarityOracle};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "geolink.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeolinkConfig {
    pub paths: PathsConfig,
    pub reference: ReferenceConfig,
    pub oracle: OracleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub archive: PathBuf,
    pub reference: PathBuf,
    pub overrides: PathBuf,
    pub work_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            archive: PathBuf::from("data/archive.csv"),
            reference: PathBuf::from("data/iso3166_2.csv"),
            overrides: PathBuf::from("data/overrides.csv"),
            work_dir: PathBuf::from("work"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceConfig {
    /// Encoding label of the reference CSV.
    pub encoding: String,
    /// Sort by code, language, then name before collapsing language variants.
    pub sort_before_dedup: bool,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_REFERENCE_ENCODING.to_string(),
            sort_before_dedup: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleKind {
    #[default]
    Lexical,
    Http,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OracleConfig {
    pub kind: OracleKind,
    /// Service URL, required for the `http` oracle.
    pub endpoint: Option<String>,
    /// Environment variable holding the bearer token.
    pub api_key_env: Option<String>,
    pub timeout_secs: u64,
    pub min_probability: f64,
    pub max_candidates: usize,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            kind: OracleKind::default(),
            endpoint: None,
            api_key_env: None,
            timeout_secs: 30,
            min_probability: DEFAULT_MIN_PROBABILITY,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

impl OracleConfig {
    /// Builds the configured oracle.
    pub fn build(&self) -> Result<Box<dyn SimilarityOracle>> {
        match self.kind {
            OracleKind::Lexical => Ok(Box::new(LexicalOracle::new(
                self.min_probability,
                self.max_candidates,
            ))),
            OracleKind::Http => {
                let Some(endpoint) = self.endpoint.clone() else {
                    bail!("oracle.kind = \"http\" requires oracle.endpoint");
                };
                let mut config = HttpOracleConfig {
                    endpoint,
                    api_key: None,
                    timeout: Duration::from_secs(self.timeout_secs),
                };
                if let Some(variable) = &self.api_key_env {
                    config = config.with_api_key_from_env(variable)?;
                }
                Ok(Box::new(HttpOracle::new(config)?))
            }
        }
    }
}

impl GeolinkConfig {
    /// Loads configuration.
    ///
    /// An explicit path must exist. Without one, `geolink.toml` in the current
    /// directory is used if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    tracing::debug!("no {DEFAULT_CONFIG_FILE} found; using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config = Self::from_toml(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.paths.resolve_against(base);
        }
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.oracle.min_probability) {
            bail!(
                "oracle.min_probability must be within [0, 1], got {}",
                self.oracle.min_probability
            );
        }
        if self.oracle.kind == OracleKind::Http && self.oracle.endpoint.is_none() {
            bail!("oracle.kind = \"http\" requires oracle.endpoint");
        }
        Ok(())
    }
}

impl PathsConfig {
    fn resolve_against(&mut self, base: &Path) {
        for path in [
            &mut self.archive,
            &mut self.reference,
            &mut self.overrides,
            &mut self.work_dir,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
