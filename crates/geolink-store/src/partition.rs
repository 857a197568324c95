//! Per-country partition files.
//!
//! A partition holds one country's flagged match rows as JSON objects, the
//! key layout they were written with, and a SHA-256 digest of the rows that
//! is checked on every load.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use geolink_model::MatchRecord;

use crate::atomic::write_atomic;
use crate::error::{Result, StoreError};
use crate::hash::sha256_hex;

/// Partition-key column in the combined layout.
pub const COUNTRY_COLUMN: &str = "ctr_n";
/// Source-side partition key in the split layout.
pub const SOURCE_COUNTRY_COLUMN: &str = "ctr_n.x";
/// Target-side partition key in the split layout.
pub const TARGET_COUNTRY_COLUMN: &str = "ctr_n.y";

/// How the country partition key is laid out in stored rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyLayout {
    /// One `ctr_n` column shared by both sides.
    #[default]
    Combined,
    /// `ctr_n.x` for the archive side and `ctr_n.y` for the matched target.
    Split,
}

impl KeyLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyLayout::Combined => "combined",
            KeyLayout::Split => "split",
        }
    }

    /// Encodes a match row as a flat JSON object in this layout.
    pub fn encode(self, record: &MatchRecord) -> serde_json::Result<Map<String, Value>> {
        let mut row = match serde_json::to_value(record)? {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        if self == KeyLayout::Split
            && let Some(country) = row.remove(COUNTRY_COLUMN)
        {
            let target_country = record
                .target
                .as_ref()
                .map_or(Value::Null, |target| Value::String(target.country_name.clone()));
            row.insert(SOURCE_COUNTRY_COLUMN.to_string(), country);
            row.insert(TARGET_COUNTRY_COLUMN.to_string(), target_country);
        }
        Ok(row)
    }
}

/// On-disk form of one country's rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPartition {
    pub country: String,
    pub layout: KeyLayout,
    pub saved_at: String,
    pub digest: String,
    pub rows: Vec<Map<String, Value>>,
}

/// Summary of a stored partition, for status listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionInfo {
    pub country: String,
    pub layout: KeyLayout,
    pub saved_at: String,
    pub rows: usize,
    pub flagged: usize,
    pub path: PathBuf,
}

impl StoredPartition {
    pub fn flagged(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.get("review_flag").and_then(Value::as_bool) == Some(true))
            .count()
    }
}

/// Directory of partition files, one per country.
/// Hex characters of the name digest kept in partition file names.
const FILE_DIGEST_CHARS: usize = 8;

#[derive(Debug, Clone)]
pub struct PartitionStore {
    dir: PathBuf,
}

impl PartitionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File holding `country`'s partition.
    ///
    /// The stem is the name with separators replaced, suffixed with a short
    /// digest of the exact name so that names differing only in punctuation
    /// get distinct files.
    pub fn path_for(&self, country: &str) -> PathBuf {
        let readable: String = country
            .trim()
            .chars()
            .map(|ch| if ch.is_alphanumeric() { ch } else { '_' })
            .collect();
        let digest = sha256_hex(country.as_bytes());
        let short = &digest[..FILE_DIGEST_CHARS];
        self.dir.join(format!("{readable}-{short}.json"))
    }

    pub fn exists(&self, country: &str) -> bool {
        self.path_for(country).is_file()
    }

    /// Persists a country's rows, replacing any previous partition.
    pub fn save(&self, country: &str, layout: KeyLayout, rows: &[MatchRecord]) -> Result<PathBuf> {
        let path = self.path_for(country);
        let encoded = rows
            .iter()
            .map(|row| layout.encode(row))
            .collect::<serde_json::Result<Vec<_>>>()
            .map_err(|source| StoreError::Serialization {
                path: path.clone(),
                source,
            })?;
        let digest = digest_rows(&encoded, &path)?;
        let partition = StoredPartition {
            country: country.to_string(),
            layout,
            saved_at: chrono::Utc::now().to_rfc3339(),
            digest,
            rows: encoded,
        };
        let bytes =
            serde_json::to_vec_pretty(&partition).map_err(|source| StoreError::Serialization {
                path: path.clone(),
                source,
            })?;
        write_atomic(&path, &bytes)?;
        tracing::debug!(country, path = %path.display(), rows = rows.len(), "saved partition");
        Ok(path)
    }

    /// Loads and verifies a country's partition.
    pub fn load(&self, country: &str) -> Result<StoredPartition> {
        let path = self.path_for(country);
        let partition = read_partition(&path)?;
        if partition.country != country {
            return Err(StoreError::CountryMismatch {
                path,
                expected: country.to_string(),
                found: partition.country,
            });
        }
        Ok(partition)
    }

    /// Loads every partition in the directory, ordered by country.
    pub fn load_all(&self) -> Result<Vec<StoredPartition>> {
        let mut partitions = Vec::new();
        for path in self.partition_files()? {
            partitions.push(read_partition(&path)?);
        }
        partitions.sort_by(|a, b| a.country.cmp(&b.country));
        Ok(partitions)
    }

    /// Lists stored partitions with their row counts.
    pub fn list(&self) -> Result<Vec<PartitionInfo>> {
        let mut infos = Vec::new();
        for path in self.partition_files()? {
            let partition = read_partition(&path)?;
            infos.push(PartitionInfo {
                rows: partition.rows.len(),
                flagged: partition.flagged(),
                country: partition.country,
                layout: partition.layout,
                saved_at: partition.saved_at,
                path,
            });
        }
        infos.sort_by(|a, b| a.country.cmp(&b.country));
        Ok(infos)
    }

    fn partition_files(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let entries =
            fs::read_dir(&self.dir).map_err(|e| StoreError::io("read directory", &self.dir, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io("read directory", &self.dir, e))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn digest_rows(rows: &[Map<String, Value>], path: &Path) -> Result<String> {
    let bytes = serde_json::to_vec(rows).map_err(|source| StoreError::Serialization {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(sha256_hex(&bytes))
}

fn read_partition(path: &Path) -> Result<StoredPartition> {
    let bytes = fs::read(path).map_err(|e| StoreError::io("read", path, e))?;
    let partition: StoredPartition =
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Serialization {
            path: path.to_path_buf(),
            source,
        })?;
    let actual = digest_rows(&partition.rows, path)?;
    if actual != partition.digest {
        return Err(StoreError::DigestMismatch {
            path: path.to_path_buf(),
            expected: partition.digest,
            actual,
        });
    }
    Ok(partition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_replace_separators_and_carry_name_digest() {
        let store = PartitionStore::new("/work/partitions");
        assert_eq!(
            store.path_for("Côte d'Ivoire"),
            PathBuf::from("/work/partitions/Côte_d_Ivoire-95ffc51d.json")
        );
        assert_eq!(
            store.path_for("United Kingdom"),
            PathBuf::from("/work/partitions/United_Kingdom-8d23a6e3.json")
        );
    }

    #[test]
    fn names_differing_in_punctuation_get_distinct_files() {
        let store = PartitionStore::new("/work/partitions");
        assert_ne!(store.path_for("Guinea-Bissau"), store.path_for("Guinea Bissau"));
    }
}
