//! Election-archive side of the linkage.

use serde::{Deserialize, Serialize};

/// Value the archive uses when a field is absent.
pub const NO_SUBDIVISION_SENTINEL: &str = "-9";

/// Earliest election year kept from the archive.
pub const MIN_ELECTION_YEAR: i32 = 1945;

/// One historical electoral district as recorded by the archive.
///
/// Field names serialize to the archive's column names so loaded tables and
/// persisted partitions share one layout.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceRecord {
    #[serde(rename = "release")]
    pub dataset_release: String,
    #[serde(rename = "id")]
    pub record_id: String,
    #[serde(rename = "rg")]
    pub region_code: String,
    #[serde(rename = "ctr_n")]
    pub country_name: String,
    #[serde(rename = "ctr")]
    pub country_code: String,
    #[serde(rename = "yr")]
    pub year: i32,
    #[serde(rename = "mn")]
    pub month: i32,
    /// Subdivision as recorded by the archive. May be wrong or the sentinel.
    #[serde(rename = "sub")]
    pub subdivision_label: String,
    #[serde(rename = "cst_n")]
    pub district_name: String,
    /// Canonical comparison key, empty until normalized.
    #[serde(rename = "cst_name", default)]
    pub comparison_name: String,
}

impl SourceRecord {
    /// Returns false when the subdivision field holds the absent-value sentinel.
    pub fn has_subdivision(&self) -> bool {
        let label = self.subdivision_label.trim();
        !label.is_empty() && label != NO_SUBDIVISION_SENTINEL
    }
}
