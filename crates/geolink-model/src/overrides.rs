//! Curated corrections keyed by country and district name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::labels::OverrideLabel;
use crate::source::SourceRecord;

/// Join key between match rows and the override table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverrideKey {
    pub country_name: String,
    pub district_name_lower: String,
}

impl OverrideKey {
    pub fn new(country_name: &str, district_name: &str) -> Self {
        Self {
            country_name: country_name.trim().to_string(),
            district_name_lower: district_name.trim().to_lowercase(),
        }
    }

    pub fn for_source(source: &SourceRecord) -> Self {
        Self::new(&source.country_name, &source.district_name)
    }
}

/// One row of the override table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEntry {
    #[serde(rename = "countryName")]
    pub country_name: String,
    #[serde(rename = "districtNameLower")]
    pub district_name_lower: String,
    pub label: OverrideLabel,
    #[serde(default)]
    pub notes: String,
    #[serde(rename = "trueSubdivisionCode", default)]
    pub true_subdivision_code: Option<String>,
}

impl OverrideEntry {
    pub fn key(&self) -> OverrideKey {
        OverrideKey::new(&self.country_name, &self.district_name_lower)
    }
}

/// Override entries indexed by join key.
///
/// Construction rejects duplicate keys, so joining the table onto match rows
/// can never fan a row out into several.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    entries: BTreeMap<OverrideKey, OverrideEntry>,
}

impl OverrideTable {
    pub fn new(entries: Vec<OverrideEntry>) -> Result<Self> {
        let mut indexed = BTreeMap::new();
        for entry in entries {
            let key = entry.key();
            if indexed.contains_key(&key) {
                return Err(ModelError::DuplicateOverrideKey {
                    country: key.country_name,
                    district: key.district_name_lower,
                });
            }
            indexed.insert(key, entry);
        }
        Ok(Self { entries: indexed })
    }

    pub fn get(&self, key: &OverrideKey) -> Option<&OverrideEntry> {
        self.entries.get(key)
    }

    pub fn lookup(&self, source: &SourceRecord) -> Option<&OverrideEntry> {
        self.get(&OverrideKey::for_source(source))
    }

    pub fn entries(&self) -> impl Iterator<Item = &OverrideEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
