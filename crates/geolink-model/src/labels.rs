//! Curator labels attached to override entries.
//!
//! Each label names the reason a constituency needed a human decision. The
//! set is closed: the override table is rejected when it carries a label
//! outside this list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Reason recorded by a curator for an override entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideLabel {
    /// The archive's subdivision field is wrong for the constituency.
    CleaSubError,
    /// The constituency name is an abbreviation the matcher cannot expand.
    CleaNameAbbrev,
    /// Other data error in the archive row.
    CleaDataError,
    /// The constituency lies in a territory that no longer exists.
    HistoricalTerritory,
    /// The constituency spans several subdivisions.
    MultiTerritory,
    /// The automated match was right but scored below the review threshold.
    LowConfidence,
}

impl OverrideLabel {
    pub const ALL: [OverrideLabel; 6] = [
        OverrideLabel::CleaSubError,
        OverrideLabel::CleaNameAbbrev,
        OverrideLabel::CleaDataError,
        OverrideLabel::HistoricalTerritory,
        OverrideLabel::MultiTerritory,
        OverrideLabel::LowConfidence,
    ];

    /// Returns the label as written in the override table.
    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideLabel::CleaSubError => "clea_sub_error",
            OverrideLabel::CleaNameAbbrev => "clea_name_abbrev",
            OverrideLabel::CleaDataError => "clea_data_error",
            OverrideLabel::HistoricalTerritory => "historical_territory",
            OverrideLabel::MultiTerritory => "multi_territory",
            OverrideLabel::LowConfidence => "low_confidence",
        }
    }
}

impl fmt::Display for OverrideLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OverrideLabel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        OverrideLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownLabel(s.to_string()))
    }
}
