use serde::{Deserialize, Serialize};

use crate::labels::OverrideLabel;
use crate::matching::MatchRecord;

/// Final output row: a match plus the curator's label and notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedRecord {
    #[serde(flatten)]
    pub record: MatchRecord,
    pub label: Option<OverrideLabel>,
    pub notes: Option<String>,
    /// True when the target fields came from an override code.
    #[serde(default)]
    pub corrected: bool,
}

impl ValidatedRecord {
    pub fn unlabeled(record: MatchRecord) -> Self {
        Self {
            record,
            label: None,
            notes: None,
            corrected: false,
        }
    }

    /// Flagged rows no curator has labeled yet.
    pub fn is_unresolved(&self) -> bool {
        self.record.review_flag && self.label.is_none()
    }
}
