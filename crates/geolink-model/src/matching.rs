//! Scored correspondences produced by the matcher.

use serde::{Deserialize, Serialize};

use crate::reference::SubdivisionTarget;
use crate::source::SourceRecord;

/// Probability below which a match always needs review.
pub const REVIEW_PROBABILITY_THRESHOLD: f64 = 0.2;

/// One (source row, possibly absent target) correspondence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(flatten)]
    pub source: SourceRecord,
    /// Position of the source row inside its country partition.
    pub source_row: usize,
    pub target: Option<SubdivisionTarget>,
    /// Present exactly when `target` is.
    pub match_probability: Option<f64>,
    pub multiplicity_flag: bool,
    pub review_flag: bool,
}

impl MatchRecord {
    /// A correspondence with a returned target. Flags are set by the flagger.
    pub fn matched(
        source: SourceRecord,
        source_row: usize,
        target: SubdivisionTarget,
        probability: f64,
    ) -> Self {
        Self {
            source,
            source_row,
            target: Some(target),
            match_probability: Some(probability),
            multiplicity_flag: false,
            review_flag: false,
        }
    }

    /// A source row the oracle returned no candidate for.
    pub fn unmatched(source: SourceRecord, source_row: usize) -> Self {
        Self {
            source,
            source_row,
            target: None,
            match_probability: None,
            multiplicity_flag: false,
            review_flag: false,
        }
    }

    pub fn matched_target_name(&self) -> Option<&str> {
        self.target.as_ref().map(|target| target.name.as_str())
    }

    pub fn subdivision_code(&self) -> Option<&str> {
        self.target.as_ref().map(|target| target.code.as_str())
    }

    pub fn country(&self) -> &str {
        &self.source.country_name
    }
}
