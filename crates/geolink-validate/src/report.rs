//! Review counts over validated rows.

use std::collections::BTreeMap;

use serde::Serialize;

use geolink_model::{OverrideLabel, ValidatedRecord};

/// Flagged-row count for one (country, label) pair. `label` is `None` for
/// rows still waiting on a curator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub country: String,
    pub label: Option<OverrideLabel>,
    pub flagged: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    pub total_rows: usize,
    pub flagged: usize,
    /// Flagged rows that carry a label.
    pub labeled: usize,
    /// Rows whose target came from an override code.
    pub corrected: usize,
    pub unresolved_codes: usize,
    pub by_country_label: Vec<LabelCount>,
}

impl ReviewSummary {
    pub fn from_records(records: &[ValidatedRecord], unresolved_codes: usize) -> Self {
        let mut counts: BTreeMap<(&str, Option<OverrideLabel>), usize> = BTreeMap::new();
        let mut summary = Self {
            total_rows: records.len(),
            unresolved_codes,
            ..Self::default()
        };

        for record in records {
            if record.corrected {
                summary.corrected += 1;
            }
            if !record.record.review_flag {
                continue;
            }
            summary.flagged += 1;
            if record.label.is_some() {
                summary.labeled += 1;
            }
            *counts
                .entry((record.record.country(), record.label))
                .or_default() += 1;
        }

        summary.by_country_label = counts
            .into_iter()
            .map(|((country, label), flagged)| LabelCount {
                country: country.to_string(),
                label,
                flagged,
            })
            .collect();
        summary
    }

    /// Flagged rows without a label, the size of the curator work queue.
    pub fn unlabeled(&self) -> usize {
        self.flagged - self.labeled
    }
}

/// Flagged rows still lacking a label, in input order.
pub fn work_queue(records: &[ValidatedRecord]) -> Vec<&ValidatedRecord> {
    records
        .iter()
        .filter(|record| record.is_unresolved())
        .collect()
}
