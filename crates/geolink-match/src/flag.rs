//! Review flags over match rows.

use std::collections::BTreeMap;

use geolink_model::{MatchRecord, REVIEW_PROBABILITY_THRESHOLD};

/// True when a row needs a curator: several targets for one source row, no
/// target at all, or a probability below the fixed threshold.
pub fn needs_review(multiplicity: bool, has_target: bool, probability: Option<f64>) -> bool {
    multiplicity
        || !has_target
        || probability.is_none_or(|probability| probability < REVIEW_PROBABILITY_THRESHOLD)
}

/// Recomputes both flags for every row.
///
/// Rows are grouped by source-row identity and dataset release; a group of
/// more than one row is a multiplicity.
pub fn flag_matches(rows: &mut [MatchRecord]) {
    let mut group_sizes: BTreeMap<(usize, &str), usize> = BTreeMap::new();
    for row in rows.iter() {
        *group_sizes
            .entry((row.source_row, row.source.dataset_release.as_str()))
            .or_insert(0) += 1;
    }
    let multiplicity: Vec<bool> = rows
        .iter()
        .map(|row| {
            group_sizes
                .get(&(row.source_row, row.source.dataset_release.as_str()))
                .is_some_and(|size| *size > 1)
        })
        .collect();

    for (row, multiple) in rows.iter_mut().zip(multiplicity) {
        row.multiplicity_flag = multiple;
        row.review_flag = needs_review(multiple, row.target.is_some(), row.match_probability);
    }
}
