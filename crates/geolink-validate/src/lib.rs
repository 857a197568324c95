//! Override resolution and aggregation of linked partitions.
//!
//! Stored country partitions are reconciled to one key layout, unioned, joined
//! against the curated override table and summarized for review.

pub mod aggregate;
pub mod error;
pub mod report;
pub mod resolve;

pub use aggregate::{decode_partition, reconcile_row, union_partitions};
pub use error::{Result, ValidateError};
pub use report::{LabelCount, ReviewSummary, work_queue};
pub use resolve::{IntegrityWarning, ReferenceLookup, Resolution, resolve_overrides};

use geolink_model::{OverrideTable, ReferenceRecord, ValidatedRecord};
use geolink_store::StoredPartition;

/// Result of one validation pass.
#[derive(Debug, Clone)]
pub struct Validation {
    pub records: Vec<ValidatedRecord>,
    pub warnings: Vec<IntegrityWarning>,
    pub summary: ReviewSummary,
}

/// Unions `partitions`, applies `overrides` and summarizes the outcome.
pub fn validate_partitions(
    partitions: &[StoredPartition],
    overrides: &OverrideTable,
    references: &[ReferenceRecord],
) -> Result<Validation> {
    let lookup = ReferenceLookup::new(references)?;
    let rows = union_partitions(partitions)?;
    tracing::debug!(
        partitions = partitions.len(),
        rows = rows.len(),
        overrides = overrides.len(),
        "unioned partitions"
    );

    let Resolution { records, warnings } = resolve_overrides(rows, overrides, &lookup);
    let summary = ReviewSummary::from_records(&records, warnings.len());
    tracing::info!(
        rows = summary.total_rows,
        flagged = summary.flagged,
        labeled = summary.labeled,
        corrected = summary.corrected,
        unresolved_codes = summary.unresolved_codes,
        "validation complete"
    );

    Ok(Validation {
        records,
        warnings,
        summary,
    })
}
