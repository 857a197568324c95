//! Applies curated overrides to flagged match rows.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use geolink_model::{
    MatchRecord, OverrideKey, OverrideTable, ReferenceRecord, SubdivisionTarget, ValidatedRecord,
};

use crate::error::{Result, ValidateError};

/// Deduplicated reference rows keyed by subdivision code.
#[derive(Debug, Clone, Default)]
pub struct ReferenceLookup {
    by_code: BTreeMap<String, ReferenceRecord>,
}

impl ReferenceLookup {
    /// Indexes `references`, which must hold one row per code.
    pub fn new(references: &[ReferenceRecord]) -> Result<Self> {
        let mut by_code = BTreeMap::new();
        for reference in references {
            let code = reference.code.trim().to_string();
            if by_code.contains_key(&code) {
                return Err(ValidateError::AmbiguousReferenceCode { code });
            }
            by_code.insert(code, reference.clone());
        }
        Ok(Self { by_code })
    }

    pub fn get(&self, code: &str) -> Option<&ReferenceRecord> {
        self.by_code.get(code.trim())
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// An override whose corrected code is missing from the reference table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct IntegrityWarning {
    pub country: String,
    pub district: String,
    pub code: String,
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "override for '{}' in {} names unknown subdivision code '{}'",
            self.district, self.country, self.code
        )
    }
}

/// Output of [`resolve_overrides`].
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub records: Vec<ValidatedRecord>,
    /// One entry per override whose code is unknown, joined or not.
    pub warnings: Vec<IntegrityWarning>,
}

/// Joins overrides onto match rows and applies corrected codes.
///
/// Every override code is checked against `lookup` before the join, so an
/// unknown code yields one [`IntegrityWarning`] even when no row carries its
/// key. A row whose override carries a known code has its whole target
/// replaced by that reference row, whatever the matcher returned. An unknown
/// code leaves the target as it was. Review flags are kept as computed by the
/// flagger.
pub fn resolve_overrides(
    records: Vec<MatchRecord>,
    overrides: &OverrideTable,
    lookup: &ReferenceLookup,
) -> Resolution {
    let warnings = unknown_override_codes(overrides, lookup);
    let mut resolved = Vec::with_capacity(records.len());

    for record in records {
        let Some(entry) = overrides.lookup(&record.source) else {
            resolved.push(ValidatedRecord::unlabeled(record));
            continue;
        };

        let mut validated = ValidatedRecord {
            label: Some(entry.label),
            notes: Some(entry.notes.clone()).filter(|notes| !notes.trim().is_empty()),
            corrected: false,
            record,
        };

        let reference = entry
            .true_subdivision_code
            .as_deref()
            .and_then(|code| lookup.get(code));
        if let Some(reference) = reference {
            validated.record.target = Some(SubdivisionTarget::from(reference));
            validated.corrected = true;
        }
        resolved.push(validated);
    }

    Resolution {
        records: resolved,
        warnings,
    }
}

/// Override entries whose corrected code has no reference row, in key order.
fn unknown_override_codes(
    overrides: &OverrideTable,
    lookup: &ReferenceLookup,
) -> Vec<IntegrityWarning> {
    let mut unknown = BTreeMap::<OverrideKey, IntegrityWarning>::new();
    for entry in overrides.entries() {
        let Some(code) = entry.true_subdivision_code.as_deref() else {
            continue;
        };
        if lookup.get(code).is_none() {
            unknown.entry(entry.key()).or_insert_with(|| IntegrityWarning {
                country: entry.country_name.clone(),
                district: entry.district_name_lower.clone(),
                code: code.to_string(),
            });
        }
    }

    let warnings: Vec<IntegrityWarning> = unknown.into_values().collect();
    for warning in &warnings {
        tracing::warn!(
            country = %warning.country,
            district = %warning.district,
            code = %warning.code,
            "override code not found in reference table"
        );
    }
    warnings
}
