//! Clean tables and validated exports.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use geolink_model::{SubdivisionTarget, ValidatedRecord};

use crate::atomic::write_atomic;
use crate::error::{Result, StoreError};

/// Column order of `validated.csv` and `work_queue.csv`.
pub const VALIDATED_CSV_COLUMNS: &[&str] = &[
    "release",
    "id",
    "rg",
    "ctr_n",
    "ctr",
    "yr",
    "mn",
    "sub",
    "cst_n",
    "cst_name",
    "Subdivision.name",
    "ISO3166_2.code",
    "Subdivision.category",
    "Parent.subdivision",
    "Language.code",
    "match_probability",
    "multiplicity_flag",
    "review_flag",
    "label",
    "notes",
    "corrected",
];

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialization {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomic(path, &bytes)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|e| StoreError::io("read", path, e))?;
    serde_json::from_slice(&bytes).map_err(|source| StoreError::Serialization {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes every validated row as CSV.
pub fn write_validated_csv(path: &Path, records: &[ValidatedRecord]) -> Result<usize> {
    write_csv(path, records.iter())
}

/// Writes the flagged rows that still lack a label.
pub fn write_work_queue_csv(path: &Path, records: &[ValidatedRecord]) -> Result<usize> {
    write_csv(path, records.iter().filter(|record| record.is_unresolved()))
}

fn write_csv<'a>(
    path: &Path,
    records: impl Iterator<Item = &'a ValidatedRecord>,
) -> Result<usize> {
    let csv_error = |e: csv::Error| StoreError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(VALIDATED_CSV_COLUMNS).map_err(csv_error)?;
    let mut count = 0;
    for record in records {
        writer.write_record(csv_row(record)).map_err(csv_error)?;
        count += 1;
    }
    let bytes = writer.into_inner().map_err(|e| StoreError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    write_atomic(path, &bytes)?;
    Ok(count)
}

fn csv_row(validated: &ValidatedRecord) -> Vec<String> {
    let record = &validated.record;
    let source = &record.source;
    let target = record.target.as_ref();
    let target_field = |select: fn(&SubdivisionTarget) -> &String| -> String {
        target.map(select).cloned().unwrap_or_default()
    };

    vec![
        source.dataset_release.clone(),
        source.record_id.clone(),
        source.region_code.clone(),
        source.country_name.clone(),
        source.country_code.clone(),
        source.year.to_string(),
        source.month.to_string(),
        source.subdivision_label.clone(),
        source.district_name.clone(),
        source.comparison_name.clone(),
        target_field(|t| &t.name),
        target_field(|t| &t.code),
        target_field(|t| &t.category),
        target_field(|t| &t.parent_subdivision),
        target_field(|t| &t.language_code),
        record
            .match_probability
            .map(|p| format!("{p:.4}"))
            .unwrap_or_default(),
        record.multiplicity_flag.to_string(),
        record.review_flag.to_string(),
        validated
            .label
            .map(|label| label.as_str().to_string())
            .unwrap_or_default(),
        validated.notes.clone().unwrap_or_default(),
        validated.corrected.to_string(),
    ]
}
