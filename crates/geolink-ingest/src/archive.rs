//! Election-archive loading.

use std::collections::BTreeSet;
use std::path::Path;

use geolink_model::{MIN_ELECTION_YEAR, SourceRecord};

use crate::csv_table::{CsvTable, read_csv_table};
use crate::error::{IngestError, Result};

/// Columns the archive must provide.
pub const ARCHIVE_COLUMNS: [&str; 9] = [
    "release", "id", "rg", "ctr_n", "ctr", "yr", "mn", "sub", "cst_n",
];

/// Archive rows kept after filtering, with counts of what was dropped.
#[derive(Debug, Clone, Default)]
pub struct ArchiveLoad {
    pub records: Vec<SourceRecord>,
    pub before_min_year: usize,
    pub duplicates: usize,
}

/// Loads the archive, keeps elections from 1945 on and collapses exact
/// duplicate rows, preserving first-seen order.
pub fn load_archive(path: &Path) -> Result<ArchiveLoad> {
    let table = read_csv_table(path, encoding_rs::UTF_8)?;
    archive_from_table(&table)
}

pub(crate) fn archive_from_table(table: &CsvTable) -> Result<ArchiveLoad> {
    let columns = table.columns(&ARCHIVE_COLUMNS, &[])?;
    let mut load = ArchiveLoad::default();
    let mut seen = BTreeSet::new();

    for (idx, row) in table.rows.iter().enumerate() {
        let line = table.line_of(idx);
        let year = parse_integer(table, "yr", columns.get(row, "yr"), line)?;
        if year < MIN_ELECTION_YEAR {
            load.before_min_year += 1;
            continue;
        }
        let record = SourceRecord {
            dataset_release: columns.get(row, "release").to_string(),
            record_id: columns.get(row, "id").to_string(),
            region_code: columns.get(row, "rg").to_string(),
            country_name: columns.get(row, "ctr_n").to_string(),
            country_code: columns.get(row, "ctr").to_string(),
            year,
            month: parse_integer(table, "mn", columns.get(row, "mn"), line)?,
            subdivision_label: columns.get(row, "sub").to_string(),
            district_name: columns.get(row, "cst_n").to_string(),
            comparison_name: String::new(),
        };
        if !seen.insert(record.clone()) {
            load.duplicates += 1;
            continue;
        }
        load.records.push(record);
    }

    tracing::info!(
        path = %table.path.display(),
        kept = load.records.len(),
        before_min_year = load.before_min_year,
        duplicates = load.duplicates,
        "loaded archive"
    );
    Ok(load)
}

/// Parses integral cells, accepting a `.0` suffix from float exports.
fn parse_integer(table: &CsvTable, field: &str, raw: &str, line: usize) -> Result<i32> {
    let trimmed = raw.trim();
    let integral = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    integral.parse::<i32>().map_err(|_| IngestError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
        line,
        path: table.path.clone(),
    })
}
