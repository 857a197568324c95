//! Subdivision-standard loading.

use std::path::Path;

use geolink_model::ReferenceRecord;

use crate::csv_table::{encoding_for_label, read_csv_table};
use crate::error::Result;

/// The standard ships in a single-byte legacy encoding.
pub const DEFAULT_REFERENCE_ENCODING: &str = "windows-1252";

pub const REFERENCE_COLUMNS: [&str; 11] = [
    "ctr_n",
    "Subdivision.category",
    "ISO3166_2.code",
    "star",
    "Subdivision.name",
    "Local.variant",
    "Language.code",
    "Romanization.system",
    "Parent.subdivision",
    "Country_code",
    "Constituent_code",
];

/// Loads every reference row in file order, language variants included.
pub fn load_reference(path: &Path, encoding_label: &str) -> Result<Vec<ReferenceRecord>> {
    let encoding = encoding_for_label(encoding_label, path)?;
    let table = read_csv_table(path, encoding)?;
    let columns = table.columns(&REFERENCE_COLUMNS, &[])?;

    let records: Vec<ReferenceRecord> = table
        .rows
        .iter()
        .map(|row| ReferenceRecord {
            country_name: columns.get(row, "ctr_n").to_string(),
            category: columns.get(row, "Subdivision.category").to_string(),
            code: columns.get(row, "ISO3166_2.code").to_string(),
            star: columns.get(row, "star").to_string(),
            name: columns.get(row, "Subdivision.name").to_string(),
            local_variant: columns.get(row, "Local.variant").to_string(),
            language_code: columns.get(row, "Language.code").to_string(),
            romanization_system: columns.get(row, "Romanization.system").to_string(),
            parent_subdivision: columns.get(row, "Parent.subdivision").to_string(),
            country_code: columns.get(row, "Country_code").to_string(),
            constituent_code: columns.get(row, "Constituent_code").to_string(),
        })
        .collect();

    tracing::info!(
        path = %path.display(),
        rows = records.len(),
        encoding = encoding.name(),
        "loaded subdivision standard"
    );
    Ok(records)
}
