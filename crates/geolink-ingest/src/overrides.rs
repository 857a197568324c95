//! Curated override table loading.
//!
//! The table is versioned data kept next to the inputs. It is validated as it
//! loads: labels must belong to the closed label set and join keys must be
//! unique. Referential integrity of `trueSubdivisionCode` needs the
//! deduplicated standard and is checked by the resolver.

use std::path::Path;

use geolink_model::{OverrideEntry, OverrideLabel, OverrideTable};

use crate::csv_table::read_csv_table;
use crate::error::{IngestError, Result};

pub const OVERRIDE_COLUMNS: [&str; 5] = [
    "countryName",
    "districtNameLower",
    "label",
    "notes",
    "trueSubdivisionCode",
];

const REQUIRED_OVERRIDE_COLUMNS: [&str; 3] = ["countryName", "districtNameLower", "label"];

/// Reads override rows in file order without checking key uniqueness.
pub fn load_override_entries(path: &Path) -> Result<Vec<OverrideEntry>> {
    let table = read_csv_table(path, encoding_rs::UTF_8)?;
    let columns = table.columns(&REQUIRED_OVERRIDE_COLUMNS, &OVERRIDE_COLUMNS[3..])?;

    let mut entries = Vec::with_capacity(table.rows.len());
    for (idx, row) in table.rows.iter().enumerate() {
        let raw_label = columns.get(row, "label");
        let label: OverrideLabel = raw_label.parse().map_err(|_| IngestError::InvalidValue {
            field: "label".to_string(),
            value: raw_label.to_string(),
            line: table.line_of(idx),
            path: path.to_path_buf(),
        })?;
        let code = columns.get(row, "trueSubdivisionCode").trim();
        entries.push(OverrideEntry {
            country_name: columns.get(row, "countryName").trim().to_string(),
            district_name_lower: columns.get(row, "districtNameLower").trim().to_lowercase(),
            label,
            notes: columns.get(row, "notes").to_string(),
            true_subdivision_code: (!code.is_empty()).then(|| code.to_string()),
        });
    }
    Ok(entries)
}

/// Loads the override table and enforces one entry per join key.
pub fn load_override_table(path: &Path) -> Result<OverrideTable> {
    let entries = load_override_entries(path)?;
    let count = entries.len();
    let table = OverrideTable::new(entries).map_err(|source| IngestError::OverrideTable {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), entries = count, "loaded override table");
    Ok(table)
}
