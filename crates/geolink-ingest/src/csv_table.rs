use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use encoding_rs::Encoding;

use crate::error::{IngestError, Result};

/// A decoded CSV file: normalized headers plus string cells.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Header positions for the columns a loader asked for.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    indices: BTreeMap<String, usize>,
}

impl ColumnMap {
    /// Cell of `column` in `row`, empty when the column or cell is absent.
    pub fn get<'r>(&self, row: &'r [String], column: &str) -> &'r str {
        self.indices
            .get(column)
            .and_then(|idx| row.get(*idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn contains(&self, column: &str) -> bool {
        self.indices.contains_key(column)
    }
}

impl CsvTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Resolves required and optional columns, failing when any required
    /// column is missing.
    pub fn columns(&self, required: &[&str], optional: &[&str]) -> Result<ColumnMap> {
        let missing: Vec<String> = required
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| (*name).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(IngestError::MissingColumns {
                columns: missing,
                path: self.path.clone(),
            });
        }
        let mut indices = BTreeMap::new();
        for name in required.iter().chain(optional) {
            if let Some(idx) = self.column_index(name) {
                indices.insert((*name).to_string(), idx);
            }
        }
        Ok(ColumnMap { indices })
    }

    /// 1-based line number of a data row, counting the header line.
    pub fn line_of(&self, row_index: usize) -> usize {
        row_index + 2
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Resolves an encoding label such as `utf-8` or `windows-1252`.
pub fn encoding_for_label(label: &str, path: &Path) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| IngestError::UnknownEncoding {
        label: label.to_string(),
        path: path.to_path_buf(),
    })
}

/// Reads a CSV file, decoding it from `encoding` first.
///
/// A byte-order mark overrides the requested encoding. Blank lines are
/// skipped and short rows are padded to the header width.
pub fn read_csv_table(path: &Path, encoding: &'static Encoding) -> Result<CsvTable> {
    let bytes = fs::read(path).map_err(|e| IngestError::read(path, e))?;
    let (text, used, had_errors) = encoding.decode(&bytes);
    if had_errors {
        tracing::warn!(
            path = %path.display(),
            encoding = used.name(),
            "input contained byte sequences invalid for its encoding; replaced with U+FFFD"
        );
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        raw_rows.push(row);
    }

    let mut rows_iter = raw_rows.into_iter();
    let Some(header_row) = rows_iter.next() else {
        return Ok(CsvTable {
            path: path.to_path_buf(),
            headers: Vec::new(),
            rows: Vec::new(),
        });
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(String::as_str)
        .map(normalize_header)
        .collect();
    let rows = rows_iter
        .map(|mut row| {
            row.resize(headers.len(), String::new());
            row
        })
        .collect();

    tracing::debug!(
        path = %path.display(),
        encoding = used.name(),
        columns = headers.len(),
        "read csv table"
    );
    Ok(CsvTable {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_headers() {
        assert_eq!(normalize_header("\u{feff} ISO3166_2.code "), "ISO3166_2.code");
        assert_eq!(normalize_header("Local   variant"), "Local variant");
    }

    #[test]
    fn rejects_unknown_encoding_label() {
        let err = encoding_for_label("klingon-8", Path::new("x.csv")).unwrap_err();
        assert!(matches!(err, IngestError::UnknownEncoding { .. }));
    }

    #[test]
    fn resolves_legacy_encoding_label() {
        let encoding = encoding_for_label("latin1", Path::new("x.csv")).unwrap();
        assert_eq!(encoding, encoding_rs::WINDOWS_1252);
    }
}
