//! Union of stored partitions.

use serde_json::{Map, Value};

use geolink_model::MatchRecord;
use geolink_store::StoredPartition;
use geolink_store::partition::{COUNTRY_COLUMN, SOURCE_COUNTRY_COLUMN, TARGET_COUNTRY_COLUMN};

use crate::error::{Result, ValidateError};

/// Folds split partition-key columns back into the single `ctr_n` column.
///
/// The first non-null of `ctr_n`, `ctr_n.x`, `ctr_n.y` wins. Rows already in
/// the combined layout come back unchanged.
pub fn reconcile_row(mut row: Map<String, Value>) -> Map<String, Value> {
    let source = row.remove(SOURCE_COUNTRY_COLUMN);
    let target = row.remove(TARGET_COUNTRY_COLUMN);
    let has_country = row.get(COUNTRY_COLUMN).is_some_and(|value| !value.is_null());
    if !has_country {
        let country = [source, target]
            .into_iter()
            .flatten()
            .find(|value| !value.is_null());
        if let Some(country) = country {
            row.insert(COUNTRY_COLUMN.to_string(), country);
        }
    }
    row
}

/// Decodes one partition's rows into match records.
pub fn decode_partition(partition: &StoredPartition) -> Result<Vec<MatchRecord>> {
    partition
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let row = Value::Object(reconcile_row(row.clone()));
            serde_json::from_value(row).map_err(|source| ValidateError::MalformedRow {
                country: partition.country.clone(),
                row: index,
                source,
            })
        })
        .collect()
}

/// Concatenates partitions in the order given.
pub fn union_partitions(partitions: &[StoredPartition]) -> Result<Vec<MatchRecord>> {
    let mut rows = Vec::new();
    for partition in partitions {
        rows.extend(decode_partition(partition)?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn split_columns_collapse_to_source_country() {
        let row = object(json!({"ctr_n.x": "Canada", "ctr_n.y": null, "cst_n": "Yukon"}));
        let reconciled = reconcile_row(row);
        assert_eq!(reconciled["ctr_n"], "Canada");
        assert!(!reconciled.contains_key("ctr_n.x"));
        assert!(!reconciled.contains_key("ctr_n.y"));
    }

    #[test]
    fn target_country_fills_missing_source() {
        let row = object(json!({"ctr_n.x": null, "ctr_n.y": "Canada"}));
        assert_eq!(reconcile_row(row)["ctr_n"], "Canada");
    }

    #[test]
    fn combined_rows_are_untouched() {
        let row = object(json!({"ctr_n": "Belgium", "cst_n": "Gent"}));
        assert_eq!(reconcile_row(row.clone()), row);
    }
}
