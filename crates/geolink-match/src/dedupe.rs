//! Collapse of language variants in the subdivision standard.

use std::collections::BTreeMap;

use geolink_model::ReferenceRecord;

/// Keeps one row per subdivision code.
///
/// Within each code the first English row wins; without one, the first row
/// encountered. Output follows the order in which codes first appear.
pub fn dedupe_reference(records: Vec<ReferenceRecord>) -> Vec<ReferenceRecord> {
    let input_rows = records.len();
    let mut order: Vec<String> = Vec::new();
    let mut chosen: BTreeMap<String, ReferenceRecord> = BTreeMap::new();

    for record in records {
        match chosen.get(&record.code) {
            None => {
                order.push(record.code.clone());
                chosen.insert(record.code.clone(), record);
            }
            Some(current) if !current.is_english() && record.is_english() => {
                chosen.insert(record.code.clone(), record);
            }
            Some(_) => {}
        }
    }

    let deduped: Vec<ReferenceRecord> = order
        .iter()
        .filter_map(|code| chosen.remove(code))
        .collect();
    tracing::debug!(
        input_rows,
        output_rows = deduped.len(),
        "deduplicated subdivision standard"
    );
    deduped
}

/// Orders reference rows by code, language and name so the dedup tie-break
/// no longer depends on incidental file order. The sort is stable.
pub fn sort_reference_for_dedup(records: &mut [ReferenceRecord]) {
    records.sort_by(|a, b| {
        a.code
            .cmp(&b.code)
            .then_with(|| a.language_code.cmp(&b.language_code))
            .then_with(|| a.name.cmp(&b.name))
    });
}
