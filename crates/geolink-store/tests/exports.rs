use std::fs;

use geolink_model::{MatchRecord, OverrideLabel, SourceRecord, ValidatedRecord};
use geolink_store::{VALIDATED_CSV_COLUMNS, write_validated_csv, write_work_queue_csv};
use tempfile::tempdir;

fn record(district: &str, review_flag: bool, label: Option<OverrideLabel>) -> ValidatedRecord {
    let source = SourceRecord {
        dataset_release: "20".to_string(),
        record_id: "1".to_string(),
        region_code: "Europe".to_string(),
        country_name: "Belgium".to_string(),
        country_code: "56".to_string(),
        year: 1950,
        month: 6,
        subdivision_label: "-9".to_string(),
        district_name: district.to_string(),
        comparison_name: district.to_string(),
    };
    let mut row = MatchRecord::unmatched(source, 0);
    row.review_flag = review_flag;
    ValidatedRecord {
        record: row,
        label,
        notes: None,
        corrected: false,
    }
}

#[test]
fn work_queue_holds_only_unlabeled_flagged_rows() {
    let dir = tempdir().unwrap();
    let records = vec![
        record("Antwerpen", true, None),
        record("Brussel", true, Some(OverrideLabel::MultiTerritory)),
        record("Gent", false, None),
    ];

    let all = dir.path().join("validated.csv");
    let queue = dir.path().join("work_queue.csv");
    assert_eq!(write_validated_csv(&all, &records).unwrap(), 3);
    assert_eq!(write_work_queue_csv(&queue, &records).unwrap(), 1);

    let text = fs::read_to_string(&queue).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next().unwrap(), VALIDATED_CSV_COLUMNS.join(","));
    let row = lines.next().unwrap();
    assert!(row.contains("Antwerpen"));
    assert!(lines.next().is_none());

    let all_text = fs::read_to_string(&all).unwrap();
    assert!(all_text.contains("multi_territory"));
}
