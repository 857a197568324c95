//! Canonical comparison key for archive rows.
//!
//! The archive sometimes stores the subdivision inside the district name and
//! sometimes splits it into its own column. The key rebuilds one geographic
//! label without repeating the region text.

use geolink_model::SourceRecord;

/// Builds the comparison name for one archive row.
///
/// First rule that applies wins:
/// 1. no subdivision recorded (sentinel or empty): the district name alone;
/// 2. district name already contains the subdivision (case-insensitive): the
///    district name alone;
/// 3. otherwise `"{subdivision} - {district}"`.
pub fn comparison_name(record: &SourceRecord) -> String {
    if !record.has_subdivision() {
        return record.district_name.clone();
    }
    let subdivision = record.subdivision_label.trim();
    if record
        .district_name
        .to_lowercase()
        .contains(&subdivision.to_lowercase())
    {
        return record.district_name.clone();
    }
    format!("{subdivision} - {}", record.district_name)
}

/// Sets `comparison_name` on every row.
pub fn normalize_sources(records: &mut [SourceRecord]) {
    for record in records.iter_mut() {
        record.comparison_name = comparison_name(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geolink_model::NO_SUBDIVISION_SENTINEL;
    use proptest::prelude::*;

    fn row(sub: &str, district: &str) -> SourceRecord {
        SourceRecord {
            dataset_release: "20".to_string(),
            record_id: "1".to_string(),
            region_code: "1".to_string(),
            country_name: "Canada".to_string(),
            country_code: "124".to_string(),
            year: 1997,
            month: 6,
            subdivision_label: sub.to_string(),
            district_name: district.to_string(),
            comparison_name: String::new(),
        }
    }

    #[test]
    fn sentinel_is_not_literal_text() {
        assert_eq!(comparison_name(&row("-9", "Yukon")), "Yukon");
        assert_eq!(comparison_name(&row("-9", "Riding -9")), "Riding -9");
    }

    #[test]
    fn contained_subdivision_is_not_repeated() {
        assert_eq!(
            comparison_name(&row("Saskatchewan", "Sherwood Park—Fort Saskatchewan")),
            "Sherwood Park—Fort Saskatchewan"
        );
        assert_eq!(
            comparison_name(&row("ALBERTA", "Edmonton, alberta")),
            "Edmonton, alberta"
        );
    }

    #[test]
    fn split_subdivision_is_joined() {
        assert_eq!(
            comparison_name(&row("Alberta", "Calgary West")),
            "Alberta - Calgary West"
        );
    }

    #[test]
    fn normalize_sources_sets_every_row() {
        let mut rows = vec![row("Alberta", "Calgary West"), row("-9", "Yukon")];
        normalize_sources(&mut rows);
        assert_eq!(rows[0].comparison_name, "Alberta - Calgary West");
        assert_eq!(rows[1].comparison_name, "Yukon");
    }

    proptest! {
        #[test]
        fn sentinel_rows_keep_district(district in "[A-Za-z -]{0,24}") {
            let record = row(NO_SUBDIVISION_SENTINEL, &district);
            prop_assert_eq!(comparison_name(&record), district);
        }

        #[test]
        fn containing_rows_keep_district(
            prefix in "[a-z ]{0,8}",
            sub in "[A-Za-z]{1,10}",
            suffix in "[a-z ]{0,8}",
        ) {
            let district = format!("{prefix}{}{suffix}", sub.to_uppercase());
            let record = row(&sub, &district);
            prop_assert_eq!(comparison_name(&record), district);
        }

        #[test]
        fn other_rows_are_joined(sub in "[A-Z][a-z]{2,10}", district in "[0-9]{1,6}") {
            let record = row(&sub, &district);
            prop_assert_eq!(comparison_name(&record), format!("{sub} - {district}"));
        }
    }
}
