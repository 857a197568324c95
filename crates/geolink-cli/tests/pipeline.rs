//! End-to-end runs of clean, link and validate over small fixture tables.

use std::collections::BTreeMap;
use std::fs;

use geolink_cli::config::GeolinkConfig;
use geolink_cli::pipeline::{self, CountryStatus, LinkRequest};
use geolink_match::{OracleCandidate, OracleContext, OracleError, SimilarityOracle};
use geolink_model::{OverrideLabel, ReferenceRecord, ValidatedRecord};
use geolink_store::{KeyLayout, WorkDir, read_json};
use geolink_validate::decode_partition;
use indicatif::ProgressBar;
use tempfile::TempDir;

const ARCHIVE: &str = "\
release,id,rg,ctr_n,ctr,yr,mn,sub,cst_n
20,1,North America,Canada,124,1997,6,British Columbia,Sherwood Park
20,2,North America,Canada,124,1997,6,Alberta,Calgary West
20,3,North America,Canada,124,1997,6,-9,Yukon
20,3,North America,Canada,124,1997,6,-9,Yukon
20,4,North America,Canada,124,1940,6,-9,Yukon
20,5,Europe,Norway,578,1949,10,-9,Oslo
20,6,Europe,Atlantis,999,1950,1,-9,Poseidonia
";

const REFERENCE_HEADER: &[u8] = b"ctr_n,Subdivision.category,ISO3166_2.code,star,Subdivision.name,\
Local.variant,Language.code,Romanization.system,Parent.subdivision,Country_code,Constituent_code\n";

const OVERRIDES: &str = "\
countryName,districtNameLower,label,notes,trueSubdivisionCode
Canada,sherwood park,clea_sub_error,Sherwood Park lies in Alberta,CA-AB
";

fn reference_bytes() -> Vec<u8> {
    let mut bytes = REFERENCE_HEADER.to_vec();
    bytes.extend_from_slice(b"Canada,province,CA-AB,,Alberta,,en,,,CA,\n");
    bytes.extend_from_slice(b"Canada,province,CA-BC,,British Columbia,,en,,,CA,\n");
    bytes.extend_from_slice(b"Canada,province,CA-QC,,Qu\xe9bec,,fr,,,CA,\n");
    bytes.extend_from_slice(b"Canada,province,CA-QC,,Quebec,,en,,,CA,\n");
    bytes.extend_from_slice(b"Canada,territory,CA-YT,,Yukon,,en,,,CA,\n");
    bytes.extend_from_slice(b"Norway,county,NO-03,,Oslo,,nb,,,NO,\n");
    bytes
}

fn fixture() -> (TempDir, GeolinkConfig) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(root.join("archive.csv"), ARCHIVE).unwrap();
    fs::write(root.join("iso.csv"), reference_bytes()).unwrap();
    fs::write(root.join("overrides.csv"), OVERRIDES).unwrap();

    let mut config = GeolinkConfig::default();
    config.paths.archive = root.join("archive.csv");
    config.paths.reference = root.join("iso.csv");
    config.paths.overrides = root.join("overrides.csv");
    config.paths.work_dir = root.join("work");
    (dir, config)
}

const SHERWOOD_PARK_FORT_SASKATCHEWAN: &str = "Sherwood Park—Fort Saskatchewan";

/// Archive row filed under Saskatchewan although the riding lies in Alberta,
/// with a curated override keyed on the em-dashed name.
fn mislabeled_province_fixture() -> (TempDir, GeolinkConfig) {
    let (dir, config) = fixture();
    fs::write(
        &config.paths.archive,
        format!(
            "release,id,rg,ctr_n,ctr,yr,mn,sub,cst_n\n\
             20,7,North America,Canada,124,2004,6,Saskatchewan,{SHERWOOD_PARK_FORT_SASKATCHEWAN}\n"
        ),
    )
    .unwrap();
    let mut references = reference_bytes();
    references.extend_from_slice(b"Canada,province,CA-SK,,Saskatchewan,,en,,,CA,\n");
    fs::write(&config.paths.reference, references).unwrap();
    fs::write(
        &config.paths.overrides,
        format!(
            "countryName,districtNameLower,label,notes,trueSubdivisionCode\n\
             Canada,{SHERWOOD_PARK_FORT_SASKATCHEWAN},clea_sub_error,Riding lies in Alberta,CA-AB\n"
        ),
    )
    .unwrap();
    (dir, config)
}

fn validated_mislabeled_row(oracle: &ScriptedOracle) -> ValidatedRecord {
    let (_dir, config) = mislabeled_province_fixture();
    pipeline::clean(&config).unwrap();
    link(&config, oracle, &["Canada"], false);

    let outcome = pipeline::validate(&config).unwrap();
    assert!(outcome.warnings.is_empty());
    let records: Vec<ValidatedRecord> = read_json(&outcome.validated_json).unwrap();
    assert_eq!(records.len(), 1);
    records.into_iter().next().unwrap()
}

/// Answers by candidate name so tests do not depend on candidate order.
#[derive(Default)]
struct ScriptedOracle {
    answers: BTreeMap<&'static str, Vec<(&'static str, f64)>>,
    failing: Vec<&'static str>,
}

impl ScriptedOracle {
    fn canada() -> Self {
        let mut oracle = Self::default();
        oracle
            .answers
            .insert("British Columbia - Sherwood Park", vec![("British Columbia", 0.15)]);
        oracle
            .answers
            .insert("Alberta - Calgary West", vec![("Alberta", 0.95)]);
        oracle.answers.insert("Oslo", vec![("Oslo", 1.0)]);
        oracle
    }

    fn failing_on(mut self, name: &'static str) -> Self {
        self.failing.push(name);
        self
    }
}

impl SimilarityOracle for ScriptedOracle {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn match_candidates(
        &self,
        source_name: &str,
        candidates: &[String],
        _context: &OracleContext,
    ) -> Result<Vec<OracleCandidate>, OracleError> {
        if self.failing.iter().any(|name| *name == source_name) {
            return Err(OracleError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        let answer = self.answers.get(source_name).cloned().unwrap_or_default();
        Ok(answer
            .into_iter()
            .filter_map(|(name, probability)| {
                candidates
                    .iter()
                    .position(|candidate| candidate == name)
                    .map(|index| OracleCandidate { index, probability })
            })
            .collect())
    }
}

fn link(
    config: &GeolinkConfig,
    oracle: &dyn SimilarityOracle,
    countries: &[&str],
    overwrite: bool,
) -> pipeline::LinkOutcome {
    let request = LinkRequest {
        countries: countries.iter().map(|c| (*c).to_string()).collect(),
        overwrite,
        layout: KeyLayout::Combined,
    };
    pipeline::link(config, oracle, &request, &ProgressBar::hidden()).unwrap()
}

fn statuses(outcome: &pipeline::LinkOutcome) -> Vec<(&str, &CountryStatus)> {
    outcome
        .countries
        .iter()
        .map(|row| (row.country.as_str(), &row.status))
        .collect()
}

#[test]
fn clean_filters_archive_and_prefers_english_reference() {
    let (_dir, config) = fixture();
    let outcome = pipeline::clean(&config).unwrap();
    assert_eq!(outcome.sources, 5);
    assert_eq!(outcome.before_min_year, 1);
    assert_eq!(outcome.duplicates, 1);
    assert_eq!(outcome.reference_rows, 6);
    assert_eq!(outcome.subdivisions, 5);

    let work = WorkDir::new(&config.paths.work_dir);
    let references: Vec<ReferenceRecord> = read_json(&work.reference_table()).unwrap();
    let quebec: Vec<_> = references.iter().filter(|r| r.code == "CA-QC").collect();
    assert_eq!(quebec.len(), 1);
    assert_eq!(quebec[0].name, "Quebec");
    assert_eq!(quebec[0].language_code, "en");
}

#[test]
fn link_records_failed_countries_and_keeps_the_rest() {
    let (_dir, config) = fixture();
    pipeline::clean(&config).unwrap();

    let oracle = ScriptedOracle::canada().failing_on("Oslo");
    let outcome = link(&config, &oracle, &[], false);
    assert_eq!(outcome.failed, vec!["Norway".to_string()]);
    assert_eq!(
        statuses(&outcome)
            .into_iter()
            .map(|(country, status)| (country, matches!(status, CountryStatus::Linked { .. })))
            .collect::<Vec<_>>(),
        vec![("Atlantis", false), ("Canada", true), ("Norway", false)]
    );
    assert!(matches!(
        outcome.countries[0].status,
        CountryStatus::NoReference
    ));

    let store = WorkDir::new(&config.paths.work_dir).partitions();
    assert!(store.exists("Canada"));
    assert!(!store.exists("Norway"));
    assert!(!store.exists("Atlantis"));

    let retry = link(&config, &ScriptedOracle::canada(), &["Norway", "Canada"], false);
    assert!(retry.failed.is_empty());
    assert_eq!(
        statuses(&retry),
        vec![
            (
                "Norway",
                &CountryStatus::Linked {
                    rows: 1,
                    flagged: 0
                }
            ),
            ("Canada", &CountryStatus::Skipped),
        ]
    );
}

#[test]
fn repeated_link_leaves_partitions_byte_identical() {
    let (_dir, config) = fixture();
    pipeline::clean(&config).unwrap();
    let oracle = ScriptedOracle::canada();

    link(&config, &oracle, &["Canada"], false);
    let path = WorkDir::new(&config.paths.work_dir)
        .partitions()
        .path_for("Canada");
    let first = fs::read(&path).unwrap();

    let second = link(&config, &oracle, &["Canada"], false);
    assert_eq!(statuses(&second), vec![("Canada", &CountryStatus::Skipped)]);
    assert_eq!(fs::read(&path).unwrap(), first);
}

#[test]
fn overwrite_recomputes_identical_rows() {
    let (_dir, config) = fixture();
    pipeline::clean(&config).unwrap();
    let oracle = ScriptedOracle::canada();
    let store = WorkDir::new(&config.paths.work_dir).partitions();

    link(&config, &oracle, &["Canada"], false);
    let before = store.load("Canada").unwrap();
    let rerun = link(&config, &oracle, &["Canada"], true);
    assert!(matches!(
        rerun.countries[0].status,
        CountryStatus::Linked { rows: 3, flagged: 2 }
    ));
    let after = store.load("Canada").unwrap();
    assert_eq!(before.rows, after.rows);
    assert_eq!(before.digest, after.digest);
}

#[test]
fn lexical_oracle_links_exact_names() {
    let (_dir, config) = fixture();
    pipeline::clean(&config).unwrap();
    let oracle = config.oracle.build().unwrap();
    link(&config, oracle.as_ref(), &["Canada"], false);

    let partition = WorkDir::new(&config.paths.work_dir)
        .partitions()
        .load("Canada")
        .unwrap();
    let rows = decode_partition(&partition).unwrap();
    let yukon = rows
        .iter()
        .find(|row| row.source.district_name == "Yukon")
        .unwrap();
    assert_eq!(yukon.subdivision_code(), Some("CA-YT"));
    assert_eq!(yukon.match_probability, Some(1.0));
    assert!(!yukon.review_flag);
}

#[test]
fn validate_applies_overrides_and_writes_work_queue() {
    let (_dir, config) = fixture();
    pipeline::clean(&config).unwrap();
    let request = LinkRequest {
        countries: vec!["Canada".to_string()],
        overwrite: false,
        layout: KeyLayout::Split,
    };
    pipeline::link(
        &config,
        &ScriptedOracle::canada(),
        &request,
        &ProgressBar::hidden(),
    )
    .unwrap();

    let outcome = pipeline::validate(&config).unwrap();
    assert!(outcome.warnings.is_empty());
    insta::assert_json_snapshot!(outcome.summary, @r#"
    {
      "total_rows": 3,
      "flagged": 2,
      "labeled": 1,
      "corrected": 1,
      "unresolved_codes": 0,
      "by_country_label": [
        {
          "country": "Canada",
          "label": null,
          "flagged": 1
        },
        {
          "country": "Canada",
          "label": "clea_sub_error",
          "flagged": 1
        }
      ]
    }
    "#);

    let records: Vec<ValidatedRecord> = read_json(&outcome.validated_json).unwrap();
    let sherwood = records
        .iter()
        .find(|row| row.record.source.district_name == "Sherwood Park")
        .unwrap();
    assert_eq!(sherwood.label, Some(OverrideLabel::CleaSubError));
    assert_eq!(sherwood.record.subdivision_code(), Some("CA-AB"));
    assert_eq!(sherwood.record.matched_target_name(), Some("Alberta"));
    assert!(sherwood.corrected);
    assert_eq!(sherwood.record.country(), "Canada");

    let queue = fs::read_to_string(&outcome.work_queue_csv).unwrap();
    assert_eq!(queue.lines().count(), 2);
    assert!(queue.contains("Yukon"));
    assert!(outcome.validated_csv.is_file());
}

#[test]
fn override_corrects_oracle_match_in_wrong_province() {
    let mut oracle = ScriptedOracle::default();
    oracle
        .answers
        .insert(SHERWOOD_PARK_FORT_SASKATCHEWAN, vec![("Saskatchewan", 0.9)]);

    let row = validated_mislabeled_row(&oracle);
    assert_eq!(row.record.source.district_name, SHERWOOD_PARK_FORT_SASKATCHEWAN);
    assert_eq!(row.record.source.subdivision_label, "Saskatchewan");
    assert_eq!(row.record.subdivision_code(), Some("CA-AB"));
    assert_eq!(row.record.matched_target_name(), Some("Alberta"));
    assert_eq!(row.label, Some(OverrideLabel::CleaSubError));
    assert!(row.corrected);
}

#[test]
fn override_corrects_row_without_oracle_candidates() {
    let row = validated_mislabeled_row(&ScriptedOracle::default());
    assert_eq!(row.record.source.district_name, SHERWOOD_PARK_FORT_SASKATCHEWAN);
    assert_eq!(row.record.match_probability, None);
    assert_eq!(row.record.subdivision_code(), Some("CA-AB"));
    assert_eq!(row.record.matched_target_name(), Some("Alberta"));
    assert_eq!(row.label, Some(OverrideLabel::CleaSubError));
    assert!(row.corrected);
}

#[test]
fn status_lists_pending_and_stored_countries() {
    let (_dir, config) = fixture();
    pipeline::clean(&config).unwrap();
    link(&config, &ScriptedOracle::canada(), &["Canada"], false);

    let rows = pipeline::status(&config).unwrap();
    let summary: Vec<_> = rows
        .iter()
        .map(|row| {
            (
                row.country.as_str(),
                row.sources,
                row.stored.as_ref().map(|stored| (stored.rows, stored.flagged)),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Atlantis", 1, None),
            ("Canada", 3, Some((3, 2))),
            ("Norway", 1, None),
        ]
    );
}

#[test]
fn link_without_clean_tables_fails() {
    let (_dir, config) = fixture();
    let request = LinkRequest::default();
    let err = pipeline::link(
        &config,
        &ScriptedOracle::default(),
        &request,
        &ProgressBar::hidden(),
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("geolink clean"));
}
