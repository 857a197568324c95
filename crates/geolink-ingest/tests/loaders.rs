use std::fs;
use std::path::PathBuf;

use geolink_ingest::{
    DEFAULT_REFERENCE_ENCODING, IngestError, load_archive, load_override_table, load_reference,
};
use geolink_model::{OverrideKey, OverrideLabel};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).expect("write file");
    path
}

const REFERENCE_HEADER: &str = "ctr_n,Subdivision.category,ISO3166_2.code,star,Subdivision.name,\
Local.variant,Language.code,Romanization.system,Parent.subdivision,Country_code,Constituent_code\n";

#[test]
fn reference_is_decoded_from_windows_1252() {
    let dir = TempDir::new().unwrap();
    let mut bytes = REFERENCE_HEADER.as_bytes().to_vec();
    // "Québec" with 0xE9 for é, as the legacy file stores it.
    bytes.extend_from_slice(b"Canada,province,CA-QC,,Qu\xe9bec,,fr,,,CA,\n");
    let path = write(&dir, "iso.csv", &bytes);

    let records = load_reference(&path, DEFAULT_REFERENCE_ENCODING).expect("load reference");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Québec");
    assert_eq!(records[0].code, "CA-QC");
    assert_eq!(records[0].language_code, "fr");
}

#[test]
fn reference_missing_column_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "iso.csv", b"ctr_n,ISO3166_2.code\nCanada,CA-AB\n");
    let err = load_reference(&path, DEFAULT_REFERENCE_ENCODING).unwrap_err();
    match err {
        IngestError::MissingColumns { columns, .. } => {
            assert!(columns.contains(&"Subdivision.name".to_string()));
            assert!(!columns.contains(&"ctr_n".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn archive_reads_required_columns() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "clea.csv",
        "release,id,rg,ctr_n,ctr,yr,mn,sub,cst_n,extra\n\
         20,1,North America,Canada,124,1997,6,Alberta,Calgary West,x\n"
            .as_bytes(),
    );
    let load = load_archive(&path).expect("load archive");
    assert_eq!(load.records.len(), 1);
    let row = &load.records[0];
    assert_eq!(row.country_name, "Canada");
    assert_eq!(row.subdivision_label, "Alberta");
    assert_eq!(row.district_name, "Calgary West");
    assert!(row.comparison_name.is_empty());
}

#[test]
fn archive_missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = load_archive(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn override_table_parses_labels_and_codes() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "overrides.csv",
        "countryName,districtNameLower,label,notes,trueSubdivisionCode\n\
         Canada,Sherwood Park—Fort Saskatchewan,clea_sub_error,sub recorded as SK,CA-AB\n\
         Canada,yukon,low_confidence,,\n"
            .as_bytes(),
    );
    let table = load_override_table(&path).expect("load overrides");
    assert_eq!(table.len(), 2);

    let sherwood = table
        .get(&OverrideKey::new("Canada", "sherwood park—fort saskatchewan"))
        .expect("sherwood entry");
    assert_eq!(sherwood.label, OverrideLabel::CleaSubError);
    assert_eq!(sherwood.true_subdivision_code.as_deref(), Some("CA-AB"));

    let yukon = table.get(&OverrideKey::new("Canada", "yukon")).unwrap();
    assert_eq!(yukon.true_subdivision_code, None);
}

#[test]
fn override_table_rejects_duplicate_key() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "overrides.csv",
        "countryName,districtNameLower,label\n\
         Canada,yukon,low_confidence\n\
         Canada,Yukon,multi_territory\n"
            .as_bytes(),
    );
    let err = load_override_table(&path).unwrap_err();
    assert!(matches!(err, IngestError::OverrideTable { .. }));
}

#[test]
fn override_table_rejects_unknown_label() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "overrides.csv",
        "countryName,districtNameLower,label\nCanada,yukon,guess\n".as_bytes(),
    );
    let err = load_override_table(&path).unwrap_err();
    assert!(
        matches!(err, IngestError::InvalidValue { ref field, line: 2, .. } if field == "label")
    );
}

#[test]
fn bundled_override_table_loads() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/overrides.csv");
    let table = load_override_table(&path).expect("load bundled overrides");
    let sherwood = table
        .get(&OverrideKey::new("Canada", "Sherwood Park"))
        .expect("sherwood park entry");
    assert_eq!(sherwood.label, OverrideLabel::CleaSubError);
    assert_eq!(sherwood.true_subdivision_code.as_deref(), Some("CA-AB"));
    assert!(
        table
            .entries()
            .filter(|entry| entry.label == OverrideLabel::MultiTerritory)
            .all(|entry| entry.true_subdivision_code.is_none())
    );
}
