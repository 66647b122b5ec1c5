use std::fs;

use num_complex::Complex64;
use qimp_obs::{Archive, ProblemRecord};

#[test]
fn open_on_a_fresh_path_yields_an_empty_archive() {
    let dir = tempfile::tempdir().unwrap();
    let archive = Archive::open(dir.path().join("run.json")).unwrap();
    assert_eq!(archive.keys().count(), 0);
    assert!(!archive.contains("problem"));
}

#[test]
fn records_round_trip_through_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");

    let mut record = ProblemRecord::new(20.0);
    record.chi = Some(Complex64::new(0.25, -0.1));
    {
        let mut archive = Archive::open(&path).unwrap();
        archive.write("problem", &record).unwrap();
    }

    let reopened = Archive::open(&path).unwrap();
    assert!(reopened.contains("problem"));
    let loaded: ProblemRecord = reopened.read("problem").unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn writes_replace_existing_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");

    let mut archive = Archive::open(&path).unwrap();
    archive.write("problem", &ProblemRecord::new(10.0)).unwrap();
    archive.write("problem", &ProblemRecord::new(40.0)).unwrap();

    let reopened = Archive::open(&path).unwrap();
    assert_eq!(reopened.keys().count(), 1);
    let loaded: ProblemRecord = reopened.read("problem").unwrap();
    assert_eq!(loaded.beta, 40.0);
}

#[test]
fn missing_keys_are_reported_with_the_key_name() {
    let dir = tempfile::tempdir().unwrap();
    let archive = Archive::open(dir.path().join("run.json")).unwrap();
    let err = archive.read::<ProblemRecord>("absent").unwrap_err();
    assert_eq!(err.info().code, "missing-key");
    assert_eq!(
        err.info().context.get("key").map(String::as_str),
        Some("absent")
    );
}

#[test]
fn corrupt_files_fail_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    fs::write(&path, "not json {{{").unwrap();
    let err = Archive::open(&path).unwrap_err();
    assert_eq!(err.info().code, "archive-parse");
}

#[test]
fn values_of_the_wrong_shape_fail_to_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    fs::write(&path, r#"{"problem": {"unexpected": true}}"#).unwrap();
    let archive = Archive::open(&path).unwrap();
    let err = archive.read::<ProblemRecord>("problem").unwrap_err();
    assert_eq!(err.info().code, "archive-parse");
}
