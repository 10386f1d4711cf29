//! Exit behavior of the `tei-beacon` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Write a configuration into `dir` reading `input` and writing to `dir/out`.
fn write_config(dir: &Path, input: &Path) -> PathBuf {
    let template = fs::read_to_string(fixture("config.yaml")).unwrap();
    let yaml = template
        .replace(
            "file_location: index.xml",
            &format!("file_location: '{}'", input.display()),
        )
        .replace(
            "output_dir: output",
            &format!("output_dir: '{}'", dir.join("out").display()),
        );
    let path = dir.join("config.yaml");
    fs::write(&path, yaml).unwrap();
    path
}

#[test]
fn test_missing_input_exits_with_status_2() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &dir.path().join("absent.xml"));

    Command::cargo_bin("tei-beacon")
        .expect("bin")
        .arg("beacon")
        .arg("--config")
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error: No .xml file located at"));

    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_invalid_config_exits_with_status_1() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yaml");
    fs::write(
        &config,
        "file_location: index.xml\n\
         header_data: { name: n, target: t, contact: c, message: m }\n\
         authority_files: {}\n\
         register_types: { persons: { element: listPerson } }\n",
    )
    .unwrap();

    Command::cargo_bin("tei-beacon")
        .expect("bin")
        .args(["beacon", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("authority_files"));
}

#[test]
fn test_all_writes_beacon_and_rdf() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &fixture("index.xml"));

    Command::cargo_bin("tei-beacon")
        .expect("bin")
        .args(["all", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("persons"));

    let out = dir.path().join("out");
    assert!(out.join("BEACON_persons_viaf.txt").exists());
    assert!(out.join("noids").join("persons_noids.txt").exists());
    assert!(out.join("output.ttl").exists());
    assert!(out.join("output.rdf").exists());
}
