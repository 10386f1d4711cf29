//! End-to-end integration tests for the export pipeline.
//!
//! Runs BEACON and RDF export over a small TEI index with a person register,
//! a filtered place register and a register whose container is absent.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use tei_beacon::{export, Config, ExportMode};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .and_then(|d| d.and_hms_opt(3, 4, 5))
        .unwrap()
}

/// Load the fixture configuration, pointed at the fixture index and `output`.
fn load_config(output: &Path) -> Config {
    let mut config = Config::load(&fixture("config.yaml")).expect("Failed to load config");
    config.file_location = fixture("index.xml");
    config.output_dir = output.to_path_buf();
    config
}

fn read(path: PathBuf) -> String {
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

fn run(mode: ExportMode) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(dir.path());
    export(&config, mode, None, timestamp()).expect("export failed");
    dir
}

#[test]
fn test_beacon_files_per_authority() {
    let dir = run(ExportMode::Beacon);

    assert_eq!(
        read(dir.path().join("BEACON_persons_viaf.txt")),
        "#FORMAT: BEACON\n\
         #NAME: Pessoa Digital\n\
         #PREFIX: viaf/\n\
         #TARGET: https://www.pessoadigital.pt/index/names#\n\
         #CONTACT: info@pessoadigital.pt\n\
         #MESSAGE: Entries of the edition index\n\
         #RELATION: http://www.w3.org/2002/07/owl#sameAs\n\
         #TIMESTAMP: 2024-01-02T03:04:05\n\
         \n\
         1||A\n"
    );

    let gnd = read(dir.path().join("BEACON_persons_gnd.txt"));
    assert!(gnd.contains("#PREFIX: http://d-nb.info/gnd/\n"));
    assert!(gnd.ends_with("\n\n4||C\n"));

    // No person carries a Wikidata id, so no file is written for it
    assert!(!dir.path().join("BEACON_persons_wd.txt").exists());
    assert!(!dir.path().join("output.ttl").exists());
}

#[test]
fn test_missing_authority_logs() {
    let dir = run(ExportMode::Beacon);
    let noids = dir.path().join("noids");

    assert_eq!(
        read(noids.join("persons_noids.txt")),
        "items with no associated authority file:\nB,\n"
    );
    // L2 only carries an identifier of an unconfigured authority
    assert_eq!(
        read(noids.join("places_noids.txt")),
        "items with no associated authority file:\nL2,\n"
    );
}

#[test]
fn test_filtered_register_without_prefix() {
    let dir = run(ExportMode::Beacon);

    let wd = read(dir.path().join("BEACON_places_wd.txt"));
    assert!(wd.contains("#PREFIX: url-not-given\n"));
    assert!(wd.contains("#TARGET: https://www.pessoadigital.pt/index/places#\n"));
    assert!(wd.ends_with("\n\nQ597||L1\n"));
    assert!(!wd.contains("Q0"));
}

#[test]
fn test_absent_register_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(dir.path());
    let report = export(&config, ExportMode::Beacon, None, timestamp()).unwrap();

    let events = report
        .registers
        .iter()
        .find(|r| r.register == "events")
        .unwrap();
    assert!(events.skipped.is_some());
    assert!(!dir.path().join("noids").join("events_noids.txt").exists());
    assert_eq!(report.registers.len(), 3);
}

#[test]
fn test_output_is_deterministic() {
    let first = run(ExportMode::All);
    let second = run(ExportMode::All);

    for name in [
        "BEACON_persons_viaf.txt",
        "BEACON_persons_gnd.txt",
        "BEACON_places_wd.txt",
        "output.ttl",
        "output.rdf",
    ] {
        assert_eq!(read(first.path().join(name)), read(second.path().join(name)));
    }
}

#[test]
fn test_rdf_output() {
    let dir = run(ExportMode::Rdf);

    let turtle = read(dir.path().join("output.ttl"));
    assert!(turtle.contains("@prefix pdperson: <http://www.pessoadigital.pt/index/names#> ."));
    assert!(turtle.contains(
        "pdperson:A\n    a crm:E21_Person ;\n    owl:sameAs viaf:1 ;\n    foaf:gender \"male\" ;\n    foaf:name \"Alberto Caeiro\" .\n"
    ));
    assert!(turtle.contains("owl:sameAs gnd:4"));
    assert!(turtle.contains("pdperson:B\n    a crm:E21_Person ;"));

    let rdf_xml = read(dir.path().join("output.rdf"));
    let doc = roxmltree::Document::parse(&rdf_xml).expect("RDF/XML must be well-formed");
    let descriptions = doc
        .descendants()
        .filter(|n| n.tag_name().name() == "Description")
        .count();
    assert_eq!(descriptions, 3);

    // BEACON output is not part of an RDF-only run
    assert!(!dir.path().join("BEACON_persons_viaf.txt").exists());
}

#[test]
fn test_output_override() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(&dir.path().join("configured"));
    let override_dir = dir.path().join("override");

    export(&config, ExportMode::Beacon, Some(&override_dir), timestamp()).unwrap();

    assert!(override_dir.join("BEACON_persons_viaf.txt").exists());
    assert!(!dir.path().join("configured").exists());
}
