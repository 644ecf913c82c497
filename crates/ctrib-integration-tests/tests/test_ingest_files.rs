//! # File-Based Ingestion — Integration Tests
//!
//! Drives the CLI library path end to end: payload files on disk, a YAML
//! source manifest pointing at them, snapshot build, and classification —
//! the same flow `ctrib ingest` / `ctrib classify` run.

use std::path::Path;

use ctrib_cli::load_snapshot;
use ctrib_engine::ProductQuery;
use ctrib_pack::{parser, SourceManifest};

fn write(path: &Path, content: &str) {
    std::fs::write(path, content).expect("write fixture");
}

#[test]
fn manifest_driven_ingest_and_classify() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("classtrib.json"),
        r#"[
            {"rule": {"id": "000001", "cClassTrib": "000001", "Anexo": 1, "descricao": "Cesta básica"}},
            {"rule": {"id": "000002", "cClassTrib": "000002", "Anexo": null}}
        ]"#,
    );
    write(
        &dir.path().join("anexos.json"),
        r#"[
            {"nroAnexo": 1, "codNcmNbs": "1006.30", "unidade": "KG"},
            {"nroAnexo": 1, "codNcmNbs": "0401"}
        ]"#,
    );
    write(
        &dir.path().join("sources.yaml"),
        "label: cff-fixture\nrules: classtrib.json\nannexes: anexos.json\nas_of: 2026-07-01\n",
    );

    let manifest = SourceManifest::load(&dir.path().join("sources.yaml")).unwrap();
    assert_eq!(manifest.label.as_deref(), Some("cff-fixture"));

    let (snapshot, report) = load_snapshot(&manifest).unwrap();
    assert!(!report.has_errors());
    assert_eq!(snapshot.diagnostics().rule_count, 2);
    assert_eq!(snapshot.diagnostics().annex_entry_count, 2);

    let result = snapshot
        .classify(&ProductQuery::new("1006.30.21").with_as_of(manifest.as_of.unwrap()))
        .unwrap();
    assert_eq!(result.matched_rule_id.unwrap().as_str(), "000001");
}

#[test]
fn raw_store_envelope_payload_loads() {
    let dir = tempfile::tempdir().unwrap();
    // A row dumped straight from the raw store wraps the payload.
    write(
        &dir.path().join("anexos.json"),
        r#"{"source_api": "anexos", "payload_json": [{"nroAnexo": 2, "codNcmNbs": "2202.10.00"}]}"#,
    );

    let values = parser::load_payload_values(&dir.path().join("anexos.json")).unwrap();
    assert_eq!(values.len(), 1);
}

#[test]
fn partially_malformed_files_still_produce_a_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("classtrib.json"),
        r#"[
            {"id": "R1", "classification_code": "000", "Anexo": 1},
            {"classification_code": "missing-id"},
            "not even an object"
        ]"#,
    );
    write(
        &dir.path().join("anexos.json"),
        r#"[
            {"nroAnexo": 1, "codNcmNbs": "1006.30"},
            {"nroAnexo": 1, "codNcmNbs": "NOT-A-CODE"}
        ]"#,
    );

    let manifest = SourceManifest {
        label: None,
        rules: dir.path().join("classtrib.json"),
        annexes: dir.path().join("anexos.json"),
        as_of: None,
    };

    let (snapshot, report) = load_snapshot(&manifest).unwrap();
    assert_eq!(report.rules_loaded, 1);
    assert_eq!(report.rules_skipped, 2);
    assert_eq!(report.annex_entries_loaded, 1);
    assert_eq!(report.annex_entries_skipped, 1);

    let result = snapshot.classify(&ProductQuery::new("1006.30.21")).unwrap();
    assert!(result.is_definitive());
}

#[test]
fn missing_payload_file_is_an_operational_error() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("anexos.json"), "[]");

    let manifest = SourceManifest {
        label: None,
        rules: dir.path().join("does-not-exist.json"),
        annexes: dir.path().join("anexos.json"),
        as_of: None,
    };
    assert!(load_snapshot(&manifest).is_err());
}
