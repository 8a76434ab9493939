//! File-level codec tests: write with `encode`, read back from disk.
//!
//! Each `#[case]` is isolated; no shared state.

use assert_fs::prelude::*;
use n8nctl_core::{
    encode, extract_id, extract_original_name, has_drift, read_workflow, CodecError, FileFormat,
    Tag, TagId, Workflow, WorkflowId,
};
use predicates::prelude::predicate;
use rstest::rstest;
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn minimal_workflow() -> Workflow {
    Workflow::named("Minimal")
}

fn full_workflow() -> Workflow {
    Workflow {
        id: Some(WorkflowId::from("wf-100")),
        name: "Daily Report".to_string(),
        active: Some(true),
        nodes: vec![
            json!({"name": "Cron", "type": "n8n-nodes-base.cron", "typeVersion": 1, "position": [250, 300]}),
            json!({"name": "Mail", "type": "n8n-nodes-base.emailSend", "typeVersion": 2.1, "parameters": {"toEmail": "ops@example.com"}}),
        ],
        connections: Some(
            json!({"Cron": {"main": [[{"node": "Mail", "type": "main", "index": 0}]]}})
                .as_object()
                .cloned()
                .unwrap(),
        ),
        settings: Some(json!({"executionOrder": "v1"})),
        tags: Some(vec![Tag {
            id: Some(TagId::from("3")),
            name: "reports".to_string(),
            ..Tag::default()
        }]),
        ..Workflow::default()
    }
}

fn unicode_workflow() -> Workflow {
    let mut wf = Workflow::named("ワークフロー-проект-项目");
    wf.nodes = vec![json!({"name": "Ünïcødé", "parameters": {"text": "🚀"}})];
    wf
}

// ---------------------------------------------------------------------------
// 1. Write then read
// ---------------------------------------------------------------------------

#[rstest]
#[case::minimal_json(minimal_workflow(), FileFormat::Json, "wf.json")]
#[case::full_json(full_workflow(), FileFormat::Json, "wf.json")]
#[case::full_yaml(full_workflow(), FileFormat::Yaml, "wf.yaml")]
#[case::unicode_yml(unicode_workflow(), FileFormat::Yaml, "wf.yml")]
fn written_file_reads_back_without_drift(
    #[case] workflow: Workflow,
    #[case] format: FileFormat,
    #[case] file_name: &str,
) {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child(file_name);
    let body = encode(&workflow, format, Some(&workflow.name), true).expect("encode");
    file.write_str(&body).expect("write");

    let back = read_workflow(file.path()).expect("read");
    assert!(!has_drift(&back, &workflow, true), "drift after reload: {back:?}");
    assert_eq!(
        extract_original_name(file.path()).as_deref(),
        Some(workflow.name.as_str())
    );
}

#[test]
fn json_output_is_pretty_with_sorted_keys() {
    let body = encode(&full_workflow(), FileFormat::Json, None, true).expect("encode");
    assert!(body.starts_with("{\n  \""));
    assert!(body.ends_with("}\n"));

    let active = body.find("\"active\"").expect("active");
    let name = body.find("\"name\": \"Daily Report\"").expect("name");
    let nodes = body.find("\"nodes\"").expect("nodes");
    assert!(active < name && name < nodes);
}

#[test]
fn yaml_output_starts_with_single_document_marker() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("wf.yaml");
    let body = encode(&full_workflow(), FileFormat::Yaml, Some("Daily Report"), true)
        .expect("encode");
    file.write_str(&body).expect("write");

    file.assert(predicate::str::starts_with("---\nactive: true\n"));
    file.assert(predicate::str::contains("originalName: Daily Report"));
    assert_eq!(body.matches("---").count(), 1);
}

// ---------------------------------------------------------------------------
// 2. Identifier probing
// ---------------------------------------------------------------------------

#[test]
fn extract_id_after_write() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("Daily_Report.json");
    file.write_str(&encode(&full_workflow(), FileFormat::Json, None, true).unwrap())
        .unwrap();
    assert_eq!(
        extract_id(file.path()).expect("probe"),
        Some(WorkflowId::from("wf-100"))
    );
}

#[test]
fn extract_id_rejects_unsupported_extension() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("notes.txt");
    file.write_str("id: x").unwrap();
    let err = extract_id(file.path()).unwrap_err();
    assert!(matches!(err, CodecError::UnsupportedFormat { .. }), "got: {err}");
}

#[test]
fn corrupt_yaml_returns_parse_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("broken.yaml");
    file.write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .unwrap();

    let err = read_workflow(file.path()).unwrap_err();
    assert!(matches!(err, CodecError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("broken.yaml"));
}

#[test]
fn missing_file_is_io_error() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let err = read_workflow(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, CodecError::Io { .. }), "got: {err}");
}
