use std::fs;

use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

#[test]
fn dir_source_orders_by_name_and_skips_template_and_non_json() {
	let dir = tempfile::tempdir().expect("create tempdir");
	fs::write(dir.path().join("b.json"), r#"{"id": "b"}"#).unwrap();
	fs::write(dir.path().join("a.json"), r#"{"id": "a"}"#).unwrap();
	fs::write(dir.path().join(DEFAULT_TEMPLATE_FILE), r#"{"id": "template"}"#).unwrap();
	fs::write(dir.path().join("notes.txt"), "not a plot").unwrap();
	fs::create_dir(dir.path().join("nested.json")).unwrap();

	let source = DirSource::new(dir.path());
	let labels: Vec<String> = source.documents().unwrap().map(|d| d.label).collect();
	assert_eq!(labels, vec!["a.json".to_string(), "b.json".to_string()]);
}

#[test]
fn custom_template_name_is_skipped() {
	let dir = tempfile::tempdir().expect("create tempdir");
	fs::write(dir.path().join("a.json"), "{}").unwrap();
	fs::write(dir.path().join("skeleton.json"), "{}").unwrap();
	fs::write(dir.path().join(DEFAULT_TEMPLATE_FILE), "{}").unwrap();

	let files = list_plot_files(dir.path(), "skeleton.json").unwrap();
	let names: Vec<String> = files.iter().map(|p| file_label(p)).collect();
	assert_eq!(names, vec!["a.json".to_string(), DEFAULT_TEMPLATE_FILE.to_string()]);
}

#[test]
fn missing_dir_is_an_error() {
	let dir = tempfile::tempdir().expect("create tempdir");
	let err = DirSource::new(dir.path().join("absent")).documents().err().expect("missing dir must fail");
	assert!(matches!(err, SourceError::MissingDir { .. }));
}

#[test]
fn text_documents_decode_lazily() {
	let ok = SourceDocument::text("ok.json", r#"{"id": 1}"#);
	assert_eq!(ok.into_value().unwrap(), json!({"id": 1}));

	let bad = SourceDocument::text("bad.json", "{ not json");
	assert!(bad.into_value().is_err());

	let gone = SourceDocument {
		label: "gone.json".into(),
		body: DocumentBody::Unreadable("permission denied".into()),
	};
	assert_eq!(gone.into_value().unwrap_err(), "permission denied");
}

#[test]
fn memory_source_preserves_insertion_order() {
	let source: MemorySource = [("first", json!({"id": "1"})), ("second", json!({"id": "2"}))].into_iter().collect();
	assert_eq!(source.len(), 2);
	let labels: Vec<String> = source.documents().unwrap().map(|d| d.label).collect();
	assert_eq!(labels, vec!["first".to_string(), "second".to_string()]);
}
