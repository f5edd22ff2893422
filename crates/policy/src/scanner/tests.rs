use std::fs;

use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn scan(doc: Value) -> ScanReport {
	Scanner::default().scan(&doc)
}

#[test]
fn clean_document_has_no_findings() {
	let report = scan(json!({
		"name": "Quiet Pond",
		"coordinates": { "x": 1, "y": 2, "z": 3 },
		"size": { "width": 10, "height": 10, "depth": 1 },
		"visualization": { "code": { "glsl": "void main() { gl_FragColor = vec4(1.0); }" } },
		"metadata": { "tags": ["water"], "contact": { "email": "pond@example.org" } }
	}));
	assert!(report.is_clean(), "{report:?}");
}

#[test]
fn language_tables_produce_issues() {
	let report = scan(json!({
		"visualization": { "code": {
			"javascript": "fetch('/x').then(r => { el.innerHTML = r; })",
			"python": "data = open('f').read()",
			"glsl": "uniform sampler2D t;",
			"lua": "os.execute('rm')"
		} }
	}));
	assert_eq!(
		report.issues,
		vec![
			"Dangerous glsl pattern: Texture uniforms".to_string(),
			"Dangerous javascript pattern: Direct innerHTML assignment".to_string(),
			"Dangerous javascript pattern: Network requests".to_string(),
			"Dangerous python pattern: File operations".to_string(),
		]
	);
	assert!(report.warnings.is_empty());
}

#[test]
fn non_string_code_is_skipped() {
	let report = scan(json!({ "visualization": { "code": { "javascript": ["eval(1)"] } } }));
	assert!(report.issues.is_empty());
}

#[test]
fn large_code_section_is_a_warning() {
	let report = scan(json!({ "visualization": { "code": { "wgsl": "x".repeat(50_001) } } }));
	assert_eq!(report.warnings, vec!["Large wgsl code section: 50001 chars".to_string()]);
}

#[test]
fn all_url_kinds_are_reported() {
	let report = scan(json!({
		"metadata": {
			"a": "https://tracker.example.net/p.gif",
			"b": "data:application/octet-stream;base64,AA",
			"c": "javascript:alert(1)",
			"d": "vbscript:run",
			"e": "file:///etc/hosts",
			"f": "ftp://mirror.example.net/pub"
		}
	}));
	assert_eq!(
		report.warnings,
		vec![
			"Suspicious URL: External URL - https://tracker.example.net/p.gif".to_string(),
			"Suspicious URL: Non-image data URL - data:application/octet-stream;base64,AA".to_string(),
			"Suspicious URL: JavaScript URL - javascript:alert(1)".to_string(),
			"Suspicious URL: VBScript URL - vbscript:run".to_string(),
			"Suspicious URL: File URL - file:///etc/hosts".to_string(),
			"Suspicious URL: FTP URL - ftp://mirror.example.net/pub".to_string(),
		]
	);
}

#[test]
fn oversized_resources_are_warnings() {
	let report = scan(json!({
		"coordinates": { "x": -10_001, "y": 5, "z": 12_000.5 },
		"size": [1_001, 3, 2_000],
		"visualization": { "style": { "particle_count": 50_001 } }
	}));
	assert_eq!(
		report.warnings,
		vec![
			"Very large coordinate: x=-10001".to_string(),
			"Very large coordinate: z=12000.5".to_string(),
			"Very large dimension: width=1001".to_string(),
			"Very large dimension: depth=2000".to_string(),
			"Very high particle count: 50001".to_string(),
		]
	);
	assert!(report.issues.is_empty());
}

#[test]
fn noisy_metadata_is_a_warning() {
	let tags: Vec<_> = (0..51).map(|i| format!("t{i}")).collect();
	let report = scan(json!({
		"metadata": { "tags": tags, "contact": { "bio": "b".repeat(501), "email": "ok@example.org", "age": 3 } }
	}));
	assert_eq!(report.warnings, vec!["Excessive number of tags: 51".to_string(), "Very long contact bio: 501 chars".to_string()]);
}

#[test]
fn unreadable_and_unparsable_files_are_single_issues() {
	let dir = tempfile::tempdir().expect("create tempdir");
	let broken = dir.path().join("broken.json");
	fs::write(&broken, "{ not json").unwrap();

	let report = Scanner::default().scan_file(&broken);
	assert_eq!(report.issues.len(), 1);
	assert!(report.issues[0].starts_with("Failed to read plot: "), "{}", report.issues[0]);
	assert!(report.warnings.is_empty());

	let missing = Scanner::default().scan_file(&dir.path().join("absent.json"));
	assert!(missing.issues[0].starts_with("Failed to read plot: "));

	let list = scan(json!([1, 2]));
	assert_eq!(list.issues, vec!["Failed to read plot: document root must be a JSON object".to_string()]);
}

#[test]
fn directory_scan_totals_and_skips_template() {
	let dir = tempfile::tempdir().expect("create tempdir");
	let write = |name: &str, doc: Value| fs::write(dir.path().join(name), doc.to_string()).unwrap();
	write("b.json", json!({ "visualization": { "code": { "python": "import subprocess" } } }));
	write("a.json", json!({ "metadata": { "link": "https://elsewhere.example.com" } }));
	write("c.json", json!({ "name": "fine" }));
	write("agent_template.json", json!({ "visualization": { "code": { "javascript": "eval(x)" } } }));
	fs::write(dir.path().join("notes.txt"), "eval(").unwrap();

	let batch = Scanner::default().scan_dir(dir.path(), "agent_template.json").unwrap();

	let files: Vec<_> = batch.files.iter().map(|f| f.file.as_str()).collect();
	assert_eq!(files, vec!["a.json", "b.json", "c.json"]);
	assert_eq!((batch.total_issues, batch.total_warnings), (1, 1));
	assert!(batch.has_issues());
	assert!(batch.files[2].report.is_clean());

	let value = serde_json::to_value(&batch.files[1]).unwrap();
	assert_eq!(value, json!({ "file": "b.json", "issues": ["Dangerous python pattern: Subprocess execution"], "warnings": [] }));
}

#[test]
fn clean_directory_has_no_issues() {
	let dir = tempfile::tempdir().expect("create tempdir");
	fs::write(dir.path().join("ok.json"), json!({ "name": "fine" }).to_string()).unwrap();
	let batch = Scanner::default().scan_dir(dir.path(), "agent_template.json").unwrap();
	assert!(!batch.has_issues());
}

#[test]
fn missing_directory_is_an_error() {
	let dir = tempfile::tempdir().expect("create tempdir");
	assert!(Scanner::default().scan_dir(&dir.path().join("plots"), "agent_template.json").is_err());
}
