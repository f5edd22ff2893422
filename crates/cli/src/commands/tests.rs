use std::fs;

use pretty_assertions::assert_eq;
use serde_json::Value;

use super::*;

struct Fixture {
	dir: tempfile::TempDir,
	config: Config,
}

impl Fixture {
	fn new() -> Self {
		let dir = tempfile::tempdir().expect("create tempdir");
		let mut config = Config::default();
		config.plots.dir = dir.path().join("plots");
		fs::create_dir(&config.plots.dir).unwrap();
		Self { dir, config }
	}

	fn plot(&self, file: &str, doc: Value) -> PathBuf {
		let path = self.config.plots.dir.join(file);
		fs::write(&path, doc.to_string()).unwrap();
		path
	}
}

fn run(f: impl FnOnce(&mut dyn Write) -> Result<Outcome>) -> (Outcome, String) {
	let mut buf = Vec::new();
	let outcome = f(&mut buf).unwrap();
	(outcome, String::from_utf8(buf).unwrap())
}

fn grid_plot(id: &str, x: i64, y: i64) -> Value {
	json!({ "id": id, "owner": "agent-7", "position": [x, y], "size": [2, 2] })
}

#[test]
fn list_reports_records_and_errors_and_succeeds() {
	let fx = Fixture::new();
	fx.plot("a.json", grid_plot("alpha", 0, 0));
	fx.plot("b.json", grid_plot("beta", 1, 1));
	fx.plot("agent_template.json", grid_plot("template", 40, 40));

	let (outcome, text) = run(|out| list(&fx.config, false, out));
	assert_eq!(outcome, Outcome::Success);
	assert_eq!(text, "alpha\tagent-7\t(0, 0)\t2x2\nerror: Plot beta in b.json overlaps with another plot.\n1 plots, 1 errors\n");

	let (_, text) = run(|out| list(&fx.config, true, out));
	let value: Value = serde_json::from_str(&text).unwrap();
	assert_eq!(value["records"][0]["id"], json!("alpha"));
	assert_eq!(value["errors"], json!(["Plot beta in b.json overlaps with another plot."]));
}

#[test]
fn list_fails_when_directory_is_missing() {
	let mut fx = Fixture::new();
	fx.config.plots.dir = fx.dir.path().join("absent");
	let mut buf = Vec::new();
	let err = list(&fx.config, false, &mut buf).unwrap_err();
	assert!(err.to_string().starts_with("cannot load plots from "), "{err:#}");
}

#[test]
fn get_found_and_not_found() {
	let fx = Fixture::new();
	fx.plot("a.json", grid_plot("alpha", 0, 0));
	fx.plot("b.json", json!({ "id": "broken" }));

	let (outcome, text) = run(|out| get(&fx.config, "alpha", true, out));
	assert_eq!(outcome, Outcome::Success);
	assert_eq!(serde_json::from_str::<Value>(&text).unwrap()["owner"], json!("agent-7"));

	let (outcome, text) = run(|out| get(&fx.config, "missing", true, out));
	assert_eq!(outcome, Outcome::NotFound);
	assert_eq!(
		serde_json::from_str::<Value>(&text).unwrap(),
		json!({
			"error": "Plot with id 'missing' not found.",
			"errors": ["Plot in b.json missing fields: position, size"],
		})
	);
}

#[test]
fn get_miss_in_text_mode_prints_lines() {
	let fx = Fixture::new();
	fx.plot("a.json", grid_plot("alpha", 0, 0));
	fx.plot("b.json", json!({ "id": "broken" }));

	let (outcome, text) = run(|out| get(&fx.config, "missing", false, out));
	assert_eq!(outcome, Outcome::NotFound);
	assert_eq!(text, "Plot with id 'missing' not found.\nerror: Plot in b.json missing fields: position, size\n");
}

fn submission(code: &str) -> Value {
	json!({
		"name": "Ember Field",
		"description": "Drifting embers",
		"agent_id": "agent-7",
		"coordinates": { "x": 0, "y": 0, "z": 0 },
		"size": { "width": 2, "height": 2, "depth": 2 },
		"visualization": { "renderer": "webgl", "code": { "javascript": code } },
		"interactions": { "hover": "glow" },
		"metadata": { "tags": ["fire"] }
	})
}

#[test]
fn validate_exit_code_follows_validity() {
	let fx = Fixture::new();
	let good = fx.plot("good.json", submission("let t = 0;"));
	let bad = fx.plot("bad.json", submission("eval(payload)"));

	let (outcome, _) = run(|out| validate(&fx.config, &[good.clone()], false, out));
	assert_eq!(outcome, Outcome::Success);

	let (outcome, text) = run(|out| validate(&fx.config, &[good, bad], true, out));
	assert_eq!(outcome, Outcome::Findings);
	let value: Value = serde_json::from_str(&text).unwrap();
	assert_eq!(value[0]["valid"], json!(true));
	assert_eq!(value[1]["valid"], json!(false));
	assert!(value[1]["file"].as_str().unwrap().ends_with("bad.json"));
}

#[test]
fn validate_reports_unparsable_files_as_invalid() {
	let fx = Fixture::new();
	let path = fx.config.plots.dir.join("junk.json");
	fs::write(&path, "{").unwrap();

	let (outcome, text) = run(|out| validate(&fx.config, &[path], false, out));
	assert_eq!(outcome, Outcome::Findings);
	assert!(text.contains(": invalid\n  error: Validation failed: "), "{text}");
}

#[test]
fn scan_exit_code_follows_issues() {
	let fx = Fixture::new();
	fx.plot("clean.json", submission("let t = 0;"));

	let (outcome, text) = run(|out| scan(&fx.config, None, false, out));
	assert_eq!(outcome, Outcome::Success);
	assert!(text.contains("clean.json: no security issues found"), "{text}");

	fx.plot("risky.json", submission("window.open(url)"));
	let (outcome, text) = run(|out| scan(&fx.config, None, false, out));
	assert_eq!(outcome, Outcome::Findings);
	assert!(text.contains("risky.json: 1 security issues\n  issue: Dangerous javascript pattern: Opening new windows\n"), "{text}");
	assert!(text.ends_with("Total security issues: 1\nTotal warnings: 0\n"), "{text}");
}

#[test]
fn scan_accepts_an_explicit_directory() {
	let fx = Fixture::new();
	let other = fx.dir.path().join("other");
	fs::create_dir(&other).unwrap();

	let (outcome, text) = run(|out| scan(&fx.config, Some(&other), false, out));
	assert_eq!(outcome, Outcome::Success);
	assert_eq!(text, "No plot files found\n");
}

#[test]
fn classify_agent_prints_boolean() {
	let (_, text) = run(|out| classify_agent("Claude-User/1.0", out));
	assert_eq!(text, "true\n");
	let (_, text) = run(|out| classify_agent("Mozilla/5.0 Firefox/128.0", out));
	assert_eq!(text, "false\n");
}
