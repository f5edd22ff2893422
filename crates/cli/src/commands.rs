//! Subcommand handlers. Each writes to `out` and returns an [`Outcome`].

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use plotgrid_model::{DirSource, PlotRecord};
use plotgrid_policy::{BatchScanReport, Scanner, ValidationVerdict, Validator, is_ai_agent};
use plotgrid_registry::{PlotRegistry, Snapshot};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	Success,
	/// An invalid document or a security issue.
	Findings,
	NotFound,
}

impl From<Outcome> for ExitCode {
	fn from(outcome: Outcome) -> Self {
		match outcome {
			Outcome::Success => ExitCode::SUCCESS,
			Outcome::Findings => ExitCode::from(1),
			Outcome::NotFound => ExitCode::from(2),
		}
	}
}

fn load_snapshot(config: &Config) -> Result<std::sync::Arc<Snapshot>> {
	let source = DirSource::new(&config.plots.dir).with_template(config.plots.template.clone());
	let registry = PlotRegistry::new(config.registry.clone());
	registry.reload(&source).with_context(|| format!("cannot load plots from {}", config.plots.dir.display()))
}

fn write_json(out: &mut dyn Write, value: &impl Serialize) -> Result<()> {
	serde_json::to_writer_pretty(&mut *out, value)?;
	writeln!(out)?;
	Ok(())
}

fn describe(record: &PlotRecord) -> String {
	let mut line = format!(
		"{}\t{}\t({}, {})\t{}x{}",
		record.id,
		record.owner().unwrap_or("-"),
		record.position.x,
		record.position.y,
		record.size.width(),
		record.size.height()
	);
	if let Some(name) = record.name() {
		line.push('\t');
		line.push_str(name);
	}
	line
}

/// Listing always succeeds when the directory is readable, even if documents were rejected.
pub fn list(config: &Config, json: bool, out: &mut dyn Write) -> Result<Outcome> {
	let snap = load_snapshot(config)?;
	if json {
		write_json(out, &snap.list())?;
		return Ok(Outcome::Success);
	}

	for record in snap.records() {
		writeln!(out, "{}", describe(record))?;
	}
	for error in snap.errors() {
		writeln!(out, "error: {error}")?;
	}
	writeln!(out, "{} plots, {} errors", snap.len(), snap.errors().len())?;
	Ok(Outcome::Success)
}

pub fn get(config: &Config, key: &str, json: bool, out: &mut dyn Write) -> Result<Outcome> {
	let snap = load_snapshot(config)?;
	match snap.lookup(key) {
		Ok(record) if json => write_json(out, record)?,
		Ok(record) => {
			writeln!(out, "{}", describe(record))?;
			if let Some(viz) = record.extra.get("visualization") {
				write_json(out, viz)?;
			}
		}
		Err(not_found) if json => {
			let errors: Vec<String> = snap.errors().iter().map(ToString::to_string).collect();
			write_json(out, &json!({ "error": not_found.to_string(), "errors": errors }))?;
			return Ok(Outcome::NotFound);
		}
		Err(not_found) => {
			writeln!(out, "{not_found}")?;
			for error in snap.errors() {
				writeln!(out, "error: {error}")?;
			}
			return Ok(Outcome::NotFound);
		}
	}
	Ok(Outcome::Success)
}

#[derive(Serialize)]
struct FileVerdict<'a> {
	file: String,
	#[serde(flatten)]
	verdict: &'a ValidationVerdict,
}

fn read_document(path: &Path) -> std::result::Result<serde_json::Value, String> {
	let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
	serde_json::from_str(&text).map_err(|e| e.to_string())
}

pub fn validate(config: &Config, files: &[PathBuf], json: bool, out: &mut dyn Write) -> Result<Outcome> {
	let validator = Validator::new(config.policy.clone());
	let verdicts: Vec<(String, ValidationVerdict)> = files
		.iter()
		.map(|path| {
			let verdict = match read_document(path) {
				Ok(doc) => validator.validate(&doc),
				Err(cause) => ValidationVerdict {
					errors: vec![format!("Validation failed: {cause}")],
					..ValidationVerdict::default()
				},
			};
			(path.display().to_string(), verdict)
		})
		.collect();

	let invalid = verdicts.iter().filter(|(_, v)| !v.valid).count();
	info!(files = verdicts.len(), invalid, "validation finished");

	if json {
		let rendered: Vec<_> = verdicts
			.iter()
			.map(|(file, verdict)| FileVerdict {
				file: file.clone(),
				verdict,
			})
			.collect();
		write_json(out, &rendered)?;
	} else {
		for (file, verdict) in &verdicts {
			writeln!(out, "{file}: {}", if verdict.valid { "valid" } else { "invalid" })?;
			for error in &verdict.errors {
				writeln!(out, "  error: {error}")?;
			}
			for warning in &verdict.warnings {
				writeln!(out, "  warning: {warning}")?;
			}
			for suggestion in &verdict.suggestions {
				writeln!(out, "  suggestion: {suggestion}")?;
			}
			writeln!(out, "  estimated size: {} MB", verdict.estimated_size_mb)?;
		}
	}

	Ok(if invalid > 0 { Outcome::Findings } else { Outcome::Success })
}

pub fn scan(config: &Config, dir: Option<&Path>, json: bool, out: &mut dyn Write) -> Result<Outcome> {
	let dir = dir.unwrap_or(&config.plots.dir);
	let batch = Scanner::new(config.policy.clone())
		.scan_dir(dir, &config.plots.template)
		.with_context(|| format!("cannot scan {}", dir.display()))?;

	if json {
		write_json(out, &batch)?;
	} else {
		render_scan(&batch, out)?;
	}

	Ok(if batch.has_issues() { Outcome::Findings } else { Outcome::Success })
}

fn render_scan(batch: &BatchScanReport, out: &mut dyn Write) -> Result<()> {
	if batch.files.is_empty() {
		writeln!(out, "No plot files found")?;
		return Ok(());
	}

	writeln!(out, "Scanning {} plot files", batch.files.len())?;
	for file in &batch.files {
		let report = &file.report;
		if !report.issues.is_empty() {
			writeln!(out, "{}: {} security issues", file.file, report.issues.len())?;
			for issue in &report.issues {
				writeln!(out, "  issue: {issue}")?;
			}
		}
		if !report.warnings.is_empty() {
			writeln!(out, "{}: {} warnings", file.file, report.warnings.len())?;
			for warning in &report.warnings {
				writeln!(out, "  warning: {warning}")?;
			}
		}
		if report.is_clean() {
			writeln!(out, "{}: no security issues found", file.file)?;
		}
	}
	writeln!(out, "Total security issues: {}", batch.total_issues)?;
	writeln!(out, "Total warnings: {}", batch.total_warnings)?;
	Ok(())
}

pub fn classify_agent(user_agent: &str, out: &mut dyn Write) -> Result<Outcome> {
	writeln!(out, "{}", is_ai_agent(user_agent))?;
	Ok(Outcome::Success)
}

#[cfg(test)]
mod tests;
