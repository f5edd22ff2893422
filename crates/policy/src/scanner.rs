//! Lint-only security scan over plot files.
//!
//! Findings are split into `issues` (a dangerous pattern in a recognized
//! language) and `warnings` (suspicious URLs, oversized code or resources,
//! noisy metadata). The scanner never decides validity; callers decide what
//! an issue means. The batch driver reports every file and lets the caller
//! exit non-zero when [`BatchScanReport::has_issues`].

use std::fs;
use std::path::{Path, PathBuf};

use plotgrid_model::{SourceError, file_label, list_plot_files};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, info_span};

use crate::catalog::{CodeLanguage, UrlKind, UrlScreen, catalog};
use crate::limits::PolicyLimits;

const MAX_COORDINATE: f64 = 10_000.0;
const MAX_DIMENSION: f64 = 1_000.0;
const MAX_TAGS: usize = 50;
const MAX_CONTACT_CHARS: usize = 500;

const COORDINATE_AXES: [&str; 3] = ["x", "y", "z"];
const SIZE_DIMENSIONS: [&str; 3] = ["width", "height", "depth"];

#[derive(Debug, Error)]
pub enum ScanError {
	#[error("cannot list plots: {0}")]
	Listing(#[from] SourceError),
}

/// Findings for one document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ScanReport {
	pub issues: Vec<String>,
	pub warnings: Vec<String>,
}

impl ScanReport {
	fn failed(cause: impl std::fmt::Display) -> Self {
		Self {
			issues: vec![format!("Failed to read plot: {cause}")],
			warnings: Vec::new(),
		}
	}

	pub fn is_clean(&self) -> bool {
		self.issues.is_empty() && self.warnings.is_empty()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileScanReport {
	pub file: String,
	#[serde(skip)]
	pub path: PathBuf,
	#[serde(flatten)]
	pub report: ScanReport,
}

/// Per-file reports in file-name order plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BatchScanReport {
	pub files: Vec<FileScanReport>,
	pub total_issues: usize,
	pub total_warnings: usize,
}

impl BatchScanReport {
	pub fn has_issues(&self) -> bool {
		self.total_issues > 0
	}
}

#[derive(Debug, Clone)]
pub struct Scanner {
	limits: PolicyLimits,
	screen: UrlScreen,
}

impl Default for Scanner {
	fn default() -> Self {
		Self::new(PolicyLimits::default())
	}
}

impl Scanner {
	pub fn new(limits: PolicyLimits) -> Self {
		let screen = UrlScreen::new(limits.platform_domain.clone());
		Self { limits, screen }
	}

	/// Scans every plot file in `dir`, skipping `template`.
	pub fn scan_dir(&self, dir: &Path, template: &str) -> Result<BatchScanReport, ScanError> {
		let _span = info_span!("plot_scan", dir = %dir.display()).entered();
		let mut batch = BatchScanReport::default();

		for path in list_plot_files(dir, template)? {
			let report = self.scan_file(&path);
			debug!(file = %path.display(), issues = report.issues.len(), warnings = report.warnings.len(), "scanned plot");
			batch.total_issues += report.issues.len();
			batch.total_warnings += report.warnings.len();
			batch.files.push(FileScanReport {
				file: file_label(&path),
				path,
				report,
			});
		}

		info!(files = batch.files.len(), issues = batch.total_issues, warnings = batch.total_warnings, "plot scan finished");
		Ok(batch)
	}

	/// Scans one file. Unreadable or unparsable files yield a single issue.
	pub fn scan_file(&self, path: &Path) -> ScanReport {
		let text = match fs::read_to_string(path) {
			Ok(text) => text,
			Err(e) => return ScanReport::failed(e),
		};
		match serde_json::from_str::<Value>(&text) {
			Ok(doc) => self.scan(&doc),
			Err(e) => ScanReport::failed(e),
		}
	}

	pub fn scan(&self, doc: &Value) -> ScanReport {
		let Some(map) = doc.as_object() else {
			return ScanReport::failed("document root must be a JSON object");
		};
		let mut report = ScanReport::default();

		self.code(map, &mut report);
		for finding in self.screen.screen(&doc.to_string(), &UrlKind::ALL) {
			report.warnings.push(format!("Suspicious URL: {} - {}", finding.kind, finding.first_match));
		}
		self.resources(map, &mut report);
		metadata(map, &mut report);

		report
	}

	fn code(&self, doc: &Map<String, Value>, report: &mut ScanReport) {
		let Some(code) = doc.get("visualization").and_then(|viz| viz.get("code")).and_then(Value::as_object) else {
			return;
		};

		for (lang, source) in code {
			let Some(source) = source.as_str() else {
				continue;
			};

			let chars = source.chars().count();
			if chars > self.limits.max_code_chars {
				report.warnings.push(format!("Large {lang} code section: {chars} chars"));
			}

			if let Some(language) = CodeLanguage::from_key(lang) {
				for pattern in catalog().language(language).filter(|p| p.is_match(source)) {
					report.issues.push(format!("Dangerous {lang} pattern: {}", pattern.description));
				}
			}
		}
	}

	fn resources(&self, doc: &Map<String, Value>, report: &mut ScanReport) {
		for (axis, value) in named_numbers(doc.get("coordinates"), &COORDINATE_AXES) {
			if value.as_f64().is_some_and(|v| v.abs() > MAX_COORDINATE) {
				report.warnings.push(format!("Very large coordinate: {axis}={value}"));
			}
		}

		for (dim, value) in named_numbers(doc.get("size"), &SIZE_DIMENSIONS) {
			if value.as_f64().is_some_and(|v| v > MAX_DIMENSION) {
				report.warnings.push(format!("Very large dimension: {dim}={value}"));
			}
		}

		let particles = doc.get("visualization").and_then(|viz| viz.get("style")).and_then(|style| style.get("particle_count"));
		if let Some(count) = particles.and_then(Value::as_u64)
			&& count > self.limits.max_particle_count
		{
			report.warnings.push(format!("Very high particle count: {count}"));
		}
	}
}

fn metadata(doc: &Map<String, Value>, report: &mut ScanReport) {
	let Some(metadata) = doc.get("metadata").and_then(Value::as_object) else {
		return;
	};

	if let Some(tags) = metadata.get("tags").and_then(Value::as_array)
		&& tags.len() > MAX_TAGS
	{
		report.warnings.push(format!("Excessive number of tags: {}", tags.len()));
	}

	if let Some(contact) = metadata.get("contact").and_then(Value::as_object) {
		for (field, value) in contact {
			if let Some(chars) = value.as_str().map(|s| s.chars().count())
				&& chars > MAX_CONTACT_CHARS
			{
				report.warnings.push(format!("Very long contact {field}: {chars} chars"));
			}
		}
	}
}

/// Numeric entries of an object, or of an array named positionally by `names`.
fn named_numbers<'a>(value: Option<&'a Value>, names: &'a [&'a str]) -> Vec<(&'a str, &'a serde_json::Number)> {
	match value {
		Some(Value::Object(map)) => map
			.iter()
			.filter_map(|(k, v)| match v {
				Value::Number(n) => Some((k.as_str(), n)),
				_ => None,
			})
			.collect(),
		Some(Value::Array(items)) => names
			.iter()
			.zip(items)
			.filter_map(|(name, v)| match v {
				Value::Number(n) => Some((*name, n)),
				_ => None,
			})
			.collect(),
		_ => Vec::new(),
	}
}

#[cfg(test)]
mod tests;
