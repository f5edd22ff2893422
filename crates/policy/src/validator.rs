//! Admission validation for submitted plot documents.
//!
//! # Passes
//!
//! [`Validator::validate`] runs the passes in a fixed order, each appending
//! to the same verdict. A pass never stops later passes; `valid` is decided
//! once at the end from the error list alone.
//!
//! 1. Structure: required fields, name, coordinates, description, dimensions.
//! 2. Content: renderer, visualization type, geometry, code container.
//! 3. Embedded code: admission patterns, block size, well-formedness.
//! 4. Performance: particle count, animation complexity.
//! 5. URLs: suspicious references anywhere in the serialized document.
//! 6. Agent compatibility: agent id, suggestions.
//!
//! # Containment
//!
//! A non-object root, or a panic inside any pass, yields one
//! `Validation failed: ..` error and `valid = false`. Passes after the fault
//! and the size estimate are skipped. The caller always gets a verdict.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use plotgrid_model::{Renderer, VisualizationKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::catalog::{CodeLanguage, UrlKind, UrlScreen, catalog};
use crate::limits::PolicyLimits;
use crate::syntax::{check_python, js_balance};

/// Top-level fields a submitted plot must carry, in report order.
const REQUIRED_FIELDS: [&str; 6] = ["name", "description", "agent_id", "coordinates", "size", "visualization"];

const KNOWN_GEOMETRIES: [&str; 5] = ["cube", "sphere", "cylinder", "plane", "custom"];

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Outcome of validating one document.
///
/// Serializes with exactly the keys `valid`, `errors`, `warnings`,
/// `estimated_size_mb`, `suggestions`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationVerdict {
	pub valid: bool,
	pub errors: Vec<String>,
	pub warnings: Vec<String>,
	pub estimated_size_mb: f64,
	pub suggestions: Vec<String>,
}

impl ValidationVerdict {
	fn failed(message: impl std::fmt::Display) -> Self {
		Self {
			errors: vec![format!("Validation failed: {message}")],
			..Self::default()
		}
	}
}

/// Document under validation, serialized once for the passes that scan text.
struct Subject<'a> {
	doc: &'a Map<String, Value>,
	text: &'a str,
}

impl Subject<'_> {
	fn visualization(&self) -> Option<&Map<String, Value>> {
		self.doc.get("visualization").and_then(Value::as_object)
	}

	fn style(&self) -> Option<&Map<String, Value>> {
		self.visualization()?.get("style").and_then(Value::as_object)
	}
}

type Pass = fn(&Validator, &Subject<'_>, &mut ValidationVerdict);

const PASSES: &[(&str, Pass)] = &[
	("structure", Validator::structure),
	("content", Validator::content),
	("performance", Validator::performance),
	("urls", Validator::urls),
	("agent", Validator::agent),
];

/// Content-policy gate. Cheap to construct; holds only thresholds.
#[derive(Debug, Clone)]
pub struct Validator {
	limits: PolicyLimits,
	screen: UrlScreen,
}

impl Default for Validator {
	fn default() -> Self {
		Self::new(PolicyLimits::default())
	}
}

impl Validator {
	pub fn new(limits: PolicyLimits) -> Self {
		let screen = UrlScreen::new(limits.platform_domain.clone());
		Self { limits, screen }
	}

	pub fn limits(&self) -> &PolicyLimits {
		&self.limits
	}

	/// Validates one parsed document. Never fails and never panics out.
	pub fn validate(&self, doc: &Value) -> ValidationVerdict {
		self.run(doc, PASSES)
	}

	fn run(&self, doc: &Value, passes: &[(&str, Pass)]) -> ValidationVerdict {
		let Some(map) = doc.as_object() else {
			return ValidationVerdict::failed("document root must be a JSON object");
		};

		let text = doc.to_string();
		let subject = Subject { doc: map, text: &text };
		let mut verdict = ValidationVerdict::default();

		let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
			for (name, pass) in passes {
				pass(self, &subject, &mut verdict);
				debug!(pass = *name, errors = verdict.errors.len(), warnings = verdict.warnings.len(), "validation pass done");
			}
			estimate_size(&subject)
		}));

		match outcome {
			Ok(size) => {
				verdict.estimated_size_mb = size;
				if size > self.limits.max_plot_size_mb {
					verdict.warnings.push(format!("Estimated plot size {size} MB exceeds limit of {} MB", self.limits.max_plot_size_mb));
				}
				verdict.valid = verdict.errors.is_empty();
			}
			Err(payload) => {
				let message = panic_message(payload.as_ref());
				warn!(%message, "validation pass panicked");
				verdict.errors.push(format!("Validation failed: {message}"));
				verdict.valid = false;
				verdict.estimated_size_mb = 0.0;
			}
		}
		verdict
	}

	fn structure(&self, s: &Subject<'_>, v: &mut ValidationVerdict) {
		for field in REQUIRED_FIELDS {
			if !s.doc.contains_key(field) {
				v.errors.push(format!("Missing required field: {field}"));
			}
		}

		if let Some(name) = s.doc.get("name") {
			match name.as_str() {
				Some(n) if (3..=100).contains(&n.chars().count()) => {
					if !n.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c.is_whitespace()) {
						v.errors.push("Name contains invalid characters".into());
					}
				}
				_ => v.errors.push("Name must be a string between 3 and 100 characters".into()),
			}
		}

		if let Some(desc) = s.doc.get("description").and_then(Value::as_str)
			&& desc.chars().count() > 1000
		{
			v.errors.push("Description must be at most 1000 characters".into());
		}

		if let Some(coords) = s.doc.get("coordinates") {
			match coords.as_object() {
				None => v.errors.push("Coordinates must be an object".into()),
				Some(coords) => {
					for axis in ["x", "y", "z"] {
						match coords.get(axis) {
							None => v.errors.push(format!("Missing coordinate: {axis}")),
							Some(value) if !value.is_number() => v.errors.push(format!("Coordinate {axis} must be a number")),
							Some(_) => {}
						}
					}
				}
			}
		}

		if let Some(dims) = s.doc.get("dimensions")
			&& !dims.as_u64().is_some_and(|d| (1..=10).contains(&d))
		{
			v.errors.push("Dimensions must be an integer between 1 and 10".into());
		}

		if s.doc.get("visualization").is_some_and(|viz| !viz.is_object()) {
			v.errors.push("Visualization must be an object".into());
		}
	}

	fn content(&self, s: &Subject<'_>, v: &mut ValidationVerdict) {
		let Some(viz) = s.visualization() else {
			return;
		};

		if let Some(renderer) = viz.get("renderer")
			&& !renderer.as_str().is_some_and(|r| Renderer::from(r).is_supported())
		{
			v.errors.push(format!("Unsupported renderer: {}", display(renderer)));
		}

		if let Some(kind) = viz.get("type")
			&& !kind.as_str().is_some_and(|k| VisualizationKind::from(k).is_supported())
		{
			v.warnings.push(format!("Unusual visualization type: {}", display(kind)));
		}

		if let Some(geometry) = s.style().and_then(|style| style.get("geometry"))
			&& !geometry.as_str().is_some_and(|g| KNOWN_GEOMETRIES.contains(&g))
		{
			v.warnings.push(format!("Unusual geometry type: {}", display(geometry)));
		}

		if let Some(code) = viz.get("code") {
			match code.as_object() {
				Some(code) => self.code(code, v),
				None => v.errors.push("Code must be an object mapping language to source".into()),
			}
		}
	}

	fn code(&self, code: &Map<String, Value>, v: &mut ValidationVerdict) {
		for (lang, source) in code {
			let Some(source) = source.as_str() else {
				v.errors.push(format!("Code for {lang} must be a string"));
				continue;
			};

			for pattern in catalog().admission().filter(|p| p.is_match(source)) {
				v.errors.push(format!("Potentially dangerous code pattern found in {lang}: {} ({})", pattern.class, pattern.signature));
			}

			let chars = source.chars().count();
			if chars > self.limits.max_code_chars {
				v.warnings.push(format!("Code section for {lang} is very large ({chars} chars)"));
			}

			match CodeLanguage::from_key(lang) {
				Some(CodeLanguage::JavaScript) => {
					let balance = js_balance(source);
					if !balance.braces {
						v.warnings.push("JavaScript: Mismatched braces".into());
					}
					if !balance.parens {
						v.warnings.push("JavaScript: Mismatched parentheses".into());
					}
				}
				Some(CodeLanguage::Python) => {
					if let Err(e) = check_python(source) {
						v.errors.push(format!("Python syntax error: {e}"));
					}
				}
				_ => {}
			}
		}
	}

	fn performance(&self, s: &Subject<'_>, v: &mut ValidationVerdict) {
		if let Some(count) = s.style().and_then(|style| style.get("particle_count")).and_then(integer) {
			if count > i128::from(self.limits.max_particle_count) {
				v.errors.push(format!("Particle count exceeds maximum limit ({})", thousands(self.limits.max_particle_count)));
			} else if count > i128::from(self.limits.warn_particle_count) {
				v.warnings.push("High particle count may impact performance".into());
			}
		}

		if let Some(animation) = s.visualization().and_then(|viz| viz.get("animation")).and_then(Value::as_object)
			&& animation.len() > self.limits.max_animation_keys
		{
			v.warnings.push("Complex animations may impact performance".into());
		}
	}

	fn urls(&self, s: &Subject<'_>, v: &mut ValidationVerdict) {
		for finding in self.screen.screen(s.text, &UrlKind::ADMISSION) {
			v.warnings.push(format!("Potentially suspicious content: {} ({})", finding.kind, finding.first_match));
		}
	}

	fn agent(&self, s: &Subject<'_>, v: &mut ValidationVerdict) {
		if let Some(agent) = s.doc.get("agent_id")
			&& !agent.as_str().is_some_and(|a| a.chars().count() >= 3)
		{
			v.errors.push("Agent ID must be a valid string".into());
		}

		if s.doc.get("interactions").is_none_or(is_empty) {
			v.suggestions.push("Consider adding interaction definitions for better AI engagement".into());
		}
		if s.doc.get("metadata").is_none_or(is_empty) {
			v.suggestions.push("Consider adding metadata for better discoverability".into());
		}

		if let Some(color) = s.style().and_then(|style| style.get("color")).and_then(Value::as_str)
			&& color.starts_with('#')
			&& !matches!(color.chars().count(), 4 | 7)
		{
			v.suggestions.push("Consider using more accessible colors".into());
		}
	}
}

/// Compact JSON bytes plus the bytes of every string code block, in MB to 3 decimals.
///
/// Code is counted twice: inline in the document and again as a bundled asset.
fn estimate_size(s: &Subject<'_>) -> f64 {
	let code_bytes: usize = s
		.visualization()
		.and_then(|viz| viz.get("code"))
		.and_then(Value::as_object)
		.map(|code| code.values().filter_map(Value::as_str).map(str::len).sum())
		.unwrap_or(0);
	let bytes = s.text.len() + code_bytes;
	(bytes as f64 / BYTES_PER_MB * 1000.0).round() / 1000.0
}

/// Integer JSON numbers only; floats and other types are ignored.
fn integer(value: &Value) -> Option<i128> {
	value.as_i64().map(i128::from).or_else(|| value.as_u64().map(i128::from))
}

/// Null, false, zero and empty containers or strings.
fn is_empty(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(b) => !b,
		Value::Number(n) => n.as_f64() == Some(0.0),
		Value::String(s) => s.is_empty(),
		Value::Array(a) => a.is_empty(),
		Value::Object(o) => o.is_empty(),
	}
}

/// Strings verbatim, anything else as JSON.
fn display(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

fn thousands(n: u64) -> String {
	let digits = n.to_string();
	let mut out = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, c) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			out.push(',');
		}
		out.push(c);
	}
	out
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		(*s).to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"internal error".to_string()
	}
}
