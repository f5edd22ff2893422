//! Document sources.
//!
//! A source enumerates raw plot documents, each paired with a label (for
//! file-backed sources, the file name) used in error messages. Sources never
//! parse: reading and decoding failures travel inside the document so the
//! consumer can report them per entry and carry on.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

/// File name skipped by directory sources; it documents the plot format rather
/// than claiming a plot.
pub const DEFAULT_TEMPLATE_FILE: &str = "agent_template.json";

/// Errors that prevent a source from being enumerated at all.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("plots directory not found: {}", path.display())]
	MissingDir { path: PathBuf },

	#[error("failed to read plots directory {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Payload of one enumerated document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentBody {
	/// Raw JSON text, not yet parsed.
	Text(String),
	/// An already-decoded document.
	Value(Value),
	/// The document could not be read; carries the cause.
	Unreadable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
	pub label: String,
	pub body: DocumentBody,
}

impl SourceDocument {
	pub fn text(label: impl Into<String>, text: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			body: DocumentBody::Text(text.into()),
		}
	}

	pub fn value(label: impl Into<String>, value: Value) -> Self {
		Self {
			label: label.into(),
			body: DocumentBody::Value(value),
		}
	}

	/// Decodes the body into a JSON value, returning the cause on failure.
	pub fn into_value(self) -> Result<Value, String> {
		match self.body {
			DocumentBody::Value(value) => Ok(value),
			DocumentBody::Text(text) => serde_json::from_str(&text).map_err(|e| e.to_string()),
			DocumentBody::Unreadable(cause) => Err(cause),
		}
	}
}

/// Anything that can enumerate plot documents in a stable order.
pub trait DocumentSource {
	fn documents(&self) -> Result<Box<dyn Iterator<Item = SourceDocument> + '_>, SourceError>;
}

/// Every `*.json` file directly inside a directory, ordered by file name.
#[derive(Debug, Clone)]
pub struct DirSource {
	dir: PathBuf,
	template: String,
}

impl DirSource {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self {
			dir: dir.into(),
			template: DEFAULT_TEMPLATE_FILE.to_string(),
		}
	}

	/// Overrides the sentinel template file name.
	pub fn with_template(mut self, template: impl Into<String>) -> Self {
		self.template = template.into();
		self
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}
}

impl DocumentSource for DirSource {
	fn documents(&self) -> Result<Box<dyn Iterator<Item = SourceDocument> + '_>, SourceError> {
		let files = list_plot_files(&self.dir, &self.template)?;
		Ok(Box::new(files.into_iter().map(|path| read_document(&path))))
	}
}

fn read_document(path: &Path) -> SourceDocument {
	let label = file_label(path);
	let body = match std::fs::read_to_string(path) {
		Ok(text) => DocumentBody::Text(text),
		Err(error) => {
			warn!(path = %path.display(), %error, "unreadable plot file");
			DocumentBody::Unreadable(error.to_string())
		}
	};
	SourceDocument { label, body }
}

/// File name of `path` for use in messages.
pub fn file_label(path: &Path) -> String {
	path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| path.display().to_string())
}

/// Lists plot files in `dir`: regular `*.json` files except `template`,
/// sorted by file name.
pub fn list_plot_files(dir: &Path, template: &str) -> Result<Vec<PathBuf>, SourceError> {
	if !dir.is_dir() {
		return Err(SourceError::MissingDir { path: dir.to_path_buf() });
	}
	let io_err = |source: std::io::Error| SourceError::Io {
		path: dir.to_path_buf(),
		source,
	};

	let mut files = Vec::new();
	for entry in std::fs::read_dir(dir).map_err(io_err)? {
		let path = entry.map_err(io_err)?.path();
		let is_json = path.extension().is_some_and(|ext| ext == "json");
		let is_template = path.file_name().is_some_and(|name| name == template);
		if is_json && !is_template && path.is_file() {
			files.push(path);
		}
	}
	files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
	Ok(files)
}

/// An ordered in-memory list of documents.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
	docs: Vec<SourceDocument>,
}

impl MemorySource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, doc: SourceDocument) {
		self.docs.push(doc);
	}

	pub fn len(&self) -> usize {
		self.docs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.docs.is_empty()
	}
}

impl FromIterator<SourceDocument> for MemorySource {
	fn from_iter<I: IntoIterator<Item = SourceDocument>>(iter: I) -> Self {
		Self { docs: iter.into_iter().collect() }
	}
}

impl<L: Into<String>> FromIterator<(L, Value)> for MemorySource {
	fn from_iter<I: IntoIterator<Item = (L, Value)>>(iter: I) -> Self {
		iter.into_iter().map(|(label, value)| SourceDocument::value(label, value)).collect()
	}
}

impl DocumentSource for MemorySource {
	fn documents(&self) -> Result<Box<dyn Iterator<Item = SourceDocument> + '_>, SourceError> {
		Ok(Box::new(self.docs.iter().cloned()))
	}
}

#[cfg(test)]
mod tests;
