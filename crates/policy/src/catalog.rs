//! Dangerous-pattern catalog and URL screening shared by the validator and the scanner.
//!
//! Each signature is compiled once. A pattern belongs to any number of
//! tables: the per-language tables the scanner reports against, and the
//! admission table the validator applies to every code block regardless of
//! language.

use std::fmt;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::warn;
use url::Url;

/// Languages with their own pattern table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeLanguage {
	JavaScript,
	Python,
	Glsl,
}

impl CodeLanguage {
	pub const ALL: [CodeLanguage; 3] = [Self::JavaScript, Self::Python, Self::Glsl];

	/// Resolves a `visualization.code` key. Keys are matched exactly.
	pub fn from_key(key: &str) -> Option<Self> {
		match key {
			"javascript" => Some(Self::JavaScript),
			"python" => Some(Self::Python),
			"glsl" => Some(Self::Glsl),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::JavaScript => "javascript",
			Self::Python => "python",
			Self::Glsl => "glsl",
		}
	}
}

impl fmt::Display for CodeLanguage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A case-insensitive signature for a risky construct in embedded code.
#[derive(Debug)]
pub struct DangerousPattern {
	/// Broad family, e.g. `dynamic evaluation`.
	pub class: &'static str,
	/// Regex source the pattern is compiled from.
	pub signature: &'static str,
	/// Operator-facing description used in scan reports.
	pub description: &'static str,
	regex: Regex,
}

impl DangerousPattern {
	pub fn is_match(&self, code: &str) -> bool {
		self.regex.is_match(code)
	}
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Table {
	Lang(CodeLanguage),
	Admission,
}

use CodeLanguage::{Glsl, JavaScript, Python};
use Table::{Admission, Lang};

const ENTRIES: &[(&str, &str, &str, &[Table])] = &[
	(r"eval\s*\(", "dynamic evaluation", "Use of eval() function", &[Lang(JavaScript), Lang(Python), Admission]),
	(r"Function\s*\(", "dynamic evaluation", "Dynamic function creation", &[Lang(JavaScript), Admission]),
	(r"document\.write", "document mutation", "Use of document.write", &[Lang(JavaScript), Admission]),
	(r"innerHTML\s*=", "document mutation", "Direct innerHTML assignment", &[Lang(JavaScript), Admission]),
	(r"outerHTML\s*=", "document mutation", "Direct outerHTML assignment", &[Lang(JavaScript), Admission]),
	(r"window\.location", "location redirection", "Window location manipulation", &[Lang(JavaScript), Admission]),
	(r"window\.open", "window creation", "Opening new windows", &[Lang(JavaScript)]),
	(r"XMLHttpRequest", "network access", "Direct XHR usage", &[Lang(JavaScript)]),
	(r"fetch\s*\(", "network access", "Network requests", &[Lang(JavaScript)]),
	(r"import\s*\(", "dynamic import", "Dynamic imports", &[Lang(JavaScript)]),
	(r"require\s*\(", "dynamic import", "CommonJS requires", &[Lang(JavaScript)]),
	(r"exec\s*\(", "dynamic evaluation", "Use of exec() function", &[Lang(Python), Admission]),
	(r"__import__", "dynamic import", "Dynamic imports", &[Lang(Python), Admission]),
	(r"importlib", "dynamic import", "Import library usage", &[Lang(Python), Admission]),
	(r"subprocess", "process execution", "Subprocess execution", &[Lang(Python), Admission]),
	(r"os\.system", "process execution", "OS system calls", &[Lang(Python), Admission]),
	(r"os\.popen", "process execution", "OS popen calls", &[Lang(Python)]),
	(r"open\s*\(", "file access", "File operations", &[Lang(Python)]),
	(r"input\s*\(", "user input", "User input", &[Lang(Python)]),
	(r"raw_input\s*\(", "user input", "Raw user input", &[Lang(Python)]),
	(r"texture\s*\(", "texture access", "Texture sampling", &[Lang(Glsl)]),
	(r"uniform\s+sampler", "texture access", "Texture uniforms", &[Lang(Glsl)]),
];

/// Compiled pattern tables. Obtain the shared instance with [`catalog`].
#[derive(Debug)]
pub struct PatternCatalog {
	patterns: Vec<DangerousPattern>,
	javascript: Vec<usize>,
	python: Vec<usize>,
	glsl: Vec<usize>,
	admission: Vec<usize>,
}

static CATALOG: LazyLock<PatternCatalog> = LazyLock::new(PatternCatalog::build);

/// The process-wide catalog, compiled on first use.
pub fn catalog() -> &'static PatternCatalog {
	&CATALOG
}

impl PatternCatalog {
	fn build() -> Self {
		let mut catalog = Self {
			patterns: Vec::with_capacity(ENTRIES.len()),
			javascript: Vec::new(),
			python: Vec::new(),
			glsl: Vec::new(),
			admission: Vec::new(),
		};

		for &(signature, class, description, tables) in ENTRIES {
			let regex = match RegexBuilder::new(signature).case_insensitive(true).build() {
				Ok(regex) => regex,
				Err(e) => {
					warn!(signature, error = %e, "Invalid dangerous-pattern signature");
					continue;
				}
			};
			let idx = catalog.patterns.len();
			catalog.patterns.push(DangerousPattern {
				class,
				signature,
				description,
				regex,
			});
			for table in tables {
				match table {
					Lang(JavaScript) => catalog.javascript.push(idx),
					Lang(Python) => catalog.python.push(idx),
					Lang(Glsl) => catalog.glsl.push(idx),
					Admission => catalog.admission.push(idx),
				}
			}
		}

		catalog
	}

	/// Every compiled pattern, each listed once.
	pub fn patterns(&self) -> &[DangerousPattern] {
		&self.patterns
	}

	/// Patterns the scanner reports for `lang`, in table order.
	pub fn language(&self, lang: CodeLanguage) -> impl Iterator<Item = &DangerousPattern> + '_ {
		let table = match lang {
			JavaScript => &self.javascript,
			Python => &self.python,
			Glsl => &self.glsl,
		};
		table.iter().map(|&i| &self.patterns[i])
	}

	/// Patterns the validator rejects in any code block, in table order.
	pub fn admission(&self) -> impl Iterator<Item = &DangerousPattern> + '_ {
		self.admission.iter().map(|&i| &self.patterns[i])
	}
}

/// Kinds of suspicious reference found in serialized document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlKind {
	/// `http(s)` URL whose host is not allow-listed.
	External,
	/// `data:` URL that is not an image.
	NonImageData,
	JavaScript,
	VbScript,
	File,
	Ftp,
}

impl UrlKind {
	/// Every kind, in report order.
	pub const ALL: [UrlKind; 6] = [Self::External, Self::NonImageData, Self::JavaScript, Self::VbScript, Self::File, Self::Ftp];

	/// The kinds the validator warns about.
	pub const ADMISSION: [UrlKind; 4] = [Self::External, Self::NonImageData, Self::JavaScript, Self::VbScript];

	pub fn description(self) -> &'static str {
		match self {
			Self::External => "External URL",
			Self::NonImageData => "Non-image data URL",
			Self::JavaScript => "JavaScript URL",
			Self::VbScript => "VBScript URL",
			Self::File => "File URL",
			Self::Ftp => "FTP URL",
		}
	}

	fn token_pattern(self) -> &'static str {
		match self {
			Self::External => r#"(?i)https?://[^\s"'<>\\]*"#,
			Self::NonImageData => r#"(?i)data:[^\s"'<>\\]*"#,
			Self::JavaScript => r#"(?i)javascript:[^\s"'<>\\]*"#,
			Self::VbScript => r#"(?i)vbscript:[^\s"'<>\\]*"#,
			Self::File => r#"(?i)file://[^\s"'<>\\]*"#,
			Self::Ftp => r#"(?i)ftp://[^\s"'<>\\]*"#,
		}
	}
}

impl fmt::Display for UrlKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.description())
	}
}

static URL_TOKENS: LazyLock<Vec<(UrlKind, Regex)>> = LazyLock::new(|| {
	UrlKind::ALL
		.into_iter()
		.filter_map(|kind| match Regex::new(kind.token_pattern()) {
			Ok(re) => Some((kind, re)),
			Err(e) => {
				warn!(kind = kind.description(), error = %e, "Invalid URL token pattern");
				None
			}
		})
		.collect()
});

/// First offending reference of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlFinding {
	pub kind: UrlKind,
	pub first_match: String,
}

/// Flags suspicious references in document text.
///
/// `http(s)` URLs pass when their parsed host is `localhost`, `127.0.0.1`,
/// the platform domain, or a subdomain of it. A URL that does not parse is
/// treated as external.
#[derive(Debug, Clone)]
pub struct UrlScreen {
	platform_domain: String,
}

impl UrlScreen {
	pub fn new(platform_domain: impl Into<String>) -> Self {
		Self {
			platform_domain: platform_domain.into().to_ascii_lowercase(),
		}
	}

	pub fn platform_domain(&self) -> &str {
		&self.platform_domain
	}

	pub fn is_allowed_host(&self, host: &str) -> bool {
		let host = host.to_ascii_lowercase();
		if host == "localhost" || host == "127.0.0.1" {
			return true;
		}
		!self.platform_domain.is_empty()
			&& (host == self.platform_domain || host.strip_suffix(&self.platform_domain).is_some_and(|rest| rest.ends_with('.')))
	}

	/// One finding per requested kind that occurs in `text`, in `kinds` order.
	pub fn screen(&self, text: &str, kinds: &[UrlKind]) -> Vec<UrlFinding> {
		kinds
			.iter()
			.filter_map(|&kind| {
				let (_, re) = URL_TOKENS.iter().find(|(k, _)| *k == kind)?;
				let first = re.find_iter(text).map(|m| m.as_str()).find(|token| self.is_suspicious(kind, token))?;
				Some(UrlFinding {
					kind,
					first_match: first.to_string(),
				})
			})
			.collect()
	}

	fn is_suspicious(&self, kind: UrlKind, token: &str) -> bool {
		match kind {
			UrlKind::External => match Url::parse(token) {
				Ok(url) => !url.host_str().is_some_and(|host| self.is_allowed_host(host)),
				Err(_) => true,
			},
			UrlKind::NonImageData => !token.get(5..11).is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/")),
			_ => true,
		}
	}
}
