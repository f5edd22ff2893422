//! `plotgrid.toml` loading.
//!
//! Precedence for the plots directory, lowest first: built-in default,
//! config file, `PLOTGRID_PLOTS_DIR`, `--plots-dir`. Relative directories
//! resolve against the working directory.

use std::path::{Path, PathBuf};

use plotgrid_model::DEFAULT_TEMPLATE_FILE;
use plotgrid_policy::PolicyLimits;
use plotgrid_registry::LoadOptions;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "plotgrid.toml";

pub const PLOTS_DIR_ENV: &str = "PLOTGRID_PLOTS_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("I/O error reading {path}: {error}")]
	Io { path: PathBuf, error: std::io::Error },

	#[error("invalid config {path}: {error}")]
	Parse { path: PathBuf, error: toml::de::Error },
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub plots: PlotsConfig,
	pub registry: LoadOptions,
	pub policy: PolicyLimits,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotsConfig {
	pub dir: PathBuf,
	/// File name skipped by directory scans.
	pub template: String,
}

impl Default for PlotsConfig {
	fn default() -> Self {
		Self {
			dir: PathBuf::from("plots"),
			template: DEFAULT_TEMPLATE_FILE.to_string(),
		}
	}
}

impl Config {
	pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
		toml::from_str(text)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io { path: path.to_path_buf(), error })?;
		Self::from_toml(&text).map_err(|error| ConfigError::Parse { path: path.to_path_buf(), error })
	}

	/// Loads `explicit` if given, else `cwd/plotgrid.toml` if present, else defaults.
	pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
		if let Some(path) = explicit {
			return Self::load(path);
		}
		let implicit = cwd.join(CONFIG_FILE);
		if implicit.is_file() {
			debug!(path = %implicit.display(), "using config from working directory");
			return Self::load(&implicit);
		}
		Ok(Self::default())
	}

	/// Applies the environment override, then the command line override.
	pub fn apply_overrides(&mut self, env_dir: Option<PathBuf>, flag_dir: Option<PathBuf>) {
		if let Some(dir) = flag_dir.or(env_dir) {
			self.plots.dir = dir;
		}
	}
}

#[cfg(test)]
mod tests;
