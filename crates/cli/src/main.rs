//! `plotgrid` binary.
//!
//! Thin front end over the library crates:
//! - `list` / `get`: load the plots directory into a registry snapshot
//! - `validate`: run the content policy over submitted documents
//! - `scan`: security-lint every plot file in a directory
//! - `classify-agent`: user-agent classification
//!
//! Exit codes: 0 success, 1 findings (invalid document or security issue),
//! 2 plot not found. Operational failures print the error chain and exit 1.

mod cli;
mod commands;
mod config;
mod logging;

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use crate::cli::{Args, Command};
use crate::config::{Config, PLOTS_DIR_ENV};

fn main() -> anyhow::Result<ExitCode> {
	let args = Args::parse();
	logging::setup_tracing(args.verbose);

	let cwd = std::env::current_dir().context("cannot determine current directory")?;
	let mut config = Config::resolve(args.config.as_deref(), &cwd)?;
	config.apply_overrides(std::env::var_os(PLOTS_DIR_ENV).map(Into::into), args.plots_dir.clone());
	debug!(plots_dir = %config.plots.dir.display(), "configuration resolved");

	let stdout = std::io::stdout();
	let mut out = stdout.lock();
	let code = match args.command {
		Command::List { json } => commands::list(&config, json, &mut out)?,
		Command::Get { id, json } => commands::get(&config, &id, json, &mut out)?,
		Command::Validate { files, json } => commands::validate(&config, &files, json, &mut out)?,
		Command::Scan { dir, json } => commands::scan(&config, dir.as_deref(), json, &mut out)?,
		Command::ClassifyAgent { user_agent } => commands::classify_agent(&user_agent, &mut out)?,
	};
	out.flush()?;
	Ok(code.into())
}
