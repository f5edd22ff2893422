use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Plot registry command line arguments.
#[derive(Parser, Debug)]
#[command(name = "plotgrid")]
#[command(about = "Plot registry, content policy and security scanner", version)]
pub struct Args {
	/// Configuration file (defaults to ./plotgrid.toml when present)
	#[arg(short, long, value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Plots directory, overriding config and PLOTGRID_PLOTS_DIR
	#[arg(long, value_name = "DIR", global = true)]
	pub plots_dir: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// List admitted plots and load errors
	List {
		/// Emit `{records, errors}` as JSON
		#[arg(long)]
		json: bool,
	},

	/// Look up one plot by id, falling back to display name
	Get {
		id: String,

		#[arg(long)]
		json: bool,
	},

	/// Validate plot documents against the content policy
	Validate {
		#[arg(required = true, value_name = "FILE")]
		files: Vec<PathBuf>,

		#[arg(long)]
		json: bool,
	},

	/// Security-scan every plot file in a directory
	Scan {
		/// Directory to scan (defaults to the plots directory)
		#[arg(value_name = "DIR")]
		dir: Option<PathBuf>,

		#[arg(long)]
		json: bool,
	},

	/// Report whether a user agent looks like an AI agent or automation client
	ClassifyAgent {
		#[arg(value_name = "USER_AGENT")]
		user_agent: String,
	},
}
