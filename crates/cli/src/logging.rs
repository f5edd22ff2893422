use std::fs::OpenOptions;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;

/// Directory that redirects logs to `plotgrid.<pid>.log` instead of stderr.
pub const LOG_DIR_ENV: &str = "PLOTGRID_LOG_DIR";

/// Installs the global subscriber. `RUST_LOG` wins over `verbose`.
pub fn setup_tracing(verbose: bool) {
	let filter = || {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("plotgrid=debug,plotgrid_registry=debug,plotgrid_policy=debug,plotgrid_model=debug,warn")
			} else {
				EnvFilter::new("plotgrid=info,plotgrid_registry=info,plotgrid_policy=info,plotgrid_model=info,warn")
			}
		})
	};

	if let Some(log_dir) = std::env::var_os(LOG_DIR_ENV).map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("plotgrid.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_span_events(FmtSpan::CLOSE)
				.with_target(true);

			tracing_subscriber::registry().with(filter()).with(file_layer).init();

			tracing::info!(path = ?log_path, "tracing initialized");
			return;
		}
	}

	tracing_subscriber::registry()
		.with(filter())
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();
}
