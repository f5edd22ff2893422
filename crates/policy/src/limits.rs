use serde::{Deserialize, Serialize};

/// Thresholds applied by the validator and the scanner.
///
/// Deserializes from the `[policy]` table of `plotgrid.toml`; absent keys
/// keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyLimits {
	/// Characters per code block before it is flagged as large.
	pub max_code_chars: usize,
	/// Particle count above which a plot is rejected.
	pub max_particle_count: u64,
	/// Particle count above which a plot is flagged.
	pub warn_particle_count: u64,
	/// Animation keys above which a plot is flagged.
	pub max_animation_keys: usize,
	/// Estimated size above which a plot is rejected.
	pub max_plot_size_mb: f64,
	/// Domain whose URLs (and subdomains) are never flagged as external.
	pub platform_domain: String,
}

impl Default for PolicyLimits {
	fn default() -> Self {
		Self {
			max_code_chars: 50_000,
			max_particle_count: 50_000,
			warn_particle_count: 10_000,
			max_animation_keys: 10,
			max_plot_size_mb: 10.0,
			platform_domain: "yellorn.com".to_string(),
		}
	}
}
