use pretty_assertions::assert_eq;

use super::*;

#[test]
fn empty_file_yields_defaults() {
	assert_eq!(Config::from_toml("").unwrap(), Config::default());
}

#[test]
fn defaults_match_documented_values() {
	let config = Config::default();
	assert_eq!(config.plots.dir, PathBuf::from("plots"));
	assert_eq!(config.plots.template, "agent_template.json");
	assert_eq!(config.registry.max_footprint_cells, 1_000_000);
	assert!(!config.registry.import_rich_schema);
	assert_eq!(config.policy.max_particle_count, 50_000);
	assert_eq!(config.policy.platform_domain, "yellorn.com");
}

#[test]
fn full_file_parses() {
	let config = Config::from_toml(
		r#"
[plots]
dir = "/srv/plots"
template = "template.json"

[registry]
max_footprint_cells = 4096
import_rich_schema = true

[policy]
max_code_chars = 1000
max_particle_count = 20000
warn_particle_count = 5000
max_animation_keys = 4
max_plot_size_mb = 2.5
platform_domain = "plots.example.org"
"#,
	)
	.unwrap();

	assert_eq!(config.plots.dir, PathBuf::from("/srv/plots"));
	assert_eq!(config.plots.template, "template.json");
	assert_eq!(
		config.registry,
		LoadOptions {
			max_footprint_cells: 4096,
			import_rich_schema: true,
		}
	);
	assert_eq!(config.policy.max_plot_size_mb, 2.5);
	assert_eq!(config.policy.platform_domain, "plots.example.org");
}

#[test]
fn partial_tables_keep_other_defaults() {
	let config = Config::from_toml("[policy]\nmax_animation_keys = 3\n").unwrap();
	assert_eq!(config.policy.max_animation_keys, 3);
	assert_eq!(config.policy.max_code_chars, 50_000);
	assert_eq!(config.plots, PlotsConfig::default());
}

#[test]
fn unknown_keys_are_rejected() {
	assert!(Config::from_toml("[plots]\ndirectory = \"x\"\n").is_err());
	assert!(Config::from_toml("[server]\nport = 8000\n").is_err());
}

#[test]
fn resolve_prefers_explicit_then_working_directory() {
	let dir = tempfile::tempdir().expect("create tempdir");
	assert_eq!(Config::resolve(None, dir.path()).unwrap(), Config::default());

	std::fs::write(dir.path().join(CONFIG_FILE), "[plots]\ndir = \"from-cwd\"\n").unwrap();
	assert_eq!(Config::resolve(None, dir.path()).unwrap().plots.dir, PathBuf::from("from-cwd"));

	let explicit = dir.path().join("other.toml");
	std::fs::write(&explicit, "[plots]\ndir = \"from-flag\"\n").unwrap();
	assert_eq!(Config::resolve(Some(&explicit), dir.path()).unwrap().plots.dir, PathBuf::from("from-flag"));
}

#[test]
fn explicit_missing_file_is_an_error() {
	let dir = tempfile::tempdir().expect("create tempdir");
	let err = Config::resolve(Some(&dir.path().join("nope.toml")), dir.path()).unwrap_err();
	assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn flag_beats_environment_beats_file() {
	let mut config = Config::from_toml("[plots]\ndir = \"file\"\n").unwrap();
	config.apply_overrides(Some("env".into()), None);
	assert_eq!(config.plots.dir, PathBuf::from("env"));
	config.apply_overrides(Some("env".into()), Some("flag".into()));
	assert_eq!(config.plots.dir, PathBuf::from("flag"));
}
