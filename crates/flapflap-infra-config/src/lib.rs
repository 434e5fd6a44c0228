// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for flapflap infrastructure synthesis.
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. TOML config file (`flapflap-infra.toml`, or `FLAPFLAP_INFRA_CONFIG`)
//! 3. Environment (`CDK_DEFAULT_ACCOUNT`, `CDK_DEFAULT_REGION`, `FLAPFLAP_INFRA_*`)
//! 4. Command-line flags
//!
//! ```ignore
//! use flapflap_infra_config::{load_config, CliOverrides};
//!
//! let config = load_config(None, CliOverrides::default())?;
//! println!("writing assembly to {}", config.synth.out_dir.display());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::InfraConfigLayer;
pub use sections::*;
pub use sources::{
	CliOverrides, CliSource, ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource,
};

use std::path::PathBuf;

use tracing::{debug, info};

/// Names an explicit config file; a file named this way must exist.
pub const CONFIG_PATH_ENV: &str = "FLAPFLAP_INFRA_CONFIG";

/// Config file looked up in the working directory when none is named.
pub const DEFAULT_CONFIG_FILE: &str = "flapflap-infra.toml";

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfraConfig {
	pub target: TargetConfig,
	pub synth: SynthConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// `config_file` (from `--config`) beats `FLAPFLAP_INFRA_CONFIG`; both make
/// the file mandatory. Without either, `flapflap-infra.toml` is read if
/// present.
pub fn load_config(
	config_file: Option<PathBuf>,
	cli: CliOverrides,
) -> Result<InfraConfig, ConfigError> {
	let toml = match config_file.or_else(|| {
		std::env::var(CONFIG_PATH_ENV)
			.ok()
			.filter(|p| !p.is_empty())
			.map(PathBuf::from)
	}) {
		Some(path) => TomlSource::required(path),
		None => TomlSource::optional(DEFAULT_CONFIG_FILE),
	};

	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(toml),
		Box::new(EnvSource::process()),
		Box::new(CliSource::new(cli)),
	])
}

/// Load configuration from custom sources, applied in precedence order.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<InfraConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = InfraConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	let config = finalize(merged)?;
	info!(
		account = config.target.account.as_deref().unwrap_or("unresolved"),
		region = config.target.region.as_deref().unwrap_or("unresolved"),
		out_dir = %config.synth.out_dir.display(),
		"configuration loaded"
	);
	Ok(config)
}

fn finalize(layer: InfraConfigLayer) -> Result<InfraConfig, ConfigError> {
	Ok(InfraConfig {
		target: layer.target.unwrap_or_default().finalize()?,
		synth: layer.synth.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn env_with(vars: &[(&str, &str)]) -> Box<dyn ConfigSource> {
		let map: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		Box::new(EnvSource::with_lookup(move |name| map.get(name).cloned()))
	}

	#[test]
	fn test_defaults_only() {
		let config = load_from_sources(vec![Box::new(DefaultsSource)]).unwrap();
		assert_eq!(config, InfraConfig::default());
		assert!(config.target.account.is_none());
		assert_eq!(config.synth.out_dir, PathBuf::from("cdk.out"));
		assert_eq!(config.logging.level, "info");
	}

	#[test]
	fn test_environment_overrides_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("flapflap-infra.toml");
		std::fs::write(
			&path,
			"[target]\naccount = \"222222222222\"\nregion = \"eu-west-1\"\n",
		)
		.unwrap();

		let config = load_from_sources(vec![
			env_with(&[("CDK_DEFAULT_ACCOUNT", "111111111111")]),
			Box::new(TomlSource::required(&path)),
			Box::new(DefaultsSource),
		])
		.unwrap();

		assert_eq!(config.target.account.as_deref(), Some("111111111111"));
		assert_eq!(config.target.region.as_deref(), Some("eu-west-1"));
	}

	#[test]
	fn test_cli_overrides_environment() {
		let config = load_from_sources(vec![
			Box::new(CliSource::new(CliOverrides {
				region: Some("us-west-2".into()),
				out_dir: Some(PathBuf::from("out")),
				..Default::default()
			})),
			env_with(&[
				("CDK_DEFAULT_REGION", "us-east-1"),
				("FLAPFLAP_INFRA_OUTDIR", "assembly"),
			]),
		])
		.unwrap();

		assert_eq!(config.target.region.as_deref(), Some("us-west-2"));
		assert_eq!(config.synth.out_dir, PathBuf::from("out"));
	}

	#[test]
	fn test_invalid_account_rejected() {
		let err = load_from_sources(vec![env_with(&[("CDK_DEFAULT_ACCOUNT", "12345")])])
			.unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { .. }));
	}
}
