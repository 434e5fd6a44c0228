// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: defaults, TOML file, environment and CLI flags.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::InfraConfigLayer;
use crate::sections::{
	LoggingConfigLayer, SynthConfigLayer, TargetConfigLayer, ACCOUNT_ENV, LOG_LEVEL_ENV, OUTDIR_ENV,
	REGION_ENV,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
	Cli = 60,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<InfraConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<InfraConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(InfraConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
	required: bool,
}

impl TomlSource {
	/// A file that is skipped when absent.
	pub fn optional(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: false,
		}
	}

	/// A file that must exist, e.g. one named on the command line.
	pub fn required(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: true,
		}
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<InfraConfigLayer, ConfigError> {
		if !self.required && !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(InfraConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: InfraConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Environment variable source.
///
/// Account and region come from `CDK_DEFAULT_ACCOUNT`/`CDK_DEFAULT_REGION`;
/// everything else uses `FLAPFLAP_INFRA_<FIELD>`. Empty values count as
/// unset.
pub struct EnvSource {
	lookup: EnvLookup,
}

impl EnvSource {
	/// Reads the process environment.
	pub fn process() -> Self {
		Self::with_lookup(|name| std::env::var(name).ok())
	}

	/// Reads variables through `lookup` instead of the process environment.
	pub fn with_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
		Self {
			lookup: Box::new(lookup),
		}
	}

	fn var(&self, name: &str) -> Option<String> {
		(self.lookup)(name).filter(|s| !s.is_empty())
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<InfraConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(InfraConfigLayer {
			target: Some(TargetConfigLayer {
				account: self.var(ACCOUNT_ENV),
				region: self.var(REGION_ENV),
			}),
			synth: Some(SynthConfigLayer {
				out_dir: self.var(OUTDIR_ENV).map(PathBuf::from),
			}),
			logging: Some(LoggingConfigLayer {
				level: self.var(LOG_LEVEL_ENV),
			}),
		})
	}
}

/// Values given as command-line flags.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
	pub account: Option<String>,
	pub region: Option<String>,
	pub out_dir: Option<PathBuf>,
	pub log_level: Option<String>,
}

/// Command-line flag source.
pub struct CliSource {
	overrides: CliOverrides,
}

impl CliSource {
	pub fn new(overrides: CliOverrides) -> Self {
		Self { overrides }
	}
}

impl ConfigSource for CliSource {
	fn name(&self) -> &'static str {
		"cli"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Cli
	}

	fn load(&self) -> Result<InfraConfigLayer, ConfigError> {
		let o = self.overrides.clone();
		Ok(InfraConfigLayer {
			target: Some(TargetConfigLayer {
				account: o.account,
				region: o.region,
			}),
			synth: Some(SynthConfigLayer { out_dir: o.out_dir }),
			logging: Some(LoggingConfigLayer { level: o.log_level }),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn env(vars: &[(&str, &str)]) -> EnvSource {
		let map: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		EnvSource::with_lookup(move |name| map.get(name).cloned())
	}

	#[test]
	fn test_env_source_reads_cdk_variables() {
		let layer = env(&[
			("CDK_DEFAULT_ACCOUNT", "111111111111"),
			("CDK_DEFAULT_REGION", "us-east-1"),
		])
		.load()
		.unwrap();
		let target = layer.target.unwrap();
		assert_eq!(target.account.as_deref(), Some("111111111111"));
		assert_eq!(target.region.as_deref(), Some("us-east-1"));
	}

	#[test]
	fn test_env_source_treats_empty_as_unset() {
		let layer = env(&[("CDK_DEFAULT_ACCOUNT", "")]).load().unwrap();
		assert!(layer.target.unwrap().account.is_none());
	}

	#[test]
	fn test_missing_optional_file_is_skipped() {
		let dir = tempfile::tempdir().unwrap();
		let layer = TomlSource::optional(dir.path().join("absent.toml"))
			.load()
			.unwrap();
		assert!(layer.target.is_none());
	}

	#[test]
	fn test_missing_required_file_fails() {
		let dir = tempfile::tempdir().unwrap();
		let err = TomlSource::required(dir.path().join("absent.toml"))
			.load()
			.unwrap_err();
		assert!(matches!(err, ConfigError::FileRead { .. }));
	}

	#[test]
	fn test_malformed_file_reports_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("bad.toml");
		std::fs::write(&path, "[target\naccount = ").unwrap();
		let err = TomlSource::required(&path).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
		assert!(err.to_string().contains("bad.toml"));
	}

	#[test]
	fn test_precedence_order() {
		assert!(Precedence::Defaults < Precedence::ConfigFile);
		assert!(Precedence::ConfigFile < Precedence::Environment);
		assert!(Precedence::Environment < Precedence::Cli);
	}
}
