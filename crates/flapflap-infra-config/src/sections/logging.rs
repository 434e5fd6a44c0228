// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Logging configuration.

use serde::Deserialize;

pub const LOG_LEVEL_ENV: &str = "FLAPFLAP_INFRA_LOG_LEVEL";

const DEFAULT_LEVEL: &str = "info";

/// Logging configuration (runtime).
///
/// `level` is an `EnvFilter` directive; `RUST_LOG` still takes priority at
/// subscriber setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
	pub level: String,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: DEFAULT_LEVEL.to_string(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfigLayer {
	#[serde(default)]
	pub level: Option<String>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: LoggingConfigLayer) {
		if other.level.is_some() {
			self.level = other.level;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		LoggingConfig {
			level: self.level.unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
		}
	}
}
