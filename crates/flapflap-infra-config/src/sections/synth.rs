// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Synthesis output configuration.

use std::path::PathBuf;

use serde::Deserialize;

pub const OUTDIR_ENV: &str = "FLAPFLAP_INFRA_OUTDIR";

/// Default cloud assembly directory, relative to the working directory.
pub const DEFAULT_OUT_DIR: &str = "cdk.out";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthConfig {
	pub out_dir: PathBuf,
}

impl Default for SynthConfig {
	fn default() -> Self {
		Self {
			out_dir: PathBuf::from(DEFAULT_OUT_DIR),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SynthConfigLayer {
	#[serde(default)]
	pub out_dir: Option<PathBuf>,
}

impl SynthConfigLayer {
	pub fn merge(&mut self, other: SynthConfigLayer) {
		if other.out_dir.is_some() {
			self.out_dir = other.out_dir;
		}
	}

	pub fn finalize(self) -> SynthConfig {
		SynthConfig {
			out_dir: self
				.out_dir
				.unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_out_dir() {
		assert_eq!(
			SynthConfigLayer::default().finalize().out_dir,
			PathBuf::from("cdk.out")
		);
	}
}
