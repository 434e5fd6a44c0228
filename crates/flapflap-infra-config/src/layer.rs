// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use crate::sections::{LoggingConfigLayer, SynthConfigLayer, TargetConfigLayer};

/// One source's view of the configuration. Every section is optional so
/// layers can be stacked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfraConfigLayer {
	#[serde(default)]
	pub target: Option<TargetConfigLayer>,
	#[serde(default)]
	pub synth: Option<SynthConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl InfraConfigLayer {
	/// Merges `other` on top of this layer; present values in `other` win.
	pub fn merge(&mut self, other: InfraConfigLayer) {
		merge_section(&mut self.target, other.target, TargetConfigLayer::merge);
		merge_section(&mut self.synth, other.synth, SynthConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	let Some(other) = other else {
		return;
	};
	match base {
		Some(existing) => merge(existing, other),
		None => *base = Some(other),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_merge_fills_missing_sections() {
		let mut base = InfraConfigLayer::default();
		base.merge(InfraConfigLayer {
			logging: Some(LoggingConfigLayer {
				level: Some("debug".into()),
			}),
			..Default::default()
		});
		assert_eq!(
			base.logging.and_then(|l| l.level).as_deref(),
			Some("debug")
		);
	}

	#[test]
	fn test_parse_toml_sections() {
		let layer: InfraConfigLayer = toml::from_str(
			r#"
			[target]
			account = "111111111111"
			region = "us-east-1"

			[synth]
			out_dir = "build/assembly"
			"#,
		)
		.unwrap();

		let target = layer.target.unwrap();
		assert_eq!(target.account.as_deref(), Some("111111111111"));
		assert_eq!(target.region.as_deref(), Some("us-east-1"));
		assert_eq!(
			layer.synth.unwrap().out_dir,
			Some(std::path::PathBuf::from("build/assembly"))
		);
		assert!(layer.logging.is_none());
	}
}
