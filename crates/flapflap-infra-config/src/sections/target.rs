// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Deployment target (account and region) configuration.

use serde::Deserialize;

use crate::error::ConfigError;

pub const ACCOUNT_ENV: &str = "CDK_DEFAULT_ACCOUNT";
pub const REGION_ENV: &str = "CDK_DEFAULT_REGION";

/// Deployment target (runtime, fully resolved).
///
/// Either field may be unset; the provisioning engine then applies its own
/// default resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetConfig {
	pub account: Option<String>,
	pub region: Option<String>,
}

/// Deployment target layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetConfigLayer {
	#[serde(default)]
	pub account: Option<String>,
	#[serde(default)]
	pub region: Option<String>,
}

impl TargetConfigLayer {
	pub fn merge(&mut self, other: TargetConfigLayer) {
		if other.account.is_some() {
			self.account = other.account;
		}
		if other.region.is_some() {
			self.region = other.region;
		}
	}

	pub fn finalize(self) -> Result<TargetConfig, ConfigError> {
		if let Some(account) = &self.account {
			validate_account(account)?;
		}
		if let Some(region) = &self.region {
			validate_region(region)?;
		}
		Ok(TargetConfig {
			account: self.account,
			region: self.region,
		})
	}
}

/// Account ids are exactly 12 ASCII digits.
pub fn validate_account(account: &str) -> Result<(), ConfigError> {
	if account.len() == 12 && account.chars().all(|c| c.is_ascii_digit()) {
		Ok(())
	} else {
		Err(ConfigError::invalid_value(
			"target.account",
			format!("'{account}' is not a 12-digit account id"),
		))
	}
}

/// Regions look like `us-east-1` or `us-gov-west-1`: lowercase words
/// joined by dashes, ending in a number.
pub fn validate_region(region: &str) -> Result<(), ConfigError> {
	let parts: Vec<&str> = region.split('-').collect();
	let valid = match parts.split_last() {
		Some((number, words)) if words.len() >= 2 => {
			!number.is_empty()
				&& number.chars().all(|c| c.is_ascii_digit())
				&& words
					.iter()
					.all(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_lowercase()))
		}
		_ => false,
	};

	if valid {
		Ok(())
	} else {
		Err(ConfigError::invalid_value(
			"target.region",
			format!("'{region}' is not a region name"),
		))
	}
}
