// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections. Each has a runtime type and a `*Layer` type with
//! all-optional fields for merging.

mod logging;
mod synth;
mod target;

pub use logging::{LoggingConfig, LoggingConfigLayer, LOG_LEVEL_ENV};
pub use synth::{SynthConfig, SynthConfigLayer, DEFAULT_OUT_DIR, OUTDIR_ENV};
pub use target::{
	validate_account, validate_region, TargetConfig, TargetConfigLayer, ACCOUNT_ENV, REGION_ENV,
};
