// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Entry point for the flapflap infrastructure app.
//!
//! Builds the app tree for a resolved deployment target, tags it, and
//! synthesizes it. The `flapflap-infra` binary wraps these functions with
//! configuration loading and a CLI.

pub mod cli;

use flapflap_cognito_stack::FlapFlapCognitoStack;
use flapflap_infra_config::TargetConfig;
use flapflap_infra_core::{
	App, CloudAssembly, DeclarationError, Environment, StackProps, SynthError, Tags,
};
use tracing::{debug, info};

/// Id of the single stack in the app.
pub const STACK_ID: &str = "FlapFlapCognitoStack";

pub const TAG_KEY: &str = "flapflap";
pub const TAG_VALUE: &str = "flapflap";

/// Builds the app for `target`: one identity stack, tagged throughout.
///
/// Either half of the target may be missing; the stack environment is then
/// left for the provisioning engine to resolve.
pub fn build_app(target: TargetConfig) -> Result<App, DeclarationError> {
	let env = Environment::new(target.account, target.region);
	debug!(environment = %env, "building app");

	let mut app = App::new();
	FlapFlapCognitoStack::new(
		&mut app,
		STACK_ID,
		StackProps {
			env,
			description: None,
		},
	)?;

	let tagged = Tags::of(&mut app).add(TAG_KEY, TAG_VALUE)?;
	debug!(key = TAG_KEY, nodes = tagged, "applied tag");

	Ok(app)
}

/// Builds and synthesizes the app for `target`.
///
/// Declaration failures surface as [`SynthError::Declaration`].
pub fn synth(target: TargetConfig) -> Result<CloudAssembly, SynthError> {
	let app = build_app(target)?;
	let assembly = CloudAssembly::synth(&app);
	info!(stacks = app.stacks().len(), "app synthesized");
	Ok(assembly)
}
