// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use flapflap_infra_config::CliOverrides;

/// flapflap-infra - synthesizes the flapflap identity stack.
#[derive(Parser, Debug)]
#[command(
	name = "flapflap-infra",
	about = "Synthesize the flapflap Cognito stack into a cloud assembly",
	version
)]
pub struct Cli {
	/// TOML config file, overrides FLAPFLAP_INFRA_CONFIG (must exist)
	#[arg(long, global = true)]
	pub config: Option<PathBuf>,

	/// Target account id, overrides CDK_DEFAULT_ACCOUNT
	#[arg(long, global = true)]
	pub account: Option<String>,

	/// Target region, overrides CDK_DEFAULT_REGION
	#[arg(long, global = true)]
	pub region: Option<String>,

	/// Log filter, overrides FLAPFLAP_INFRA_LOG_LEVEL
	#[arg(long, global = true)]
	pub log_level: Option<String>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
	#[command(flatten)]
	App(AppCommand),
	/// Show version and build information
	Version,
}

/// Commands that load configuration and build the app.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum AppCommand {
	/// Write the cloud assembly to disk
	Synth(SynthArgs),
	/// List the stacks in the app
	List,
	/// Print the stack template to stdout
	Template,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthArgs {
	/// Output directory for the cloud assembly
	#[arg(long, short)]
	pub out: Option<PathBuf>,
}

impl Cli {
	/// Flag values that override every other configuration source.
	pub fn overrides(&self) -> CliOverrides {
		let out_dir = match &self.command {
			Command::App(AppCommand::Synth(args)) => args.out.clone(),
			_ => None,
		};
		CliOverrides {
			account: self.account.clone(),
			region: self.region.clone(),
			out_dir,
			log_level: self.log_level.clone(),
		}
	}
}
