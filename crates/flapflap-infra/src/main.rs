// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! flapflap-infra binary.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use flapflap_infra::cli::{AppCommand, Cli, Command};
use flapflap_infra::STACK_ID;
use flapflap_infra_config::CliOverrides;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod version;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	let overrides = cli.overrides();

	match cli.command {
		Command::Version => {
			println!("{}", version::format_version_info());
			Ok(())
		}
		Command::App(command) => run(command, cli.config, overrides),
	}
}

fn run(
	command: AppCommand,
	config_file: Option<PathBuf>,
	overrides: CliOverrides,
) -> anyhow::Result<()> {
	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = flapflap_infra_config::load_config(config_file, overrides)
		.context("failed to load configuration")?;

	// Logs go to stderr; `template` owns stdout
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	tracing::debug!(command = ?command, "starting flapflap-infra");

	match command {
		AppCommand::Synth(_) => {
			let assembly = flapflap_infra::synth(config.target).context("failed to synthesize app")?;
			let out_dir = &config.synth.out_dir;
			assembly
				.write_to(out_dir)
				.with_context(|| format!("failed to write cloud assembly to {}", out_dir.display()))?;
			for artifact in assembly.artifacts() {
				println!("{}", out_dir.join(artifact.template_file()).display());
			}
		}
		AppCommand::List => {
			let app = flapflap_infra::build_app(config.target).context("failed to build app")?;
			for stack in app.stacks() {
				println!("{}", stack.id());
			}
		}
		AppCommand::Template => {
			let assembly = flapflap_infra::synth(config.target).context("failed to synthesize app")?;
			let artifact = assembly
				.stack(STACK_ID)
				.with_context(|| format!("stack {STACK_ID} missing from assembly"))?;
			print!(
				"{}",
				artifact
					.render_template()
					.context("failed to render template")?
			);
		}
	}

	Ok(())
}
