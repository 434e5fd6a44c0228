// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::app::App;
use crate::error::SynthError;
use crate::stack::{Environment, Stack};
use crate::tags::TagMap;

/// Cloud assembly schema version written to the manifest.
pub const MANIFEST_VERSION: &str = "36.0.0";

pub const MANIFEST_FILE: &str = "manifest.json";

const STACK_ARTIFACT_TYPE: &str = "aws:cloudformation:stack";

/// One synthesized stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackArtifact {
	pub stack_name: String,
	pub environment: Environment,
	pub tags: TagMap,
	pub template: Value,
}

impl StackArtifact {
	fn from_stack(stack: &Stack) -> Self {
		Self {
			stack_name: stack.id().to_string(),
			environment: stack.environment().clone(),
			tags: stack.tags().clone(),
			template: stack.to_template(),
		}
	}

	pub fn template_file(&self) -> String {
		format!("{}.template.json", self.stack_name)
	}

	/// The template as written to disk.
	pub fn render_template(&self) -> Result<String, SynthError> {
		render(&self.template)
	}

	fn manifest_entry(&self) -> Value {
		let mut properties = Map::new();
		properties.insert("templateFile".into(), json!(self.template_file()));
		if !self.tags.is_empty() {
			properties.insert("tags".into(), self.tags.to_template_map());
		}

		json!({
			"type": STACK_ARTIFACT_TYPE,
			"environment": self.environment.to_string(),
			"properties": properties,
		})
	}
}

/// Rendered output of a synthesis run, ordered by stack name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloudAssembly {
	artifacts: BTreeMap<String, StackArtifact>,
}

impl CloudAssembly {
	/// Renders every stack of the app.
	pub fn synth(app: &App) -> Self {
		let artifacts: BTreeMap<String, StackArtifact> = app
			.stacks()
			.iter()
			.map(|stack| {
				let artifact = StackArtifact::from_stack(stack);
				debug!(
					stack = %artifact.stack_name,
					environment = %artifact.environment,
					resources = stack.resources().len(),
					outputs = stack.outputs().len(),
					"synthesized stack"
				);
				(artifact.stack_name.clone(), artifact)
			})
			.collect();

		Self { artifacts }
	}

	pub fn artifacts(&self) -> impl Iterator<Item = &StackArtifact> {
		self.artifacts.values()
	}

	pub fn stack(&self, name: &str) -> Option<&StackArtifact> {
		self.artifacts.get(name)
	}

	pub fn manifest(&self) -> Value {
		let artifacts: Map<String, Value> = self
			.artifacts
			.iter()
			.map(|(name, artifact)| (name.clone(), artifact.manifest_entry()))
			.collect();

		json!({
			"version": MANIFEST_VERSION,
			"artifacts": artifacts,
		})
	}

	/// Writes the manifest and every template into `dir`, creating it if
	/// needed. Returns the written paths, manifest first.
	///
	/// Everything is rendered before the first file is touched, so a
	/// serialization failure leaves `dir` unchanged.
	pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, SynthError> {
		let mut files = vec![(dir.join(MANIFEST_FILE), render(&self.manifest())?)];
		for artifact in self.artifacts.values() {
			files.push((dir.join(artifact.template_file()), artifact.render_template()?));
		}

		std::fs::create_dir_all(dir).map_err(|source| SynthError::Io {
			path: dir.to_path_buf(),
			source,
		})?;

		let mut written = Vec::with_capacity(files.len());
		for (path, contents) in files {
			std::fs::write(&path, contents).map_err(|source| SynthError::Io {
				path: path.clone(),
				source,
			})?;
			debug!(path = %path.display(), "wrote assembly file");
			written.push(path);
		}

		info!(dir = %dir.display(), stacks = self.artifacts.len(), "cloud assembly written");
		Ok(written)
	}
}

/// Pretty JSON with a trailing newline. Object keys are already sorted, so
/// identical inputs give identical bytes.
fn render(value: &Value) -> Result<String, SynthError> {
	let mut out = serde_json::to_string_pretty(value)?;
	out.push('\n');
	Ok(out)
}
