// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end synthesis of the flapflap app.

use flapflap_infra::{build_app, synth, STACK_ID, TAG_KEY, TAG_VALUE};
use flapflap_infra_config::{
	load_from_sources, CliOverrides, CliSource, ConfigSource, DefaultsSource, EnvSource,
	TargetConfig,
};
use flapflap_infra_core::ResourceKind;
use serde_json::{json, Value};

fn target(account: &str, region: &str) -> TargetConfig {
	TargetConfig {
		account: Some(account.to_string()),
		region: Some(region.to_string()),
	}
}

fn template(target: TargetConfig) -> Value {
	synth(target).unwrap().stack(STACK_ID).unwrap().template.clone()
}

#[test]
fn test_resolved_target_yields_two_outputs_and_tagged_resources() {
	let app = build_app(target("111111111111", "us-east-1")).unwrap();
	let stack = app.stack(STACK_ID).unwrap();

	assert_eq!(stack.environment().to_string(), "aws://111111111111/us-east-1");
	assert_eq!(stack.outputs().len(), 2);
	for output in stack.outputs() {
		assert!(!output.value().to_string().is_empty());
	}

	let kinds: Vec<ResourceKind> = stack.resources().iter().map(|r| r.kind()).collect();
	assert_eq!(kinds, vec![ResourceKind::UserPool, ResourceKind::UserPoolClient]);
	for resource in stack.resources() {
		assert_eq!(resource.tags().get(TAG_KEY), Some(TAG_VALUE));
	}
}

#[test]
fn test_outputs_reference_pool_and_client() {
	let template = template(target("111111111111", "us-east-1"));
	let resources = template["Resources"].as_object().unwrap();
	let outputs = template["Outputs"].as_object().unwrap();
	assert_eq!(outputs.len(), 2);

	let pool_id = resources
		.iter()
		.find(|(_, r)| r["Type"] == "AWS::Cognito::UserPool")
		.map(|(id, _)| id.clone())
		.unwrap();
	let client_id = resources
		.iter()
		.find(|(_, r)| r["Type"] == "AWS::Cognito::UserPoolClient")
		.map(|(id, _)| id.clone())
		.unwrap();

	assert_eq!(outputs["flapflapuserpoolid"]["Value"], json!({ "Ref": pool_id }));
	assert_eq!(
		outputs["flapflapuserpoolclientid"]["Value"],
		json!({ "Ref": client_id })
	);
	assert_eq!(
		resources[&client_id]["Properties"]["UserPoolId"],
		json!({ "Ref": pool_id })
	);
}

#[test]
fn test_pool_template_carries_tag() {
	let template = template(TargetConfig::default());
	let pool = template["Resources"]
		.as_object()
		.unwrap()
		.values()
		.find(|r| r["Type"] == "AWS::Cognito::UserPool")
		.unwrap();
	assert_eq!(pool["Properties"]["UserPoolTags"], json!({ "flapflap": "flapflap" }));
	assert_eq!(pool["DeletionPolicy"], "Retain");
}

#[test]
fn test_unresolved_target_still_synthesizes() {
	let assembly = synth(TargetConfig::default()).unwrap();
	let manifest = assembly.manifest();
	assert_eq!(
		manifest["artifacts"][STACK_ID]["environment"],
		"aws://unknown-account/unknown-region"
	);
	assert_eq!(
		manifest["artifacts"][STACK_ID]["properties"]["templateFile"],
		"FlapFlapCognitoStack.template.json"
	);
	assert_eq!(
		manifest["artifacts"][STACK_ID]["properties"]["tags"],
		json!({ "flapflap": "flapflap" })
	);
}

#[test]
fn test_identical_inputs_synthesize_identical_templates() {
	let first = synth(target("111111111111", "us-east-1")).unwrap();
	let second = synth(target("111111111111", "us-east-1")).unwrap();
	assert_eq!(first, second);
	assert_eq!(
		first.stack(STACK_ID).unwrap().render_template().unwrap(),
		second.stack(STACK_ID).unwrap().render_template().unwrap()
	);
}

#[test]
fn test_write_assembly_to_disk() {
	let dir = tempfile::tempdir().unwrap();
	let out = dir.path().join("cdk.out");

	let written = synth(TargetConfig::default()).unwrap().write_to(&out).unwrap();
	assert_eq!(
		written,
		vec![
			out.join("manifest.json"),
			out.join("FlapFlapCognitoStack.template.json"),
		]
	);

	let manifest: Value =
		serde_json::from_str(&std::fs::read_to_string(out.join("manifest.json")).unwrap()).unwrap();
	assert_eq!(manifest["version"], "36.0.0");

	let on_disk = std::fs::read_to_string(out.join("FlapFlapCognitoStack.template.json")).unwrap();
	assert!(on_disk.ends_with('\n'));
	assert_eq!(
		serde_json::from_str::<Value>(&on_disk).unwrap(),
		template(TargetConfig::default())
	);
}

#[test]
fn test_target_resolved_from_environment_and_flags() {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(EnvSource::with_lookup(|name| match name {
			"CDK_DEFAULT_ACCOUNT" => Some("111111111111".to_string()),
			"CDK_DEFAULT_REGION" => Some("us-east-1".to_string()),
			_ => None,
		})),
		Box::new(CliSource::new(CliOverrides {
			region: Some("eu-central-1".into()),
			..Default::default()
		})),
	];
	let config = load_from_sources(sources).unwrap();

	let app = build_app(config.target).unwrap();
	assert_eq!(
		app.stack(STACK_ID).unwrap().environment().to_string(),
		"aws://111111111111/eu-central-1"
	);
}
