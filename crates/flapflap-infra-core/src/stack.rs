// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stacks: the unit of deployment, holding resources and outputs.

use std::fmt;

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::cognito::{
	UserPool, UserPoolClient, UserPoolClientProps, UserPoolClientRef, UserPoolProps, UserPoolRef,
	USER_POOL_CLIENT_TYPE, USER_POOL_TYPE,
};
use crate::error::DeclarationError;
use crate::id::{ConstructId, LogicalId};
use crate::tags::{TagMap, Taggable};
use crate::token::Token;

const UNKNOWN_ACCOUNT: &str = "unknown-account";
const UNKNOWN_REGION: &str = "unknown-region";

/// Deployment target of a stack. Unset fields are resolved by the
/// provisioning engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
	pub account: Option<String>,
	pub region: Option<String>,
}

impl Environment {
	pub fn new(account: Option<String>, region: Option<String>) -> Self {
		Self { account, region }
	}
}

impl fmt::Display for Environment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"aws://{}/{}",
			self.account.as_deref().unwrap_or(UNKNOWN_ACCOUNT),
			self.region.as_deref().unwrap_or(UNKNOWN_REGION)
		)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackProps {
	pub env: Environment,
	pub description: Option<String>,
}

/// What happens to the live resource when its declaration is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalPolicy {
	/// The live resource is deleted with the stack.
	Destroy,
	/// The live resource is orphaned and keeps existing.
	Retain,
}

impl RemovalPolicy {
	fn template_value(self) -> &'static str {
		match self {
			RemovalPolicy::Destroy => "Delete",
			RemovalPolicy::Retain => "Retain",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
	UserPool,
	UserPoolClient,
}

impl ResourceKind {
	pub fn type_name(self) -> &'static str {
		match self {
			ResourceKind::UserPool => USER_POOL_TYPE,
			ResourceKind::UserPoolClient => USER_POOL_CLIENT_TYPE,
		}
	}
}

/// A resource declared in a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
	UserPool(UserPool),
	UserPoolClient(UserPoolClient),
}

impl Resource {
	pub fn kind(&self) -> ResourceKind {
		match self {
			Resource::UserPool(_) => ResourceKind::UserPool,
			Resource::UserPoolClient(_) => ResourceKind::UserPoolClient,
		}
	}

	pub fn construct_id(&self) -> &ConstructId {
		match self {
			Resource::UserPool(r) => r.construct_id(),
			Resource::UserPoolClient(r) => r.construct_id(),
		}
	}

	pub fn logical_id(&self) -> &LogicalId {
		match self {
			Resource::UserPool(r) => r.logical_id(),
			Resource::UserPoolClient(r) => r.logical_id(),
		}
	}

	pub fn tags(&self) -> &TagMap {
		match self {
			Resource::UserPool(r) => &r.tags,
			Resource::UserPoolClient(r) => &r.tags,
		}
	}

	/// Explicit removal policy, if the resource declares one.
	pub fn removal_policy(&self) -> Option<RemovalPolicy> {
		match self {
			Resource::UserPool(r) => Some(r.props().removal_policy),
			Resource::UserPoolClient(_) => None,
		}
	}

	pub(crate) fn to_template(&self) -> Value {
		let properties = match self {
			Resource::UserPool(r) => r.to_properties(),
			Resource::UserPoolClient(r) => r.to_properties(),
		};

		let mut resource = json!({
			"Type": self.kind().type_name(),
			"Properties": properties,
		});
		if let Some(policy) = self.removal_policy() {
			resource["DeletionPolicy"] = json!(policy.template_value());
			resource["UpdateReplacePolicy"] = json!(policy.template_value());
		}
		resource
	}
}

impl Taggable for Resource {
	fn visit_tags(&mut self, visit: &mut dyn FnMut(&mut TagMap)) {
		match self {
			Resource::UserPool(r) => visit(&mut r.tags),
			Resource::UserPoolClient(r) => visit(&mut r.tags),
		}
	}
}

/// A value published by the stack once it has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
	construct_id: ConstructId,
	logical_id: LogicalId,
	value: Token,
	description: Option<String>,
}

impl Output {
	pub fn construct_id(&self) -> &ConstructId {
		&self.construct_id
	}

	pub fn logical_id(&self) -> &LogicalId {
		&self.logical_id
	}

	pub fn value(&self) -> &Token {
		&self.value
	}

	pub fn description(&self) -> Option<&str> {
		self.description.as_deref()
	}

	fn to_template(&self) -> Value {
		let mut output = json!({ "Value": self.value.to_template() });
		if let Some(description) = &self.description {
			output["Description"] = json!(description);
		}
		output
	}
}

/// A deployable collection of resources and outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
	id: ConstructId,
	props: StackProps,
	resources: Vec<Resource>,
	outputs: Vec<Output>,
	tags: TagMap,
}

impl Stack {
	/// Creates an empty stack. It joins an app through [`crate::App::add_stack`]
	/// once populated.
	pub fn new(id: &str, props: StackProps) -> Result<Self, DeclarationError> {
		Ok(Self {
			id: ConstructId::new(id)?,
			props,
			resources: Vec::new(),
			outputs: Vec::new(),
			tags: TagMap::new(),
		})
	}

	pub fn id(&self) -> &ConstructId {
		&self.id
	}

	pub fn props(&self) -> &StackProps {
		&self.props
	}

	pub fn environment(&self) -> &Environment {
		&self.props.env
	}

	/// Stack-level tags, as set by [`crate::Tags`].
	pub fn tags(&self) -> &TagMap {
		&self.tags
	}

	pub fn resources(&self) -> &[Resource] {
		&self.resources
	}

	pub fn outputs(&self) -> &[Output] {
		&self.outputs
	}

	pub fn resource(&self, logical_id: &LogicalId) -> Option<&Resource> {
		self.resources.iter().find(|r| r.logical_id() == logical_id)
	}

	pub fn output(&self, construct_id: &str) -> Option<&Output> {
		self.outputs
			.iter()
			.find(|o| o.construct_id.as_str() == construct_id)
	}

	pub fn user_pools(&self) -> impl Iterator<Item = &UserPool> {
		self.resources.iter().filter_map(|r| match r {
			Resource::UserPool(pool) => Some(pool),
			_ => None,
		})
	}

	pub fn user_pool_clients(&self) -> impl Iterator<Item = &UserPoolClient> {
		self.resources.iter().filter_map(|r| match r {
			Resource::UserPoolClient(client) => Some(client),
			_ => None,
		})
	}

	/// Declares a user pool.
	pub fn add_user_pool(&mut self, id: &str, props: UserPoolProps) -> Result<UserPoolRef, DeclarationError> {
		let construct_id = ConstructId::new(id)?;
		self.ensure_unique(&construct_id, &LogicalId::for_resource(&construct_id))?;

		let pool = UserPool::new(construct_id, props)?;
		let reference = pool.reference(&self.id);
		debug!(stack = %self.id, id, logical_id = %pool.logical_id(), "declared user pool");
		self.resources.push(Resource::UserPool(pool));
		Ok(reference)
	}

	/// Declares a client against a user pool of this stack.
	pub fn add_user_pool_client(
		&mut self,
		id: &str,
		props: UserPoolClientProps,
	) -> Result<UserPoolClientRef, DeclarationError> {
		let construct_id = ConstructId::new(id)?;
		self.ensure_unique(&construct_id, &LogicalId::for_resource(&construct_id))?;

		let pool_ref = &props.user_pool;
		// Logical ids repeat across stacks; the owning stack has to match too.
		let pool = if pool_ref.stack() == &self.id {
			self.user_pools()
				.find(|p| p.logical_id() == pool_ref.logical_id())
		} else {
			None
		};
		let pool = pool.ok_or_else(|| self.dangling(pool_ref.stack(), pool_ref.logical_id()))?;

		let client = UserPoolClient::new(construct_id, props, pool)?;
		let reference = client.reference(&self.id);
		debug!(
			stack = %self.id,
			id,
			logical_id = %client.logical_id(),
			user_pool = %client.user_pool().logical_id(),
			"declared user pool client"
		);
		self.resources.push(Resource::UserPoolClient(client));
		Ok(reference)
	}

	/// Publishes a value as a stack output.
	pub fn add_output(
		&mut self,
		id: &str,
		value: Token,
		description: Option<String>,
	) -> Result<&Output, DeclarationError> {
		let construct_id = ConstructId::new(id)?;
		let logical_id = LogicalId::for_output(&construct_id);
		self.ensure_unique(&construct_id, &logical_id)?;

		if value.stack() != &self.id || self.resource(value.target()).is_none() {
			return Err(self.dangling(value.stack(), value.target()));
		}

		debug!(stack = %self.id, id, value = %value, "declared output");
		self.outputs.push(Output {
			construct_id,
			logical_id,
			value,
			description,
		});
		let index = self.outputs.len() - 1;
		Ok(&self.outputs[index])
	}

	fn ensure_unique(&self, id: &ConstructId, logical_id: &LogicalId) -> Result<(), DeclarationError> {
		let taken = self
			.resources
			.iter()
			.map(|r| (r.construct_id(), r.logical_id()))
			.chain(self.outputs.iter().map(|o| (&o.construct_id, &o.logical_id)))
			.any(|(c, l)| c == id || l == logical_id);

		if taken {
			return Err(DeclarationError::DuplicateConstructId {
				scope: self.id.to_string(),
				id: id.to_string(),
			});
		}
		Ok(())
	}

	fn dangling(&self, owner: &ConstructId, logical_id: &LogicalId) -> DeclarationError {
		DeclarationError::DanglingReference {
			stack: self.id.to_string(),
			logical_id: format!("{owner}/{logical_id}"),
		}
	}

	/// Renders the stack as a CloudFormation template.
	pub fn to_template(&self) -> Value {
		let mut template = Map::new();

		if let Some(description) = &self.props.description {
			template.insert("Description".into(), json!(description));
		}

		let resources: Map<String, Value> = self
			.resources
			.iter()
			.map(|r| (r.logical_id().to_string(), r.to_template()))
			.collect();
		template.insert("Resources".into(), Value::Object(resources));

		if !self.outputs.is_empty() {
			let outputs: Map<String, Value> = self
				.outputs
				.iter()
				.map(|o| (o.logical_id.to_string(), o.to_template()))
				.collect();
			template.insert("Outputs".into(), Value::Object(outputs));
		}

		Value::Object(template)
	}
}

impl Taggable for Stack {
	fn visit_tags(&mut self, visit: &mut dyn FnMut(&mut TagMap)) {
		visit(&mut self.tags);
		for resource in &mut self.resources {
			resource.visit_tags(visit);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cognito::{CustomAttribute, SignInAliases};
	use crate::tags::Tags;

	fn stack() -> Stack {
		Stack::new("TestStack", StackProps::default()).unwrap()
	}

	fn email_pool() -> UserPoolProps {
		UserPoolProps {
			sign_in_aliases: SignInAliases {
				email: true,
				..Default::default()
			},
			..Default::default()
		}
	}

	#[test]
	fn test_environment_display_defers_unknown_parts() {
		assert_eq!(
			Environment::default().to_string(),
			"aws://unknown-account/unknown-region"
		);
		let env = Environment::new(Some("111111111111".into()), Some("us-east-1".into()));
		assert_eq!(env.to_string(), "aws://111111111111/us-east-1");
	}

	#[test]
	fn test_client_references_pool() {
		let mut stack = stack();
		let pool = stack.add_user_pool("pool", email_pool()).unwrap();
		let client = stack
			.add_user_pool_client("client", UserPoolClientProps::new(pool.clone()))
			.unwrap();

		let declared = stack.user_pool_clients().next().unwrap();
		assert_eq!(declared.user_pool(), &pool);
		assert_eq!(declared.logical_id(), client.logical_id());
	}

	#[test]
	fn test_client_against_foreign_pool_is_dangling() {
		let mut other = Stack::new("Other", StackProps::default()).unwrap();
		let foreign = other.add_user_pool("foreign", email_pool()).unwrap();

		let mut stack = stack();
		let err = stack
			.add_user_pool_client("client", UserPoolClientProps::new(foreign))
			.unwrap_err();
		assert!(matches!(err, DeclarationError::DanglingReference { .. }));
		assert!(stack.resources().is_empty());
	}

	#[test]
	fn test_same_named_pool_in_other_stack_is_dangling() {
		let mut other = Stack::new("Other", StackProps::default()).unwrap();
		let foreign = other.add_user_pool("pool", email_pool()).unwrap();

		let mut stack = stack();
		let local = stack.add_user_pool("pool", email_pool()).unwrap();
		assert_eq!(local.logical_id(), foreign.logical_id());

		let err = stack
			.add_user_pool_client("client", UserPoolClientProps::new(foreign.clone()))
			.unwrap_err();
		assert_eq!(
			err,
			DeclarationError::DanglingReference {
				stack: "TestStack".to_string(),
				logical_id: format!("Other/{}", foreign.logical_id()),
			}
		);
		assert!(matches!(
			stack.add_output("pool-id", foreign.user_pool_id(), None),
			Err(DeclarationError::DanglingReference { .. })
		));
		assert_eq!(stack.resources().len(), 1);
		assert!(stack.outputs().is_empty());

		stack
			.add_user_pool_client("client", UserPoolClientProps::new(local.clone()))
			.unwrap();
		stack.add_output("pool-id", local.user_pool_id(), None).unwrap();
	}

	#[test]
	fn test_duplicate_ids_rejected() {
		let mut stack = stack();
		stack.add_user_pool("pool", email_pool()).unwrap();
		assert!(matches!(
			stack.add_user_pool("pool", email_pool()),
			Err(DeclarationError::DuplicateConstructId { .. })
		));
	}

	#[test]
	fn test_output_logical_id_collision_rejected() {
		let mut stack = stack();
		let pool = stack.add_user_pool("pool", email_pool()).unwrap();
		stack
			.add_output("pool-id", pool.user_pool_id(), None)
			.unwrap();
		assert!(matches!(
			stack.add_output("poolid", pool.user_pool_id(), None),
			Err(DeclarationError::DuplicateConstructId { .. })
		));
	}

	#[test]
	fn test_output_must_reference_stack_resource() {
		let mut other = Stack::new("Other", StackProps::default()).unwrap();
		let foreign = other.add_user_pool("foreign", email_pool()).unwrap();

		let mut stack = stack();
		assert!(matches!(
			stack.add_output("id", foreign.user_pool_id(), None),
			Err(DeclarationError::DanglingReference { .. })
		));
	}

	#[test]
	fn test_tags_reach_stack_and_resources() {
		let mut stack = stack();
		let pool = stack.add_user_pool("pool", email_pool()).unwrap();
		stack
			.add_user_pool_client("client", UserPoolClientProps::new(pool))
			.unwrap();

		let visited = Tags::of(&mut stack).add("team", "identity").unwrap();
		assert_eq!(visited, 3);
		assert_eq!(stack.tags().get("team"), Some("identity"));
		assert!(stack
			.resources()
			.iter()
			.all(|r| r.tags().get("team") == Some("identity")));
	}

	#[test]
	fn test_template_shape() {
		let mut props = email_pool();
		props
			.custom_attributes
			.insert("isAdmin".into(), CustomAttribute::boolean());
		let mut stack = Stack::new(
			"TestStack",
			StackProps {
				description: Some("identity".into()),
				..Default::default()
			},
		)
		.unwrap();
		let pool = stack.add_user_pool("pool", props).unwrap();
		let client = stack
			.add_user_pool_client("client", UserPoolClientProps::new(pool.clone()))
			.unwrap();
		stack
			.add_output("pool-id", pool.user_pool_id(), Some("pool".into()))
			.unwrap();

		let template = stack.to_template();
		assert_eq!(template["Description"], json!("identity"));

		let pool_json = &template["Resources"][pool.logical_id().as_str()];
		assert_eq!(pool_json["Type"], json!("AWS::Cognito::UserPool"));
		assert_eq!(pool_json["DeletionPolicy"], json!("Retain"));
		assert_eq!(pool_json["UpdateReplacePolicy"], json!("Retain"));

		let client_json = &template["Resources"][client.logical_id().as_str()];
		assert_eq!(client_json["Type"], json!("AWS::Cognito::UserPoolClient"));
		assert!(client_json.get("DeletionPolicy").is_none());

		assert_eq!(
			template["Outputs"]["poolid"],
			json!({
				"Value": { "Ref": pool.logical_id().as_str() },
				"Description": "pool",
			})
		);
	}

	#[test]
	fn test_destroy_policy_renders_delete() {
		let mut props = email_pool();
		props.removal_policy = RemovalPolicy::Destroy;
		let mut stack = stack();
		let pool = stack.add_user_pool("pool", props).unwrap();
		let template = stack.to_template();
		assert_eq!(
			template["Resources"][pool.logical_id().as_str()]["DeletionPolicy"],
			json!("Delete")
		);
	}
}
