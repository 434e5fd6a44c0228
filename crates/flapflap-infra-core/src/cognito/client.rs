// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User pool client (application registration) declaration.

use serde_json::{json, Value};

use super::attributes::{ClientAttributes, WriteAttributes};
use super::user_pool::{UserPool, UserPoolRef};
use crate::error::DeclarationError;
use crate::id::{ConstructId, LogicalId};
use crate::tags::TagMap;
use crate::token::Token;

pub const USER_POOL_CLIENT_TYPE: &str = "AWS::Cognito::UserPoolClient";

const MAX_CLIENT_NAME_LEN: usize = 128;

/// Authentication flows a client may start.
///
/// Refresh-token authentication is always enabled alongside any other flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthFlows {
	/// Server-side password auth with admin credentials.
	pub admin_user_password: bool,
	/// Lambda-driven custom challenges.
	pub custom: bool,
	/// Plain username/password sent to the provider.
	pub user_password: bool,
	/// Secure Remote Password.
	pub user_srp: bool,
}

impl AuthFlows {
	pub fn is_empty(&self) -> bool {
		!(self.admin_user_password || self.custom || self.user_password || self.user_srp)
	}

	/// Explicit flow names in template form.
	pub fn explicit_flows(&self) -> Vec<&'static str> {
		if self.is_empty() {
			return Vec::new();
		}

		let mut flows = Vec::new();
		if self.admin_user_password {
			flows.push("ALLOW_ADMIN_USER_PASSWORD_AUTH");
		}
		if self.custom {
			flows.push("ALLOW_CUSTOM_AUTH");
		}
		if self.user_password {
			flows.push("ALLOW_USER_PASSWORD_AUTH");
		}
		if self.user_srp {
			flows.push("ALLOW_USER_SRP_AUTH");
		}
		flows.push("ALLOW_REFRESH_TOKEN_AUTH");
		flows
	}
}

/// Identity providers a client may sign users in through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityProvider {
	/// The user pool itself.
	Cognito,
}

impl IdentityProvider {
	pub fn name(self) -> &'static str {
		match self {
			IdentityProvider::Cognito => "COGNITO",
		}
	}
}

/// Declared configuration of a user pool client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPoolClientProps {
	pub user_pool: UserPoolRef,
	pub user_pool_client_name: Option<String>,
	pub auth_flows: AuthFlows,
	pub supported_identity_providers: Vec<IdentityProvider>,
	/// `None` leaves the provider default (every attribute readable).
	pub read_attributes: Option<ClientAttributes>,
	/// `None` leaves the provider default (every mutable attribute writable).
	pub write_attributes: Option<WriteAttributes>,
}

impl UserPoolClientProps {
	pub fn new(user_pool: UserPoolRef) -> Self {
		Self {
			user_pool,
			user_pool_client_name: None,
			auth_flows: AuthFlows::default(),
			supported_identity_providers: Vec::new(),
			read_attributes: None,
			write_attributes: None,
		}
	}

	/// Validates the props against the pool they reference.
	pub(crate) fn validate(&self, pool: &UserPool) -> Result<(), DeclarationError> {
		if let Some(name) = &self.user_pool_client_name {
			if name.is_empty() || name.len() > MAX_CLIENT_NAME_LEN {
				return Err(DeclarationError::InvalidResourceName {
					name: name.clone(),
					reason: "client names must be 1-128 characters".to_string(),
				});
			}
		}

		let masks = self
			.read_attributes
			.iter()
			.chain(self.write_attributes.iter().map(WriteAttributes::attributes));
		for mask in masks {
			if let Some(unknown) = mask.custom().find(|c| !pool.has_custom_attribute(c)) {
				return Err(DeclarationError::UnknownCustomAttribute {
					name: unknown.to_string(),
					pool: pool.construct_id().to_string(),
				});
			}
		}

		Ok(())
	}
}

/// A declared user pool client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPoolClient {
	construct_id: ConstructId,
	logical_id: LogicalId,
	props: UserPoolClientProps,
	pub(crate) tags: TagMap,
}

impl UserPoolClient {
	pub(crate) fn new(
		construct_id: ConstructId,
		props: UserPoolClientProps,
		pool: &UserPool,
	) -> Result<Self, DeclarationError> {
		props.validate(pool)?;
		let logical_id = LogicalId::for_resource(&construct_id);
		Ok(Self {
			construct_id,
			logical_id,
			props,
			tags: TagMap::new(),
		})
	}

	pub fn construct_id(&self) -> &ConstructId {
		&self.construct_id
	}

	pub fn logical_id(&self) -> &LogicalId {
		&self.logical_id
	}

	pub fn props(&self) -> &UserPoolClientProps {
		&self.props
	}

	pub fn user_pool(&self) -> &UserPoolRef {
		&self.props.user_pool
	}

	pub fn tags(&self) -> &TagMap {
		&self.tags
	}

	pub(crate) fn reference(&self, stack: &ConstructId) -> UserPoolClientRef {
		UserPoolClientRef {
			stack: stack.clone(),
			logical_id: self.logical_id.clone(),
		}
	}

	// AWS::Cognito::UserPoolClient has no tag property, so `tags` stays in
	// the graph only.
	pub(crate) fn to_properties(&self) -> Value {
		let p = &self.props;
		let mut props = serde_json::Map::new();

		props.insert("UserPoolId".into(), p.user_pool.user_pool_id().to_template());
		if let Some(name) = &p.user_pool_client_name {
			props.insert("ClientName".into(), json!(name));
		}

		let flows = p.auth_flows.explicit_flows();
		if !flows.is_empty() {
			props.insert("ExplicitAuthFlows".into(), json!(flows));
		}

		if !p.supported_identity_providers.is_empty() {
			let providers: Vec<&str> = p
				.supported_identity_providers
				.iter()
				.map(|provider| provider.name())
				.collect();
			props.insert("SupportedIdentityProviders".into(), json!(providers));
		}

		if let Some(read) = &p.read_attributes {
			props.insert("ReadAttributes".into(), json!(read.attribute_names()));
		}
		if let Some(write) = &p.write_attributes {
			props.insert(
				"WriteAttributes".into(),
				json!(write.attributes().attribute_names()),
			);
		}

		Value::Object(props)
	}
}

/// Non-owning reference to a user pool client declared in a stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserPoolClientRef {
	stack: ConstructId,
	logical_id: LogicalId,
}

impl UserPoolClientRef {
	/// The stack that declares the client.
	pub fn stack(&self) -> &ConstructId {
		&self.stack
	}

	pub fn logical_id(&self) -> &LogicalId {
		&self.logical_id
	}

	/// The provider-generated client id.
	pub fn user_pool_client_id(&self) -> Token {
		Token::Ref {
			stack: self.stack.clone(),
			logical_id: self.logical_id.clone(),
		}
	}
}
