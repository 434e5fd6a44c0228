// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The flapflap identity stack.
//!
//! Declares one Cognito user pool (email sign-in, `isAdmin` custom attribute,
//! retained on stack deletion) and one client registered against it, and
//! publishes both generated ids as stack outputs.
//!
//! The shape of the graph is fixed; only the stack id and deployment
//! environment vary between constructions.

use std::collections::BTreeMap;

use flapflap_infra_core::cognito::{
	AccountRecovery, AuthFlows, AutoVerifiedAttrs, ClientAttributes, CustomAttribute,
	IdentityProvider, PasswordPolicy, SignInAliases, StandardAttribute, StandardAttributeSpec,
	StandardAttributes, StandardAttributesMask, UserPoolClientProps, UserPoolClientRef,
	UserPoolProps, UserPoolRef, WriteAttributes,
};
use flapflap_infra_core::{App, DeclarationError, RemovalPolicy, Stack, StackProps};
use tracing::info;

pub const USER_POOL_ID: &str = "flapflap-userpool";
pub const USER_POOL_NAME: &str = "flapflap-userpool";
pub const USER_POOL_CLIENT_ID: &str = "flapflap-userpool-client";
pub const USER_POOL_CLIENT_NAME: &str = "flapflap-userpool-client";
pub const USER_POOL_ID_OUTPUT: &str = "flapflap-userpool-id";
pub const USER_POOL_CLIENT_ID_OUTPUT: &str = "flapflap-userpool-client-id";

/// Custom attribute marking administrators.
pub const IS_ADMIN_ATTRIBUTE: &str = "isAdmin";

/// Handles to the declared identity resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlapFlapCognitoStack {
	stack_id: String,
	user_pool: UserPoolRef,
	user_pool_client: UserPoolClientRef,
}

impl FlapFlapCognitoStack {
	/// Declares the stack `id` and adds it to `app` once fully populated.
	///
	/// On error `app` is left unchanged.
	pub fn new(app: &mut App, id: &str, props: StackProps) -> Result<Self, DeclarationError> {
		let mut stack = Stack::new(id, props)?;

		let user_pool = stack.add_user_pool(USER_POOL_ID, user_pool_props())?;
		let user_pool_client =
			stack.add_user_pool_client(USER_POOL_CLIENT_ID, user_pool_client_props(user_pool.clone()))?;

		stack.add_output(USER_POOL_ID_OUTPUT, user_pool.user_pool_id(), None)?;
		stack.add_output(
			USER_POOL_CLIENT_ID_OUTPUT,
			user_pool_client.user_pool_client_id(),
			None,
		)?;

		info!(
			stack = id,
			environment = %stack.environment(),
			user_pool = %user_pool.logical_id(),
			user_pool_client = %user_pool_client.logical_id(),
			"declared cognito stack"
		);
		app.add_stack(stack)?;

		Ok(Self {
			stack_id: id.to_string(),
			user_pool,
			user_pool_client,
		})
	}

	pub fn stack_id(&self) -> &str {
		&self.stack_id
	}

	pub fn user_pool(&self) -> &UserPoolRef {
		&self.user_pool
	}

	pub fn user_pool_client(&self) -> &UserPoolClientRef {
		&self.user_pool_client
	}

	/// The declared stack inside `app`.
	pub fn stack<'a>(&self, app: &'a App) -> Option<&'a Stack> {
		app.stack(&self.stack_id)
	}
}

/// The user pool: email sign-in with self sign-up, given and family name
/// collected at registration, and an `isAdmin` flag.
pub fn user_pool_props() -> UserPoolProps {
	let required = StandardAttributeSpec {
		required: true,
		mutable: true,
	};

	let mut custom_attributes = BTreeMap::new();
	custom_attributes.insert(
		IS_ADMIN_ATTRIBUTE.to_string(),
		CustomAttribute::boolean().mutable(true),
	);

	UserPoolProps {
		user_pool_name: Some(USER_POOL_NAME.to_string()),
		self_sign_up_enabled: true,
		sign_in_aliases: SignInAliases {
			email: true,
			..Default::default()
		},
		auto_verify: AutoVerifiedAttrs {
			email: true,
			phone: false,
		},
		standard_attributes: StandardAttributes::new()
			.with(StandardAttribute::GivenName, required)
			.with(StandardAttribute::FamilyName, required),
		custom_attributes,
		password_policy: PasswordPolicy {
			min_length: 6,
			require_lowercase: true,
			require_digits: true,
			require_uppercase: false,
			require_symbols: false,
		},
		account_recovery: AccountRecovery::EmailOnly,
		removal_policy: RemovalPolicy::Retain,
	}
}

/// Every standard attribute, included.
pub fn standard_attributes_template() -> StandardAttributesMask {
	StandardAttributesMask::all()
}

/// Clients may read every standard attribute plus `isAdmin`.
pub fn read_attributes() -> ClientAttributes {
	ClientAttributes::new()
		.with_standard_attributes(&standard_attributes_template())
		.with_custom_attributes([IS_ADMIN_ATTRIBUTE])
}

/// Clients may write every standard attribute except the verification
/// flags, plus `isAdmin`.
///
/// Which callers are trusted to set `isAdmin` is decided by whoever holds
/// the client, not by this declaration.
pub fn write_attributes() -> WriteAttributes {
	let mask = standard_attributes_template()
		.with(StandardAttribute::EmailVerified, false)
		.with(StandardAttribute::PhoneNumberVerified, false);

	ClientAttributes::new()
		.with_standard_attributes(&mask)
		.with_custom_attributes([IS_ADMIN_ATTRIBUTE])
		.into()
}

pub fn user_pool_client_props(user_pool: UserPoolRef) -> UserPoolClientProps {
	UserPoolClientProps {
		user_pool_client_name: Some(USER_POOL_CLIENT_NAME.to_string()),
		auth_flows: AuthFlows {
			admin_user_password: true,
			custom: true,
			user_srp: true,
			user_password: false,
		},
		supported_identity_providers: vec![IdentityProvider::Cognito],
		read_attributes: Some(read_attributes()),
		write_attributes: Some(write_attributes()),
		..UserPoolClientProps::new(user_pool)
	}
}
