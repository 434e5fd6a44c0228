// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User pool (identity directory) declaration.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use super::attributes::{CustomAttribute, StandardAttributes};
use crate::error::DeclarationError;
use crate::id::{ConstructId, LogicalId};
use crate::stack::RemovalPolicy;
use crate::tags::TagMap;
use crate::token::Token;

pub const USER_POOL_TYPE: &str = "AWS::Cognito::UserPool";

const MIN_PASSWORD_LENGTH: u32 = 6;
const MAX_PASSWORD_LENGTH: u32 = 99;
const MAX_POOL_NAME_LEN: usize = 128;

const VERIFICATION_MESSAGE: &str = "The verification code to your new account is {####}";
const VERIFICATION_SUBJECT: &str = "Verify your new account";

/// Ways a user can identify themselves when signing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignInAliases {
	pub username: bool,
	pub email: bool,
	pub phone: bool,
}

impl SignInAliases {
	pub fn is_empty(&self) -> bool {
		!(self.username || self.email || self.phone)
	}
}

/// Channels the identity provider verifies automatically at sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoVerifiedAttrs {
	pub email: bool,
	pub phone: bool,
}

/// Password complexity rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
	pub min_length: u32,
	pub require_lowercase: bool,
	pub require_uppercase: bool,
	pub require_digits: bool,
	pub require_symbols: bool,
}

impl Default for PasswordPolicy {
	fn default() -> Self {
		Self {
			min_length: 8,
			require_lowercase: true,
			require_uppercase: true,
			require_digits: true,
			require_symbols: true,
		}
	}
}

impl PasswordPolicy {
	fn validate(&self) -> Result<(), DeclarationError> {
		if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&self.min_length) {
			return Err(DeclarationError::InvalidPasswordPolicy {
				reason: format!(
					"minimum length must be between {MIN_PASSWORD_LENGTH} and {MAX_PASSWORD_LENGTH}, got {}",
					self.min_length
				),
			});
		}
		Ok(())
	}
}

/// How a user recovers a forgotten password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountRecovery {
	EmailOnly,
	PhoneOnly,
	#[default]
	EmailAndPhone,
	/// No recovery setting is declared; the provider default applies.
	None,
	AdminOnly,
}

impl AccountRecovery {
	fn mechanisms(self) -> Option<Vec<&'static str>> {
		match self {
			AccountRecovery::EmailOnly => Some(vec!["verified_email"]),
			AccountRecovery::PhoneOnly => Some(vec!["verified_phone_number"]),
			AccountRecovery::EmailAndPhone => Some(vec!["verified_email", "verified_phone_number"]),
			AccountRecovery::None => None,
			AccountRecovery::AdminOnly => Some(vec!["admin_only"]),
		}
	}
}

/// Declared configuration of a user pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPoolProps {
	pub user_pool_name: Option<String>,
	pub self_sign_up_enabled: bool,
	pub sign_in_aliases: SignInAliases,
	pub auto_verify: AutoVerifiedAttrs,
	pub standard_attributes: StandardAttributes,
	/// Custom attributes by name, without the `custom:` prefix.
	pub custom_attributes: BTreeMap<String, CustomAttribute>,
	pub password_policy: PasswordPolicy,
	pub account_recovery: AccountRecovery,
	pub removal_policy: RemovalPolicy,
}

impl Default for UserPoolProps {
	fn default() -> Self {
		Self {
			user_pool_name: None,
			self_sign_up_enabled: false,
			sign_in_aliases: SignInAliases {
				username: true,
				..Default::default()
			},
			auto_verify: AutoVerifiedAttrs::default(),
			standard_attributes: StandardAttributes::default(),
			custom_attributes: BTreeMap::new(),
			password_policy: PasswordPolicy::default(),
			account_recovery: AccountRecovery::default(),
			removal_policy: RemovalPolicy::Retain,
		}
	}
}

impl UserPoolProps {
	pub(crate) fn validate(&self) -> Result<(), DeclarationError> {
		if let Some(name) = &self.user_pool_name {
			if name.is_empty() || name.len() > MAX_POOL_NAME_LEN {
				return Err(DeclarationError::InvalidResourceName {
					name: name.clone(),
					reason: "user pool names must be 1-128 characters".to_string(),
				});
			}
		}

		if self.sign_in_aliases.is_empty() {
			return Err(DeclarationError::EmptySignInAliases);
		}
		// Verification codes can only reach a channel the user signs in with.
		if self.auto_verify.email && !self.sign_in_aliases.email {
			return Err(DeclarationError::AutoVerifyNotSignInAlias {
				channel: "email".to_string(),
			});
		}
		if self.auto_verify.phone && !self.sign_in_aliases.phone {
			return Err(DeclarationError::AutoVerifyNotSignInAlias {
				channel: "phone_number".to_string(),
			});
		}

		self.standard_attributes.validate()?;
		for (name, attribute) in &self.custom_attributes {
			attribute.validate(name)?;
		}
		self.password_policy.validate()
	}
}

/// A declared user pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPool {
	construct_id: ConstructId,
	logical_id: LogicalId,
	props: UserPoolProps,
	pub(crate) tags: TagMap,
}

impl UserPool {
	pub(crate) fn new(construct_id: ConstructId, props: UserPoolProps) -> Result<Self, DeclarationError> {
		props.validate()?;
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

	pub fn props(&self) -> &UserPoolProps {
		&self.props
	}

	pub fn tags(&self) -> &TagMap {
		&self.tags
	}

	/// Handle other declarations of `stack` use to reference this pool.
	pub(crate) fn reference(&self, stack: &ConstructId) -> UserPoolRef {
		UserPoolRef {
			stack: stack.clone(),
			logical_id: self.logical_id.clone(),
		}
	}

	pub fn has_custom_attribute(&self, name: &str) -> bool {
		self.props.custom_attributes.contains_key(name)
	}

	pub(crate) fn to_properties(&self) -> Value {
		let p = &self.props;
		let mut props = serde_json::Map::new();

		if let Some(name) = &p.user_pool_name {
			props.insert("UserPoolName".into(), json!(name));
		}

		props.insert(
			"AdminCreateUserConfig".into(),
			json!({ "AllowAdminCreateUserOnly": !p.self_sign_up_enabled }),
		);

		// Without a username, email/phone become the username itself;
		// otherwise they are extra aliases next to it.
		let mut aliases = Vec::new();
		if p.sign_in_aliases.email {
			aliases.push("email");
		}
		if p.sign_in_aliases.phone {
			aliases.push("phone_number");
		}
		if p.sign_in_aliases.username {
			if !aliases.is_empty() {
				props.insert("AliasAttributes".into(), json!(aliases));
			}
		} else {
			props.insert("UsernameAttributes".into(), json!(aliases));
		}

		let mut auto_verified = Vec::new();
		if p.auto_verify.email {
			auto_verified.push("email");
		}
		if p.auto_verify.phone {
			auto_verified.push("phone_number");
		}
		if !auto_verified.is_empty() {
			props.insert("AutoVerifiedAttributes".into(), json!(auto_verified));
		}

		let schema: Vec<Value> = p
			.standard_attributes
			.to_schema()
			.chain(
				p.custom_attributes
					.iter()
					.map(|(name, attr)| attr.to_schema(name)),
			)
			.collect();
		if !schema.is_empty() {
			props.insert("Schema".into(), Value::Array(schema));
		}

		props.insert(
			"Policies".into(),
			json!({
				"PasswordPolicy": {
					"MinimumLength": p.password_policy.min_length,
					"RequireLowercase": p.password_policy.require_lowercase,
					"RequireUppercase": p.password_policy.require_uppercase,
					"RequireNumbers": p.password_policy.require_digits,
					"RequireSymbols": p.password_policy.require_symbols,
				}
			}),
		);

		if let Some(mechanisms) = p.account_recovery.mechanisms() {
			let mechanisms: Vec<Value> = mechanisms
				.into_iter()
				.enumerate()
				.map(|(i, name)| json!({ "Name": name, "Priority": i + 1 }))
				.collect();
			props.insert(
				"AccountRecoverySetting".into(),
				json!({ "RecoveryMechanisms": mechanisms }),
			);
		}

		props.insert(
			"VerificationMessageTemplate".into(),
			json!({
				"DefaultEmailOption": "CONFIRM_WITH_CODE",
				"EmailMessage": VERIFICATION_MESSAGE,
				"EmailSubject": VERIFICATION_SUBJECT,
				"SmsMessage": VERIFICATION_MESSAGE,
			}),
		);

		if !self.tags.is_empty() {
			props.insert("UserPoolTags".into(), self.tags.to_template_map());
		}

		Value::Object(props)
	}
}

/// Non-owning reference to a user pool declared in a stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserPoolRef {
	stack: ConstructId,
	logical_id: LogicalId,
}

impl UserPoolRef {
	/// The stack that declares the pool.
	pub fn stack(&self) -> &ConstructId {
		&self.stack
	}

	pub fn logical_id(&self) -> &LogicalId {
		&self.logical_id
	}

	/// The provider-generated pool id.
	pub fn user_pool_id(&self) -> Token {
		Token::Ref {
			stack: self.stack.clone(),
			logical_id: self.logical_id.clone(),
		}
	}
}
