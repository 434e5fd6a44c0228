// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User pool attribute schema and client attribute permission masks.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{json, Value};
use tracing::debug;

use crate::error::DeclarationError;

/// Prefix under which custom attributes are addressed by clients.
pub const CUSTOM_ATTRIBUTE_PREFIX: &str = "custom:";

const MAX_CUSTOM_NAME_LEN: usize = 20;

/// Attributes predefined by the identity provider (OpenID Connect claims).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StandardAttribute {
	Address,
	Birthdate,
	Email,
	EmailVerified,
	FamilyName,
	Gender,
	GivenName,
	Locale,
	MiddleName,
	Fullname,
	Nickname,
	PhoneNumber,
	PhoneNumberVerified,
	ProfilePicture,
	PreferredUsername,
	ProfilePage,
	Timezone,
	LastUpdateTime,
	Website,
}

impl StandardAttribute {
	/// Every standard attribute.
	pub const ALL: [StandardAttribute; 19] = [
		StandardAttribute::Address,
		StandardAttribute::Birthdate,
		StandardAttribute::Email,
		StandardAttribute::EmailVerified,
		StandardAttribute::FamilyName,
		StandardAttribute::Gender,
		StandardAttribute::GivenName,
		StandardAttribute::Locale,
		StandardAttribute::MiddleName,
		StandardAttribute::Fullname,
		StandardAttribute::Nickname,
		StandardAttribute::PhoneNumber,
		StandardAttribute::PhoneNumberVerified,
		StandardAttribute::ProfilePicture,
		StandardAttribute::PreferredUsername,
		StandardAttribute::ProfilePage,
		StandardAttribute::Timezone,
		StandardAttribute::LastUpdateTime,
		StandardAttribute::Website,
	];

	/// Attribute name as used in schemas and client masks.
	pub fn attribute_name(self) -> &'static str {
		match self {
			StandardAttribute::Address => "address",
			StandardAttribute::Birthdate => "birthdate",
			StandardAttribute::Email => "email",
			StandardAttribute::EmailVerified => "email_verified",
			StandardAttribute::FamilyName => "family_name",
			StandardAttribute::Gender => "gender",
			StandardAttribute::GivenName => "given_name",
			StandardAttribute::Locale => "locale",
			StandardAttribute::MiddleName => "middle_name",
			StandardAttribute::Fullname => "name",
			StandardAttribute::Nickname => "nickname",
			StandardAttribute::PhoneNumber => "phone_number",
			StandardAttribute::PhoneNumberVerified => "phone_number_verified",
			StandardAttribute::ProfilePicture => "picture",
			StandardAttribute::PreferredUsername => "preferred_username",
			StandardAttribute::ProfilePage => "profile",
			StandardAttribute::Timezone => "zoneinfo",
			StandardAttribute::LastUpdateTime => "updated_at",
			StandardAttribute::Website => "website",
		}
	}

	/// Verification flags are only ever set by the identity provider itself.
	pub fn is_verification_flag(self) -> bool {
		matches!(
			self,
			StandardAttribute::EmailVerified | StandardAttribute::PhoneNumberVerified
		)
	}
}

/// Schema settings for one standard attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardAttributeSpec {
	/// Must be supplied at sign-up.
	pub required: bool,
	/// Can be changed after sign-up.
	pub mutable: bool,
}

impl Default for StandardAttributeSpec {
	fn default() -> Self {
		Self {
			required: false,
			mutable: true,
		}
	}
}

/// Standard attributes with explicit schema settings on a user pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandardAttributes(BTreeMap<StandardAttribute, StandardAttributeSpec>);

impl StandardAttributes {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, attribute: StandardAttribute, spec: StandardAttributeSpec) -> Self {
		self.0.insert(attribute, spec);
		self
	}

	pub fn get(&self, attribute: StandardAttribute) -> Option<StandardAttributeSpec> {
		self.0.get(&attribute).copied()
	}

	pub fn iter(&self) -> impl Iterator<Item = (StandardAttribute, StandardAttributeSpec)> + '_ {
		self.0.iter().map(|(a, s)| (*a, *s))
	}

	/// Attributes the sign-up form has to collect.
	pub fn required(&self) -> impl Iterator<Item = StandardAttribute> + '_ {
		self.iter().filter(|(_, s)| s.required).map(|(a, _)| a)
	}

	pub(crate) fn validate(&self) -> Result<(), DeclarationError> {
		if let Some(flag) = self.required().find(|a| a.is_verification_flag()) {
			return Err(DeclarationError::RequiredVerificationFlag {
				attribute: flag.attribute_name().to_string(),
			});
		}
		Ok(())
	}

	pub(crate) fn to_schema(&self) -> impl Iterator<Item = Value> + '_ {
		self.iter().map(|(attribute, spec)| {
			json!({
				"Name": attribute.attribute_name(),
				"Required": spec.required,
				"Mutable": spec.mutable,
			})
		})
	}
}

/// Value type of a custom attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomAttributeType {
	String,
	Number,
	DateTime,
	Boolean,
}

impl CustomAttributeType {
	fn data_type(self) -> &'static str {
		match self {
			CustomAttributeType::String => "String",
			CustomAttributeType::Number => "Number",
			CustomAttributeType::DateTime => "DateTime",
			CustomAttributeType::Boolean => "Boolean",
		}
	}
}

/// A user-defined attribute declared on a user pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomAttribute {
	pub data_type: CustomAttributeType,
	pub mutable: bool,
}

impl CustomAttribute {
	fn of(data_type: CustomAttributeType) -> Self {
		Self {
			data_type,
			mutable: true,
		}
	}

	pub fn boolean() -> Self {
		Self::of(CustomAttributeType::Boolean)
	}

	pub fn string() -> Self {
		Self::of(CustomAttributeType::String)
	}

	pub fn number() -> Self {
		Self::of(CustomAttributeType::Number)
	}

	pub fn date_time() -> Self {
		Self::of(CustomAttributeType::DateTime)
	}

	pub fn mutable(mut self, mutable: bool) -> Self {
		self.mutable = mutable;
		self
	}

	pub(crate) fn validate(&self, name: &str) -> Result<(), DeclarationError> {
		validate_custom_name(name)
	}

	pub(crate) fn to_schema(&self, name: &str) -> Value {
		json!({
			"Name": name,
			"AttributeDataType": self.data_type.data_type(),
			"Mutable": self.mutable,
		})
	}
}

/// Validates a custom attribute name (without the `custom:` prefix).
pub fn validate_custom_name(name: &str) -> Result<(), DeclarationError> {
	let invalid = |reason: &str| DeclarationError::InvalidCustomAttribute {
		name: name.to_string(),
		reason: reason.to_string(),
	};

	if name.is_empty() {
		return Err(invalid("name must not be empty"));
	}
	if name.len() > MAX_CUSTOM_NAME_LEN {
		return Err(invalid("name must be at most 20 characters"));
	}
	if name.starts_with(CUSTOM_ATTRIBUTE_PREFIX) {
		return Err(invalid("name must not include the 'custom:' prefix"));
	}
	if !name
		.chars()
		.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
	{
		return Err(invalid("name may only contain letters, digits, '_' and '-'"));
	}

	Ok(())
}

/// Inclusion flags for the standard attributes of a client mask.
///
/// Attributes without an entry are excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandardAttributesMask(BTreeMap<StandardAttribute, bool>);

impl StandardAttributesMask {
	/// Mask with every standard attribute included.
	pub fn all() -> Self {
		Self(StandardAttribute::ALL.iter().map(|a| (*a, true)).collect())
	}

	/// Mask with every standard attribute excluded.
	pub fn none() -> Self {
		Self::default()
	}

	/// Overrides the inclusion flag for one attribute.
	pub fn with(mut self, attribute: StandardAttribute, included: bool) -> Self {
		self.0.insert(attribute, included);
		self
	}

	pub fn includes(&self, attribute: StandardAttribute) -> bool {
		self.0.get(&attribute).copied().unwrap_or(false)
	}

	pub fn included(&self) -> impl Iterator<Item = StandardAttribute> + '_ {
		self.0.iter().filter(|(_, inc)| **inc).map(|(a, _)| *a)
	}
}

/// Set of attributes a client may read or write: standard attributes plus
/// custom attributes by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientAttributes {
	standard: BTreeSet<StandardAttribute>,
	custom: BTreeSet<String>,
}

impl ClientAttributes {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds every attribute the mask includes.
	pub fn with_standard_attributes(mut self, mask: &StandardAttributesMask) -> Self {
		self.standard.extend(mask.included());
		self
	}

	/// Adds custom attributes by name, without the `custom:` prefix.
	pub fn with_custom_attributes<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.custom.extend(names.into_iter().map(Into::into));
		self
	}

	pub fn contains_standard(&self, attribute: StandardAttribute) -> bool {
		self.standard.contains(&attribute)
	}

	pub fn contains_custom(&self, name: &str) -> bool {
		self.custom.contains(name)
	}

	pub fn standard(&self) -> impl Iterator<Item = StandardAttribute> + '_ {
		self.standard.iter().copied()
	}

	pub fn custom(&self) -> impl Iterator<Item = &str> + '_ {
		self.custom.iter().map(String::as_str)
	}

	/// Sorted attribute names as listed in the client's template properties.
	pub fn attribute_names(&self) -> Vec<String> {
		let mut names: Vec<String> = self
			.standard
			.iter()
			.map(|a| a.attribute_name().to_string())
			.chain(
				self.custom
					.iter()
					.map(|c| format!("{CUSTOM_ATTRIBUTE_PREFIX}{c}")),
			)
			.collect();
		names.sort();
		names
	}
}

/// A [`ClientAttributes`] mask that can never grant write access to the
/// verification flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteAttributes(ClientAttributes);

impl WriteAttributes {
	pub fn attributes(&self) -> &ClientAttributes {
		&self.0
	}
}

impl From<ClientAttributes> for WriteAttributes {
	fn from(mut attributes: ClientAttributes) -> Self {
		let before = attributes.standard.len();
		attributes.standard.retain(|a| !a.is_verification_flag());
		let stripped = before - attributes.standard.len();
		if stripped > 0 {
			debug!(stripped, "dropped verification flags from write mask");
		}
		Self(attributes)
	}
}
