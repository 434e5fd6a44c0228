// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Construct ids and the template logical ids derived from them.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::error::DeclarationError;

/// Maximum length of a construct id or logical id accepted by CloudFormation.
pub const MAX_ID_LEN: usize = 255;

/// Number of hex digits of the path digest appended to resource logical ids.
const HASH_LEN: usize = 8;

/// Path component appended to every resource construct when hashing, matching
/// the `<construct>/Resource` layout of higher-level constructs.
const RESOURCE_CHILD: &str = "Resource";

/// Human-chosen identifier of a node in the construct tree, unique within its
/// parent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstructId(String);

impl ConstructId {
	/// Validates and wraps a construct id.
	///
	/// Ids must be non-empty, at most 255 characters, free of `/` (the path
	/// separator) and contain at least one ASCII alphanumeric character so a
	/// logical id can be derived from them.
	pub fn new(id: impl Into<String>) -> Result<Self, DeclarationError> {
		let id = id.into();
		let invalid = |reason: &str| DeclarationError::InvalidConstructId {
			id: id.clone(),
			reason: reason.to_string(),
		};

		if id.is_empty() {
			return Err(invalid("must not be empty"));
		}
		if id.len() > MAX_ID_LEN {
			return Err(invalid("must be at most 255 characters"));
		}
		if id.contains('/') {
			return Err(invalid("must not contain '/'"));
		}
		if !id.chars().any(|c| c.is_ascii_alphanumeric()) {
			return Err(invalid("must contain at least one ASCII letter or digit"));
		}

		Ok(Self(id))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ConstructId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Key of a resource or output inside a synthesized template.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogicalId(String);

impl LogicalId {
	/// Logical id of a resource: the alphanumeric characters of the construct
	/// id followed by a digest of its `<id>/Resource` path.
	///
	/// The digest keeps ids distinct when two construct ids only differ in
	/// punctuation (`user-pool` vs `userpool`).
	pub fn for_resource(id: &ConstructId) -> Self {
		let path = format!("{}/{}", id.as_str(), RESOURCE_CHILD);
		let digest = Sha256::digest(path.as_bytes());
		let suffix = hex::encode_upper(digest);

		let mut human = remove_non_alphanumeric(id.as_str());
		human.truncate(MAX_ID_LEN - HASH_LEN);
		human.push_str(&suffix[..HASH_LEN]);
		Self(human)
	}

	/// Logical id of a stack output: the alphanumeric characters of the
	/// construct id, with no digest.
	pub fn for_output(id: &ConstructId) -> Self {
		Self(remove_non_alphanumeric(id.as_str()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for LogicalId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

fn remove_non_alphanumeric(s: &str) -> String {
	s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}
