// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised synchronously while the resource graph is being declared.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
	#[error("Invalid construct id '{id}': {reason}")]
	InvalidConstructId { id: String, reason: String },

	#[error("Construct id already used in {scope}: {id}")]
	DuplicateConstructId { scope: String, id: String },

	#[error("Invalid resource name '{name}': {reason}")]
	InvalidResourceName { name: String, reason: String },

	#[error("User pool must allow at least one sign-in alias")]
	EmptySignInAliases,

	#[error("Auto-verified attribute '{channel}' is not a sign-in alias")]
	AutoVerifyNotSignInAlias { channel: String },

	#[error("Verification attribute '{attribute}' cannot be required at sign-up")]
	RequiredVerificationFlag { attribute: String },

	#[error("Invalid custom attribute '{name}': {reason}")]
	InvalidCustomAttribute { name: String, reason: String },

	#[error("Custom attribute '{name}' is not declared on user pool {pool}")]
	UnknownCustomAttribute { name: String, pool: String },

	#[error("Invalid password policy: {reason}")]
	InvalidPasswordPolicy { reason: String },

	#[error("Invalid tag '{key}': {reason}")]
	InvalidTag { key: String, reason: String },

	#[error("Reference to {logical_id} does not resolve inside stack {stack}")]
	DanglingReference { stack: String, logical_id: String },

	#[error("Stack not found: {id}")]
	UnknownStack { id: String },
}

/// Errors that can occur while rendering or writing a cloud assembly.
#[derive(Error, Debug)]
pub enum SynthError {
	#[error("Failed to write {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to serialize assembly: {0}")]
	Serialize(#[from] serde_json::Error),

	#[error(transparent)]
	Declaration(#[from] DeclarationError),
}
