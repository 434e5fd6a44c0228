// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Unresolved references to values the provider assigns at apply time.

use std::fmt;

use serde_json::{json, Value};

use crate::id::{ConstructId, LogicalId};

/// A value that only exists once the provisioning engine has applied the
/// template, such as a generated user pool id.
///
/// Tokens remember the stack that owns their target; they only resolve
/// inside that stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
	/// The primary identifier of a resource (`{"Ref": "<logicalId>"}`).
	Ref {
		stack: ConstructId,
		logical_id: LogicalId,
	},
}

impl Token {
	/// The stack that declares the target.
	pub fn stack(&self) -> &ConstructId {
		match self {
			Token::Ref { stack, .. } => stack,
		}
	}

	/// The logical id this token depends on.
	pub fn target(&self) -> &LogicalId {
		match self {
			Token::Ref { logical_id, .. } => logical_id,
		}
	}

	/// Intrinsic-function form used inside templates.
	pub fn to_template(&self) -> Value {
		match self {
			Token::Ref { logical_id, .. } => json!({ "Ref": logical_id.as_str() }),
		}
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Token::Ref { logical_id, .. } => write!(f, "${{Token[Ref.{logical_id}]}}"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pool_ref() -> Token {
		Token::Ref {
			stack: ConstructId::new("Stack").unwrap(),
			logical_id: LogicalId::for_output(&ConstructId::new("pool").unwrap()),
		}
	}

	#[test]
	fn test_ref_renders_intrinsic() {
		let token = pool_ref();
		assert_eq!(token.to_template(), json!({ "Ref": "pool" }));
		assert_eq!(token.stack().as_str(), "Stack");
	}

	#[test]
	fn test_display_is_opaque_and_non_empty() {
		let token = pool_ref();
		assert_eq!(token.to_string(), "${Token[Ref.pool]}");
	}
}
