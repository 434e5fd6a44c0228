// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Root of the construct tree.

use tracing::debug;

use crate::error::DeclarationError;
use crate::stack::Stack;
use crate::tags::{TagMap, Taggable};

/// The construct tree root. Owns every stack declared for one synthesis run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct App {
	stacks: Vec<Stack>,
}

impl App {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a populated stack to the app and returns it.
	///
	/// Stacks are built on their own and added last, so a declaration that
	/// fails halfway never leaves a partial stack behind.
	pub fn add_stack(&mut self, stack: Stack) -> Result<&mut Stack, DeclarationError> {
		if self.stacks.iter().any(|s| s.id() == stack.id()) {
			return Err(DeclarationError::DuplicateConstructId {
				scope: "app".to_string(),
				id: stack.id().to_string(),
			});
		}

		debug!(
			stack = %stack.id(),
			environment = %stack.environment(),
			resources = stack.resources().len(),
			"added stack"
		);
		self.stacks.push(stack);
		let index = self.stacks.len() - 1;
		Ok(&mut self.stacks[index])
	}

	pub fn stacks(&self) -> &[Stack] {
		&self.stacks
	}

	pub fn stack(&self, id: &str) -> Option<&Stack> {
		self.stacks.iter().find(|s| s.id().as_str() == id)
	}

	pub fn stack_mut(&mut self, id: &str) -> Result<&mut Stack, DeclarationError> {
		self.stacks
			.iter_mut()
			.find(|s| s.id().as_str() == id)
			.ok_or_else(|| DeclarationError::UnknownStack { id: id.to_string() })
	}
}

impl Taggable for App {
	fn visit_tags(&mut self, visit: &mut dyn FnMut(&mut TagMap)) {
		for stack in &mut self.stacks {
			stack.visit_tags(visit);
		}
	}
}
