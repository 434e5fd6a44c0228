// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Transitive tagging over the construct tree.
//!
//! Tagging is an explicit pass run after construction: [`Tags::of`] wraps any
//! [`Taggable`] node and every `add` visits that node and everything beneath
//! it.
//!
//! ```ignore
//! Tags::of(&mut stack).add("flapflap", "flapflap")?;
//! ```

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::DeclarationError;

const MAX_KEY_LEN: usize = 128;
const MAX_VALUE_LEN: usize = 256;
const RESERVED_PREFIX: &str = "aws:";

/// Tags attached to a single node, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap(BTreeMap<String, String>);

impl TagMap {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Sets a tag, replacing any previous value for the key.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.0.insert(key.into(), value.into());
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
		self.0.iter()
	}

	/// Key/value object form (`{"key": "value"}`), as used by `UserPoolTags`.
	pub fn to_template_map(&self) -> Value {
		let map: Map<String, Value> = self
			.0
			.iter()
			.map(|(k, v)| (k.clone(), Value::String(v.clone())))
			.collect();
		Value::Object(map)
	}
}

/// A node of the construct tree that carries tags, possibly along with
/// children that carry their own.
pub trait Taggable {
	/// Calls `visit` on this node's tags and on the tags of every descendant.
	fn visit_tags(&mut self, visit: &mut dyn FnMut(&mut TagMap));
}

impl Taggable for TagMap {
	fn visit_tags(&mut self, visit: &mut dyn FnMut(&mut TagMap)) {
		visit(self);
	}
}

/// Tag manager scoped to one node and its subtree.
pub struct Tags<'a, T: Taggable + ?Sized> {
	target: &'a mut T,
}

impl<'a, T: Taggable + ?Sized> Tags<'a, T> {
	pub fn of(target: &'a mut T) -> Self {
		Self { target }
	}

	/// Adds `key=value` to the node and all of its descendants.
	///
	/// Returns the number of nodes tagged.
	pub fn add(&mut self, key: &str, value: &str) -> Result<usize, DeclarationError> {
		validate_tag(key, value)?;

		let mut visited = 0;
		self.target.visit_tags(&mut |tags: &mut TagMap| {
			tags.set(key, value);
			visited += 1;
		});

		debug!(key, value, nodes = visited, "applied tag");
		Ok(visited)
	}
}

/// Validates a tag against the provider's key and value limits.
pub fn validate_tag(key: &str, value: &str) -> Result<(), DeclarationError> {
	let invalid = |reason: &str| DeclarationError::InvalidTag {
		key: key.to_string(),
		reason: reason.to_string(),
	};

	if key.is_empty() {
		return Err(invalid("key must not be empty"));
	}
	if key.chars().count() > MAX_KEY_LEN {
		return Err(invalid("key must be at most 128 characters"));
	}
	if key.to_ascii_lowercase().starts_with(RESERVED_PREFIX) {
		return Err(invalid("keys starting with 'aws:' are reserved"));
	}
	if value.chars().count() > MAX_VALUE_LEN {
		return Err(invalid("value must be at most 256 characters"));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Tree {
		own: TagMap,
		children: Vec<TagMap>,
	}

	impl Taggable for Tree {
		fn visit_tags(&mut self, visit: &mut dyn FnMut(&mut TagMap)) {
			visit(&mut self.own);
			for child in &mut self.children {
				child.visit_tags(visit);
			}
		}
	}

	fn tree() -> Tree {
		Tree {
			own: TagMap::new(),
			children: vec![TagMap::new(), TagMap::new()],
		}
	}

	#[test]
	fn test_add_reaches_every_node() {
		let mut tree = tree();
		let visited = Tags::of(&mut tree).add("flapflap", "flapflap").unwrap();
		assert_eq!(visited, 3);
		assert_eq!(tree.own.get("flapflap"), Some("flapflap"));
		assert!(tree
			.children
			.iter()
			.all(|c| c.get("flapflap") == Some("flapflap")));
	}

	#[test]
	fn test_add_overwrites_existing_value() {
		let mut tree = tree();
		tree.children[0].set("team", "old");
		Tags::of(&mut tree).add("team", "new").unwrap();
		assert_eq!(tree.children[0].get("team"), Some("new"));
		assert_eq!(tree.children[0].len(), 1);
	}

	#[test]
	fn test_reserved_prefix_rejected() {
		let mut tree = tree();
		let err = Tags::of(&mut tree).add("AWS:cloudformation", "x").unwrap_err();
		assert!(matches!(err, DeclarationError::InvalidTag { .. }));
		assert!(tree.own.is_empty());
	}

	#[test]
	fn test_limits() {
		assert!(validate_tag("", "v").is_err());
		assert!(validate_tag(&"k".repeat(129), "v").is_err());
		assert!(validate_tag("k", &"v".repeat(257)).is_err());
		assert!(validate_tag(&"k".repeat(128), &"v".repeat(256)).is_ok());
		assert!(validate_tag("k", "").is_ok());
	}

	#[test]
	fn test_template_map() {
		let mut tags = TagMap::new();
		tags.set("b", "2");
		tags.set("a", "1");
		assert_eq!(
			tags.to_template_map(),
			serde_json::json!({ "a": "1", "b": "2" })
		);
	}
}
