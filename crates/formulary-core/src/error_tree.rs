//! Validation error trees
//!
//! An [`ErrorTree`] mirrors the shape of the validated values: each key is a
//! field name and each leaf is an error message. Trees are built by folding
//! flat `(path, message)` pairs, where a path uses dot and bracket notation
//! (`user.email`, `items[0].name`).
//!
//! ```
//! use formulary_core::ErrorTree;
//! use serde_json::json;
//!
//! let mut tree = ErrorTree::new();
//! tree.set("user.email", "must be a valid email");
//! tree.set("items[1].name", "is required");
//!
//! assert_eq!(
//!     serde_json::Value::from(tree),
//!     json!({
//!         "items": [null, { "name": "is required" }],
//!         "user": { "email": "must be a valid email" }
//!     })
//! );
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Nested mapping of field path to error message(s).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorTree(Map<String, Value>);

impl ErrorTree {
	/// Key holding the messages of a field that also has nested errors.
	pub const OWN_ERRORS_KEY: &'static str = "_errors";

	/// Creates an empty tree.
	pub fn new() -> Self {
		Self(Map::new())
	}

	/// Returns true when no field carries an error.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Number of top-level keys.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Sets `message` at `path`.
	///
	/// Returns `false` and leaves the tree untouched when the path has no
	/// segments, so an absent path never produces an empty key.
	pub fn set(&mut self, path: &str, message: impl Into<String>) -> bool {
		self.set_value(path, Value::String(message.into()))
	}

	/// Sets an arbitrary JSON value at `path`.
	///
	/// Intermediate containers are created as arrays when the following
	/// segment is a small non-negative integer and as objects otherwise. A
	/// numeric segment far past the end of an array turns that array into an
	/// object keyed by index. An existing leaf on the way down is replaced by
	/// a container; an existing value at the full path is overwritten.
	pub fn set_value(&mut self, path: &str, value: Value) -> bool {
		let segments = path_segments(path);
		if segments.is_empty() {
			return false;
		}
		let mut root = Value::Object(std::mem::take(&mut self.0));
		set_in(&mut root, &segments, value);
		if let Value::Object(map) = root {
			self.0 = map;
		}
		true
	}

	/// Looks up the value stored at `path`.
	pub fn get(&self, path: &str) -> Option<&Value> {
		let segments = path_segments(path);
		let (first, rest) = segments.split_first()?;
		rest.iter().try_fold(self.0.get(*first)?, |node, segment| match node {
			Value::Object(map) => map.get(*segment),
			Value::Array(items) => items.get(segment.parse::<usize>().ok()?),
			_ => None,
		})
	}

	/// Deep-merges `other` into this tree.
	///
	/// Objects merge key by key and arrays index by index. Two different
	/// messages on the same path are collected into an array. A message that
	/// meets nested errors on the same path is kept beside them under
	/// [`ErrorTree::OWN_ERRORS_KEY`], with array items keyed by their index.
	pub fn merge(&mut self, other: ErrorTree) {
		for (key, value) in other.0 {
			merge_into(self.0.entry(key).or_insert(Value::Null), value);
		}
	}

	/// Iterates over the top-level entries.
	pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
		self.0.iter()
	}

	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}

	pub fn into_map(self) -> Map<String, Value> {
		self.0
	}
}

impl From<ErrorTree> for Value {
	fn from(tree: ErrorTree) -> Self {
		Value::Object(tree.0)
	}
}

impl From<Map<String, Value>> for ErrorTree {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

impl<P, M> FromIterator<(P, M)> for ErrorTree
where
	P: AsRef<str>,
	M: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (P, M)>>(iter: I) -> Self {
		let mut tree = Self::new();
		for (path, message) in iter {
			tree.set(path.as_ref(), message);
		}
		tree
	}
}

/// Splits a dot/bracket path into its non-empty segments.
///
/// `"items[0].name"` yields `["items", "0", "name"]`.
pub fn path_segments(path: &str) -> Vec<&str> {
	path.split(['.', '[', ']'])
		.filter(|segment| !segment.is_empty())
		.collect()
}

fn set_in(node: &mut Value, segments: &[&str], value: Value) {
	match segments {
		[] => *node = value,
		[last] => *entry(node, last) = value,
		[head, rest @ ..] => {
			let child = entry(node, head);
			if !(child.is_object() || child.is_array()) {
				*child = container_for(rest[0]);
			}
			set_in(child, rest, value);
		}
	}
}

/// Largest number of `null` slots a numeric segment may pad an array with.
///
/// Numeric segments further out are record keys (`accounts.50000000`), not
/// list positions, and are stored as object keys instead.
const MAX_INDEX_GAP: usize = 64;

/// Parses `key` as a position in an array of `len` items.
fn array_index(key: &str, len: usize) -> Option<usize> {
	let index = key.parse::<usize>().ok()?;
	(index.saturating_sub(len) <= MAX_INDEX_GAP).then_some(index)
}

/// Returns the slot for `key` inside `node`, creating it when missing.
fn entry<'a>(node: &'a mut Value, key: &str) -> &'a mut Value {
	let index = match node {
		Value::Array(items) => array_index(key, items.len()),
		_ => None,
	};
	match (index, node) {
		(Some(index), Value::Array(items)) => {
			if items.len() <= index {
				items.resize(index + 1, Value::Null);
			}
			&mut items[index]
		}
		(_, Value::Object(map)) => map.entry(key.to_string()).or_insert(Value::Null),
		(_, node) => {
			// An array that cannot hold `key` keeps its elements under their index.
			let map = match std::mem::take(node) {
				Value::Array(items) => keyed_by_index(items),
				_ => Map::new(),
			};
			*node = Value::Object(map);
			entry(node, key)
		}
	}
}

fn container_for(next_segment: &str) -> Value {
	match array_index(next_segment, 0) {
		Some(_) => Value::Array(Vec::new()),
		None => Value::Object(Map::new()),
	}
}

fn keyed_by_index(items: Vec<Value>) -> Map<String, Value> {
	items
		.into_iter()
		.enumerate()
		.filter(|(_, value)| !value.is_null())
		.map(|(index, value)| (index.to_string(), value))
		.collect()
}

/// A single message, or two or more messages collected by [`ErrorTree::merge`].
fn is_messages(value: &Value) -> bool {
	match value {
		Value::String(_) => true,
		Value::Array(items) => is_message_list(items),
		_ => false,
	}
}

fn is_message_list(items: &[Value]) -> bool {
	items.len() > 1 && items.iter().all(Value::is_string)
}

fn collect_messages(target: &mut Value, incoming: Value) {
	let mut messages: Vec<Value> = Vec::new();
	for message in [std::mem::take(target), incoming] {
		let batch = match message {
			Value::Array(items) => items,
			message => vec![message],
		};
		for message in batch {
			if !messages.contains(&message) {
				messages.push(message);
			}
		}
	}
	*target = match messages.len() {
		1 => messages.remove(0),
		_ => Value::Array(messages),
	};
}

/// Turns any node into an object so messages and nested errors can sit side
/// by side. Messages land under [`ErrorTree::OWN_ERRORS_KEY`].
fn into_keyed(value: Value) -> Map<String, Value> {
	match value {
		Value::Object(map) => map,
		Value::Null => Map::new(),
		value if is_messages(&value) => {
			Map::from_iter([(ErrorTree::OWN_ERRORS_KEY.to_string(), value)])
		}
		Value::Array(items) => keyed_by_index(items),
		other => Map::from_iter([(ErrorTree::OWN_ERRORS_KEY.to_string(), other)]),
	}
}

fn merge_into(target: &mut Value, incoming: Value) {
	match (target, incoming) {
		(_, Value::Null) => {}
		(target, incoming) if target.is_null() => *target = incoming,
		(Value::Object(existing), Value::Object(incoming)) => {
			for (key, value) in incoming {
				merge_into(existing.entry(key).or_insert(Value::Null), value);
			}
		}
		(target, incoming) if is_messages(target) && is_messages(&incoming) => {
			collect_messages(target, incoming);
		}
		(Value::Array(existing), Value::Array(incoming))
			if !is_message_list(existing) && !is_message_list(&incoming) =>
		{
			for (index, value) in incoming.into_iter().enumerate() {
				match existing.get_mut(index) {
					Some(slot) => merge_into(slot, value),
					None => existing.push(value),
				}
			}
		}
		(target, incoming) => {
			let mut keyed = into_keyed(std::mem::take(target));
			for (key, value) in into_keyed(incoming) {
				merge_into(keyed.entry(key).or_insert(Value::Null), value);
			}
			*target = Value::Object(keyed);
		}
	}
}
