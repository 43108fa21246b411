//! Small accessors over KDL nodes with typed errors.

use kdl::KdlNode;

use crate::error::{ConfigError, Result};

/// Name of a node as a plain string.
pub fn node_name(node: &KdlNode) -> &str {
	node.name().value()
}

/// First positional argument as a boolean.
pub fn bool_arg(node: &KdlNode) -> Result<bool> {
	node.get(0).and_then(|v| v.as_bool()).ok_or_else(|| ConfigError::InvalidValue {
		key: node_name(node).to_string(),
		expected: "a boolean (#true or #false)",
	})
}

/// First positional argument as a string.
pub fn string_arg<'a>(node: &'a KdlNode, expected: &'static str) -> Result<&'a str> {
	node.get(0).and_then(|v| v.as_string()).ok_or_else(|| ConfigError::InvalidValue {
		key: node_name(node).to_string(),
		expected,
	})
}

/// First positional argument as a non-negative integer no larger than `max`.
pub fn small_int_arg(node: &KdlNode, max: i128) -> Option<usize> {
	node.get(0)
		.and_then(|v| v.as_integer())
		.filter(|n| (0..=max).contains(n))
		.and_then(|n| usize::try_from(n).ok())
}
