//! Error types for configuration parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing KDL syntax.
	#[error("KDL parse error: {0}")]
	Kdl(#[from] kdl::KdlError),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A node is present but its value has the wrong type or is out of range.
	#[error("invalid value for '{key}': expected {expected}")]
	InvalidValue {
		/// Node name.
		key: String,
		/// Human-readable description of the accepted values.
		expected: &'static str,
	},
}

/// Non-fatal problems found while parsing.
///
/// These are collected in [`crate::Config::warnings`] instead of failing the load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigWarning {
	/// A node name that no section understands.
	#[error("unknown key '{key}' in '{section}' block will be ignored")]
	UnknownKey {
		/// Enclosing block name.
		section: String,
		/// The unrecognized node name.
		key: String,
	},

	/// `stylesheet-syntax` names something that is not a stylesheet language.
	#[error("'{0}' is not a stylesheet syntax, falling back to css")]
	NotStylesheet(String),

	/// A `language` block without a name argument.
	#[error("language block without a name will be ignored")]
	UnnamedLanguage,
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
