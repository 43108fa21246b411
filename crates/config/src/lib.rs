//! Configuration for abbreviation tracking.
//!
//! Configuration is written in KDL (v2) format:
//!
//! ```kdl
//! abbreviation {
//!     completions #true
//!     jsx-prefix "<"
//!     stylesheet-syntax "css"
//! }
//!
//! output {
//!     indent 2
//!     quotes "single"
//!     self-closing "xhtml"
//! }
//!
//! // Per-syntax overrides
//! language "scss" {
//!     completions #false
//! }
//! ```
//!
//! Unknown keys are reported as [`ConfigWarning`]s rather than failing the
//! load. Use [`SharedConfig`] to publish a configuration that can be swapped
//! while editors keep reading it.

pub mod error;
pub mod kdl_util;
pub mod output;
pub mod shared;

use std::path::Path;

use abbrev_language::{DEFAULT_STYLESHEET_SYNTAX, is_stylesheet_syntax};
use kdl::{KdlDocument, KdlNode};
use tracing::debug;

pub use error::{ConfigError, ConfigWarning, Result};
pub use output::{OutputOptions, QuoteStyle, SelfClosingStyle};
pub use shared::SharedConfig;

use crate::kdl_util::{bool_arg, node_name, string_arg};

/// Trigger prefix for JSX abbreviations: `<div` starts tracking `div`.
pub const DEFAULT_JSX_PREFIX: &str = "<";

/// Settings of the `abbreviation { }` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbbreviationConfig {
	/// Start tracking abbreviations automatically while typing.
	pub completions: bool,
	/// Prefix that introduces a JSX abbreviation.
	pub jsx_prefix: String,
	/// Syntax for `<style>` blocks that do not declare a `type`.
	pub stylesheet_syntax: String,
}

impl Default for AbbreviationConfig {
	fn default() -> Self {
		Self {
			completions: true,
			jsx_prefix: DEFAULT_JSX_PREFIX.to_string(),
			stylesheet_syntax: DEFAULT_STYLESHEET_SYNTAX.to_string(),
		}
	}
}

/// Per-syntax overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
	/// Syntax name (e.g., "scss", "html").
	pub name: String,
	/// Overrides [`AbbreviationConfig::completions`] for this syntax.
	pub completions: Option<bool>,
}

/// Parsed configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
	/// Abbreviation tracking settings.
	pub abbreviation: AbbreviationConfig,
	/// Output formatting preferences.
	pub output: OutputOptions,
	/// Per-syntax overrides.
	pub languages: Vec<LanguageConfig>,
	/// Non-fatal warnings encountered during parsing.
	pub warnings: Vec<ConfigWarning>,
}

impl Config {
	/// Parse a KDL string into a [`Config`].
	///
	/// Non-fatal warnings are collected in `Config::warnings` rather than
	/// causing parse failure.
	pub fn parse(input: &str) -> Result<Self> {
		let doc: KdlDocument = input.parse()?;
		let mut config = Config::default();

		for node in doc.nodes() {
			match node_name(node) {
				"abbreviation" => parse_abbreviation_node(node, &mut config.abbreviation, &mut config.warnings)?,
				"output" => {
					config.output = output::parse_output_node(node, &config.output, &mut config.warnings)?;
				}
				"language" => {
					if let Some(lang) = parse_language_node(node, &mut config.warnings)? {
						config.languages.push(lang);
					}
				}
				other => config.warnings.push(ConfigWarning::UnknownKey {
					section: "root".into(),
					key: other.into(),
				}),
			}
		}

		Ok(config)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		let config = Self::parse(&content)?;
		debug!(path = %path.display(), warnings = config.warnings.len(), "Loaded abbreviation config");
		Ok(config)
	}

	/// Merge another config into this one.
	///
	/// Values from `other` override values in `self`; language overrides
	/// for the same syntax are replaced.
	pub fn merge(&mut self, other: Config) {
		self.abbreviation = other.abbreviation;
		self.output = other.output;
		for lang in other.languages {
			self.languages.retain(|l| !l.name.eq_ignore_ascii_case(&lang.name));
			self.languages.push(lang);
		}
		self.warnings.extend(other.warnings);
	}

	/// Whether typing may start tracking in `syntax`.
	///
	/// A per-language override wins over the global flag.
	pub fn completions_enabled(&self, syntax: &str) -> bool {
		self.languages
			.iter()
			.rev()
			.find(|l| l.name.eq_ignore_ascii_case(syntax))
			.and_then(|l| l.completions)
			.unwrap_or(self.abbreviation.completions)
	}
}

fn parse_abbreviation_node(node: &KdlNode, abbr: &mut AbbreviationConfig, warnings: &mut Vec<ConfigWarning>) -> Result<()> {
	let Some(children) = node.children() else {
		return Ok(());
	};

	for child in children.nodes() {
		match node_name(child) {
			"completions" => abbr.completions = bool_arg(child)?,
			"jsx-prefix" => {
				let prefix = string_arg(child, "a non-empty string")?;
				if prefix.is_empty() {
					return Err(ConfigError::InvalidValue {
						key: "jsx-prefix".into(),
						expected: "a non-empty string",
					});
				}
				abbr.jsx_prefix = prefix.to_string();
			}
			"stylesheet-syntax" => {
				let syntax = string_arg(child, "a stylesheet syntax name")?;
				if is_stylesheet_syntax(syntax) {
					abbr.stylesheet_syntax = syntax.to_ascii_lowercase();
				} else {
					abbr.stylesheet_syntax = DEFAULT_STYLESHEET_SYNTAX.to_string();
					warnings.push(ConfigWarning::NotStylesheet(syntax.to_string()));
				}
			}
			other => warnings.push(ConfigWarning::UnknownKey {
				section: "abbreviation".into(),
				key: other.into(),
			}),
		}
	}
	Ok(())
}

fn parse_language_node(node: &KdlNode, warnings: &mut Vec<ConfigWarning>) -> Result<Option<LanguageConfig>> {
	let Some(name) = node.get(0).and_then(|v| v.as_string()) else {
		warnings.push(ConfigWarning::UnnamedLanguage);
		return Ok(None);
	};

	let mut lang = LanguageConfig {
		name: name.to_string(),
		completions: None,
	};

	if let Some(children) = node.children() {
		for child in children.nodes() {
			match node_name(child) {
				"completions" => lang.completions = Some(bool_arg(child)?),
				other => warnings.push(ConfigWarning::UnknownKey {
					section: format!("language \"{name}\""),
					key: other.into(),
				}),
			}
		}
	}

	Ok(Some(lang))
}
