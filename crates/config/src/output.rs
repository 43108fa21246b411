//! Output formatting preferences handed to the abbreviation expander.
//!
//! The tracker treats these as opaque: it captures them into every activation
//! context so that previews and the final expansion agree on formatting.

use kdl::KdlNode;

use crate::error::{ConfigError, ConfigWarning, Result};
use crate::kdl_util::{node_name, small_int_arg, string_arg};

/// Attribute quote style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
	/// `class="x"`
	#[default]
	Double,
	/// `class='x'`
	Single,
}

/// How empty elements are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelfClosingStyle {
	/// `<br>`
	#[default]
	Html,
	/// `<br />`
	Xhtml,
	/// `<br/>`
	Xml,
}

/// Formatting options for expanded output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
	/// One level of indentation.
	pub indent: String,
	/// Attribute quoting.
	pub quotes: QuoteStyle,
	/// Empty element closing.
	pub self_closing: SelfClosingStyle,
	/// Produce single-line output (inline `style` attributes).
	pub inline: bool,
}

impl Default for OutputOptions {
	fn default() -> Self {
		Self {
			indent: "\t".to_string(),
			quotes: QuoteStyle::default(),
			self_closing: SelfClosingStyle::default(),
			inline: false,
		}
	}
}

impl OutputOptions {
	/// Returns a copy with single-line output enabled.
	pub fn inline(&self) -> Self {
		Self {
			inline: true,
			..self.clone()
		}
	}
}

/// Parses an `output { ... }` block on top of `base`.
pub(crate) fn parse_output_node(node: &KdlNode, base: &OutputOptions, warnings: &mut Vec<ConfigWarning>) -> Result<OutputOptions> {
	let mut out = base.clone();
	let Some(children) = node.children() else {
		return Ok(out);
	};

	for child in children.nodes() {
		match node_name(child) {
			"indent" => {
				out.indent = match small_int_arg(child, 16) {
					Some(width) => " ".repeat(width),
					None => string_arg(child, "a string or a space count up to 16")?.to_string(),
				};
			}
			"quotes" => {
				out.quotes = match string_arg(child, "\"double\" or \"single\"")? {
					"double" => QuoteStyle::Double,
					"single" => QuoteStyle::Single,
					_ => return Err(invalid(child, "\"double\" or \"single\"")),
				};
			}
			"self-closing" => {
				out.self_closing = match string_arg(child, "\"html\", \"xhtml\" or \"xml\"")? {
					"html" => SelfClosingStyle::Html,
					"xhtml" => SelfClosingStyle::Xhtml,
					"xml" => SelfClosingStyle::Xml,
					_ => return Err(invalid(child, "\"html\", \"xhtml\" or \"xml\"")),
				};
			}
			other => warnings.push(ConfigWarning::UnknownKey {
				section: "output".into(),
				key: other.into(),
			}),
		}
	}

	Ok(out)
}

fn invalid(node: &KdlNode, expected: &'static str) -> ConfigError {
	ConfigError::InvalidValue {
		key: node_name(node).to_string(),
		expected,
	}
}
