//! Interfaces to the external abbreviation parser and extractor.

use abbrev_primitives::{CharIdx, RopeSlice};

use crate::context::UserConfig;

/// Placeholder character left in the buffer by snippet expansion.
///
/// Text containing it has already been expanded and is no longer raw
/// abbreviation input.
pub const TAB_STOP: char = '\u{0}';

/// A parse failure inside abbreviation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
	/// Char offset of the failure, relative to the abbreviation text.
	pub pos: usize,
	/// Parser message.
	pub message: String,
}

/// Outcome of parsing the tracked abbreviation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseResult {
	/// The text parses; `preview` is the expansion shown to the user.
	Valid {
		/// Abbreviation text.
		abbr: String,
		/// Expanded preview.
		preview: String,
	},
	/// The text does not parse (yet).
	Error {
		/// Abbreviation text.
		abbr: String,
		/// Failure details.
		error: ParseError,
	},
}

impl ParseResult {
	/// The abbreviation text, regardless of outcome.
	pub fn abbr(&self) -> &str {
		match self {
			Self::Valid { abbr, .. } | Self::Error { abbr, .. } => abbr,
		}
	}

	/// The failure, if parsing failed.
	pub fn error(&self) -> Option<&ParseError> {
		match self {
			Self::Valid { .. } => None,
			Self::Error { error, .. } => Some(error),
		}
	}

	/// The preview, if parsing succeeded.
	pub fn preview(&self) -> Option<&str> {
		match self {
			Self::Valid { preview, .. } => Some(preview),
			Self::Error { .. } => None,
		}
	}
}

/// Parses abbreviation text against an activation context.
pub trait AbbreviationParser {
	/// Parses `abbr`. Malformed shorthand is a [`ParseResult::Error`], never a panic.
	fn parse(&self, abbr: &str, config: &UserConfig) -> ParseResult;
}

/// An abbreviation found by scanning backwards from the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
	/// Start of the abbreviation text, prefix excluded.
	pub start: CharIdx,
	/// End of the abbreviation text.
	pub end: CharIdx,
	/// The abbreviation text.
	pub abbr: String,
}

/// Finds the abbreviation that ends at a position.
pub trait Extractor {
	/// Scans `text` backwards from `pos`.
	///
	/// With `prefix`, only abbreviations introduced by that prefix are
	/// accepted; the returned span excludes it.
	fn extract(&self, text: RopeSlice<'_>, pos: CharIdx, syntax: &str, prefix: Option<&str>) -> Option<Extracted>;
}
