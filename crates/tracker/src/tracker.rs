//! The tracked abbreviation record.

use abbrev_primitives::{CharLen, Span};

use crate::abbreviation::ParseResult;
use crate::context::UserConfig;

/// The single live abbreviation an editor session may hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedAbbreviation {
	/// Buffer span, prefix included.
	pub range: Span,
	/// Explicitly requested; exempt from the stop heuristics.
	pub forced: bool,
	/// Leading prefix characters (e.g. the JSX `<`) excluded from the text.
	pub offset: CharLen,
	/// Latest parse of the abbreviation text. [`None`] when the text is empty.
	pub parse_result: Option<ParseResult>,
	/// Context captured when tracking started; reused for every re-parse.
	pub activation_options: UserConfig,
}

impl TrackedAbbreviation {
	/// Span of the abbreviation text itself, prefix excluded.
	pub fn abbreviation_span(&self) -> Span {
		Span {
			start: (self.range.start + self.offset).min(self.range.end),
			end: self.range.end,
		}
	}

	/// Current abbreviation text, if any.
	pub fn abbreviation(&self) -> Option<&str> {
		self.parse_result.as_ref().map(ParseResult::abbr)
	}

	/// Preview of the expansion when the text parses.
	pub fn preview(&self) -> Option<&str> {
		self.parse_result.as_ref().and_then(ParseResult::preview)
	}
}
