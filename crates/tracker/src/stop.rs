//! Stop conditions for a tracked abbreviation.

use abbrev_primitives::CharIdx;

use crate::abbreviation::{ParseResult, TAB_STOP};
use crate::tracker::TrackedAbbreviation;

/// Why tracking ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
	/// Stop command or document teardown.
	Explicit,
	/// A new tracker replaced this one.
	Replaced,
	/// An edit straddled the span boundary or the span left the buffer.
	Invalidated,
	/// Completions were switched off for the syntax while typing.
	Disabled,
	/// No abbreviation text left.
	NoAbbreviation,
	/// The text spans multiple lines.
	Multiline,
	/// The text contains a tab stop and was already expanded.
	Expanded,
	/// The character just typed at the end of the span does not parse.
	InvalidLastChar,
	/// The parse fails at the very first character.
	ErrorAtStart,
	/// The caret sits right before trailing closers of an invalid body.
	EdgeOfCloser,
}

/// Decides whether `tracked` must stop given the caret. [`None`] keeps tracking.
///
/// Forced trackers are never stopped here.
pub fn should_stop(tracked: &TrackedAbbreviation, caret: CharIdx) -> Option<StopReason> {
	if tracked.forced {
		return None;
	}

	let Some(parse) = &tracked.parse_result else {
		return Some(StopReason::NoAbbreviation);
	};

	let abbr = parse.abbr();
	if abbr.contains(['\n', '\r']) {
		return Some(StopReason::Multiline);
	}
	if abbr.contains(TAB_STOP) {
		return Some(StopReason::Expanded);
	}

	let ParseResult::Error { error, .. } = parse else {
		return None;
	};

	let range = tracked.range;
	if caret == range.end {
		return Some(StopReason::InvalidLastChar);
	}
	if error.pos == 0 {
		return Some(StopReason::ErrorAtStart);
	}

	let trailing_closers = abbr.chars().rev().take_while(|c| matches!(c, ')' | ']' | '}')).count();
	(caret == range.end.saturating_sub(trailing_closers)).then_some(StopReason::EdgeOfCloser)
}

#[cfg(test)]
mod tests {
	use abbrev_config::OutputOptions;
	use abbrev_primitives::Span;
	use proptest::prelude::*;

	use super::*;
	use crate::abbreviation::ParseError;
	use crate::context::UserConfig;

	fn tracked(start: usize, abbr: &str, error_pos: Option<usize>, forced: bool) -> TrackedAbbreviation {
		let parse = match error_pos {
			None => ParseResult::Valid {
				abbr: abbr.into(),
				preview: format!("<{abbr}>"),
			},
			Some(pos) => ParseResult::Error {
				abbr: abbr.into(),
				error: ParseError {
					pos,
					message: "bad".into(),
				},
			},
		};
		TrackedAbbreviation {
			range: Span {
				start,
				end: start + abbr.chars().count(),
			},
			forced,
			offset: 0,
			parse_result: Some(parse),
			activation_options: UserConfig::for_syntax("html", &OutputOptions::default()).unwrap(),
		}
	}

	#[test]
	fn test_valid_keeps_tracking() {
		assert_eq!(should_stop(&tracked(0, "ul>li", None, false), 5), None);
	}

	#[test]
	fn test_missing_abbreviation_stops() {
		let mut t = tracked(0, "a", None, false);
		t.parse_result = None;
		assert_eq!(should_stop(&t, 0), Some(StopReason::NoAbbreviation));
	}

	#[test]
	fn test_line_break_stops() {
		assert_eq!(should_stop(&tracked(0, "a\nb", None, false), 3), Some(StopReason::Multiline));
		assert_eq!(should_stop(&tracked(0, "a\r", None, false), 2), Some(StopReason::Multiline));
	}

	#[test]
	fn test_tab_stop_stops_even_when_valid() {
		let abbr = format!("div{TAB_STOP}");
		assert_eq!(should_stop(&tracked(0, &abbr, None, false), 1), Some(StopReason::Expanded));
	}

	#[test]
	fn test_error_at_caret_end_stops() {
		assert_eq!(should_stop(&tracked(10, "div p", Some(3), false), 15), Some(StopReason::InvalidLastChar));
	}

	#[test]
	fn test_error_at_start_stops() {
		assert_eq!(should_stop(&tracked(10, ")div", Some(0), false), 12), Some(StopReason::ErrorAtStart));
	}

	#[test]
	fn test_caret_before_trailing_closers_stops() {
		// `a,b)]` with the caret right before `)]`.
		let t = tracked(0, "a,b)]", Some(1), false);
		assert_eq!(should_stop(&t, 3), Some(StopReason::EdgeOfCloser));
	}

	#[test]
	fn test_recoverable_error_keeps_tracking() {
		let t = tracked(0, "a,b)]", Some(1), false);
		assert_eq!(should_stop(&t, 2), None);
		let t = tracked(0, "(ab", Some(3), false);
		assert_eq!(should_stop(&t, 1), None);
	}

	#[test]
	fn test_forced_never_stops() {
		let mut t = tracked(0, "a\nb", Some(0), true);
		assert_eq!(should_stop(&t, 3), None);
		t.parse_result = None;
		assert_eq!(should_stop(&t, 0), None);
	}

	proptest! {
		#[test]
		fn forced_tracker_never_stops(
			abbr in "[a-z()\\[\\]{}\\n\\x00 ,]{0,12}",
			error_pos in proptest::option::of(0usize..12),
			caret in 0usize..20,
		) {
			let t = tracked(0, &abbr, error_pos, true);
			prop_assert_eq!(should_stop(&t, caret), None);
		}

		#[test]
		fn tab_stop_always_stops_unforced(
			head in "[a-z>.#]{0,6}",
			tail in "[a-z>.#]{0,6}",
			error_pos in proptest::option::of(0usize..12),
			caret in 0usize..20,
		) {
			let abbr = format!("{head}{TAB_STOP}{tail}");
			let t = tracked(0, &abbr, error_pos, false);
			prop_assert_eq!(should_stop(&t, caret), Some(StopReason::Expanded));
		}
	}
}
