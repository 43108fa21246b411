//! Abbreviation start detection.
//!
//! Each rule is a pair of character classes over the window right before the
//! caret: a boundary character (or the start of the buffer) followed by the
//! character just typed.

use abbrev_config::Config;
use abbrev_language::{SyntaxClass, classify};
use abbrev_primitives::{CharIdx, CharLen, RopeSlice, Span};
use tracing::trace;

use crate::context::{AbbreviationKind, UserConfig, resolve_activation};
use crate::structure::Structure;

/// The two characters before the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
	/// Character before the typed one; [`None`] at the start of the buffer.
	pub before: Option<char>,
	/// The character just typed.
	pub last: char,
}

impl Window {
	/// Reads the window ending at `pos`.
	pub fn at(text: RopeSlice<'_>, pos: CharIdx) -> Option<Self> {
		if pos == 0 || pos > text.len_chars() {
			return None;
		}
		Some(Self {
			before: pos.checked_sub(2).map(|i| text.char(i)),
			last: text.char(pos - 1),
		})
	}
}

/// Whitespace, a quote, `>` or `;`.
pub fn is_markup_boundary(c: char) -> bool {
	c.is_whitespace() || matches!(c, '>' | ';' | '"' | '\'')
}

/// Letters and the markup operators that may open an abbreviation.
pub fn is_markup_start(c: char) -> bool {
	c.is_ascii_alphabetic() || matches!(c, '.' | '#' | '!' | '@' | '[' | '(')
}

/// Whitespace or `;`.
pub fn is_stylesheet_boundary(c: char) -> bool {
	c.is_whitespace() || c == ';'
}

/// Letters, `!` and `@`.
pub fn is_stylesheet_start(c: char) -> bool {
	c.is_ascii_alphabetic() || matches!(c, '!' | '@')
}

/// Characters that may follow the JSX prefix.
pub fn is_jsx_start(c: char) -> bool {
	c.is_ascii_alphabetic() || matches!(c, '.' | '#' | '[' | '(')
}

/// Generic word-boundary rule for non-JSX syntaxes.
pub fn markup_rule(w: Window) -> bool {
	is_markup_start(w.last) && w.before.is_none_or(is_markup_boundary)
}

/// Stricter rule applied once the context resolves to a stylesheet.
pub fn stylesheet_rule(w: Window) -> bool {
	is_stylesheet_start(w.last) && w.before.is_none_or(is_stylesheet_boundary)
}

/// Closing counterpart of an opening bracket.
pub fn closer_for(c: char) -> Option<char> {
	match c {
		'(' => Some(')'),
		'[' => Some(']'),
		'{' => Some('}'),
		_ => None,
	}
}

/// A span that may start tracking, before context validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
	/// Span to track, including any prefix and absorbed closer.
	pub span: Span,
	/// Prefix characters that are not part of the abbreviation text.
	pub offset: CharLen,
}

/// Applies the typing heuristics at `pos` without consulting the context.
pub fn candidate(class: SyntaxClass, text: RopeSlice<'_>, pos: CharIdx, jsx_prefix: &str) -> Option<Candidate> {
	let window = Window::at(text, pos)?;

	let (start, offset) = match class {
		SyntaxClass::JsxMarkup => {
			let prefix_len = jsx_prefix.chars().count();
			let start = pos.checked_sub(prefix_len + 1)?;
			if prefix_len == 0 || text.slice(start..pos - 1) != jsx_prefix || !is_jsx_start(window.last) {
				return None;
			}
			(start, prefix_len)
		}
		SyntaxClass::Markup | SyntaxClass::Stylesheet => {
			if !markup_rule(window) {
				return None;
			}
			(pos - 1, 0)
		}
		SyntaxClass::Unsupported => return None,
	};

	let absorbs_closer = closer_for(window.last).is_some_and(|closer| text.get_char(pos) == Some(closer));
	let end = if absorbs_closer { pos + 1 } else { pos };

	Some(Candidate {
		span: Span { start, end },
		offset,
	})
}

/// A validated start: where to track and under which context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detected {
	/// Span and prefix offset.
	pub candidate: Candidate,
	/// Activation context resolved at the caret.
	pub config: UserConfig,
}

/// Decides whether the edit that placed the caret at `pos` starts an abbreviation.
pub fn detect_start(structure: Structure<'_>, config: &Config, text: RopeSlice<'_>, pos: CharIdx, syntax: &str) -> Option<Detected> {
	let class = classify(syntax);
	let candidate = candidate(class, text, pos, &config.abbreviation.jsx_prefix)?;

	let Some(user) = resolve_activation(structure, config, text, pos, syntax) else {
		trace!(pos, syntax, "Abbreviation start rejected: no activation context");
		return None;
	};

	if user.kind == AbbreviationKind::Stylesheet && !Window::at(text, pos).is_some_and(stylesheet_rule) {
		trace!(pos, syntax, "Abbreviation start rejected: stylesheet word boundary");
		return None;
	}

	Some(Detected { candidate, config: user })
}

#[cfg(test)]
mod tests {
	use abbrev_primitives::Rope;
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::fakes::{FixedCss, FixedHtml, ScanHtml};
	use crate::structure::{CssContext, CssToken, CssTokenKind};

	fn cand(class: SyntaxClass, src: &str, pos: CharIdx) -> Option<Candidate> {
		let rope = Rope::from(src);
		candidate(class, rope.slice(..), pos, "<")
	}

	fn window(before: Option<char>, last: char) -> Window {
		Window { before, last }
	}

	#[test]
	fn test_markup_rule() {
		assert!(markup_rule(window(None, 'd')));
		assert!(markup_rule(window(Some(' '), '.')));
		assert!(markup_rule(window(Some('>'), '#')));
		assert!(markup_rule(window(Some('"'), '[')));
		assert!(markup_rule(window(Some(';'), '(')));
		assert!(!markup_rule(window(Some('a'), 'b')));
		assert!(!markup_rule(window(Some(' '), '1')));
		assert!(!markup_rule(window(Some(' '), '>')));
	}

	#[test]
	fn test_stylesheet_rule_is_stricter() {
		assert!(stylesheet_rule(window(Some(' '), 'p')));
		assert!(stylesheet_rule(window(Some(';'), '@')));
		assert!(stylesheet_rule(window(None, '!')));
		assert!(!stylesheet_rule(window(Some('>'), 'p')));
		assert!(!stylesheet_rule(window(Some('"'), 'p')));
		assert!(!stylesheet_rule(window(Some(' '), '.')));
		assert!(!stylesheet_rule(window(Some(' '), '#')));
	}

	#[test]
	fn test_jsx_start_chars() {
		for c in ['a', 'Z', '.', '#', '[', '('] {
			assert!(is_jsx_start(c), "{c}");
		}
		assert!(!is_jsx_start('!'));
		assert!(!is_jsx_start('/'));
	}

	#[test]
	fn test_markup_candidate() {
		assert_eq!(
			cand(SyntaxClass::Markup, "a p", 3),
			Some(Candidate {
				span: Span { start: 2, end: 3 },
				offset: 0
			})
		);
		assert_eq!(cand(SyntaxClass::Markup, "ap", 2), None);
		assert_eq!(cand(SyntaxClass::Markup, "", 0), None);
	}

	#[test]
	fn test_closer_is_absorbed() {
		assert_eq!(cand(SyntaxClass::Markup, " ()", 2).map(|c| c.span), Some(Span { start: 1, end: 3 }));
		assert_eq!(cand(SyntaxClass::Markup, " []", 2).map(|c| c.span), Some(Span { start: 1, end: 3 }));
		assert_eq!(cand(SyntaxClass::Markup, " (]", 2).map(|c| c.span), Some(Span { start: 1, end: 2 }));
	}

	#[test]
	fn test_jsx_candidate() {
		assert_eq!(
			cand(SyntaxClass::JsxMarkup, "return <d", 9),
			Some(Candidate {
				span: Span { start: 7, end: 9 },
				offset: 1
			})
		);
		assert_eq!(cand(SyntaxClass::JsxMarkup, "return d", 8), None);
		assert_eq!(cand(SyntaxClass::JsxMarkup, "<!", 2), None);
		assert_eq!(cand(SyntaxClass::JsxMarkup, "d", 1), None);
	}

	#[test]
	fn test_custom_jsx_prefix() {
		let rope = Rope::from("x <<div");
		let found = candidate(SyntaxClass::JsxMarkup, rope.slice(..), 5, "<<").unwrap();
		assert_eq!(found.span, Span { start: 2, end: 5 });
		assert_eq!(found.offset, 2);
	}

	#[test]
	fn test_unsupported_never_starts() {
		assert_eq!(cand(SyntaxClass::Unsupported, " p", 2), None);
	}

	#[test]
	fn test_detect_requires_context() {
		let rope = Rope::from("<div p></div>");
		let structure = Structure {
			html: &ScanHtml,
			css: &FixedCss::default(),
		};
		// Caret inside the opening tag's attribute list.
		assert_eq!(detect_start(structure, &Config::default(), rope.slice(..), 6, "html"), None);
	}

	#[test]
	fn test_detect_applies_stylesheet_boundary() {
		let css = FixedCss(CssContext {
			current: Some(CssToken::new(CssTokenKind::PropertyName, "p", Span { start: 4, end: 5 })),
			ancestors: vec![],
			inline: false,
		});
		let html = FixedHtml::default();
		let structure = Structure { html: &html, css: &css };

		let rope = Rope::from("a { p");
		assert!(detect_start(structure, &Config::default(), rope.slice(..), 5, "css").is_some());

		// `.` passes the generic rule but not the stylesheet one.
		let rope = Rope::from("a { .");
		assert_eq!(detect_start(structure, &Config::default(), rope.slice(..), 5, "css"), None);

		// `>` is a markup boundary only.
		let rope = Rope::from("a {>p");
		assert_eq!(detect_start(structure, &Config::default(), rope.slice(..), 5, "css"), None);
	}
}
