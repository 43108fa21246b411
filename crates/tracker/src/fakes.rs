//! Lightweight stand-ins for the external collaborators.
//!
//! Enough structure to exercise the tracker in tests; nowhere near a real
//! HTML/CSS grammar or abbreviation parser. Available to other crates through
//! the `test-support` feature.

use std::cell::Cell;

use abbrev_primitives::{CharIdx, RopeSlice, Span};

use crate::abbreviation::{AbbreviationParser, Extracted, Extractor, ParseError, ParseResult};
use crate::context::{AbbreviationKind, UserConfig};
use crate::error::StructureError;
use crate::structure::{
	CssContext, CssContextProvider, HtmlContext, HtmlContextProvider, HtmlQueryOptions, HtmlTag, HtmlToken, HtmlTokenKind, RawAttribute,
};

const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// Scans tags from the start of the buffer up to the queried position.
///
/// Handles open/close/self-closing tags, void elements and comments. Does not
/// report embedded stylesheets.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScanHtml;

impl HtmlContextProvider for ScanHtml {
	fn html_context(&self, text: RopeSlice<'_>, pos: CharIdx, options: HtmlQueryOptions) -> Result<HtmlContext, StructureError> {
		let chars: Vec<char> = text.chars().collect();
		if pos > chars.len() {
			return Err(StructureError(format!("position {pos} past end of {} chars", chars.len())));
		}

		let mut ancestors: Vec<HtmlTag> = Vec::new();
		let mut i = 0;
		while i < pos {
			if chars[i] != '<' {
				i += 1;
				continue;
			}

			if starts_with(&chars, i, "<!--") {
				let end = find(&chars, i + 4, "-->").map_or(chars.len(), |e| e + 3);
				if pos > i && pos < end {
					return Ok(with_current(ancestors, HtmlTokenKind::Comment, Span { start: i, end }));
				}
				i = end;
				continue;
			}

			let end = chars[i..].iter().position(|&c| c == '>').map_or(chars.len(), |p| i + p + 1);
			let span = Span { start: i, end };
			let closed = chars[end - 1] == '>';
			let inner: String = chars[i + 1..if closed { end - 1 } else { end }].iter().collect();

			if let Some(name) = inner.strip_prefix('/') {
				if pos > i && pos < end {
					return Ok(with_current(ancestors, HtmlTokenKind::CloseTag, span));
				}
				let name = name.trim();
				if let Some(idx) = ancestors.iter().rposition(|t| names_match(&t.name, name, options.xml)) {
					ancestors.truncate(idx);
				}
			} else {
				if pos > i && (pos < end || !closed) {
					return Ok(with_current(ancestors, HtmlTokenKind::OpenTag, span));
				}
				let self_closing = inner.trim_end().ends_with('/');
				let body = inner.trim_end().trim_end_matches('/');
				let name: String = body.chars().take_while(|c| !c.is_whitespace()).collect();
				let attributes = parse_attributes(&body[name.len()..]);
				let void = !options.xml && VOID_ELEMENTS.contains(&name.to_ascii_lowercase().as_str());
				if !name.is_empty() && !self_closing && !void {
					ancestors.push(HtmlTag { name, span, attributes });
				}
			}
			i = end;
		}

		Ok(HtmlContext {
			current: None,
			ancestors,
			css: None,
		})
	}
}

fn with_current(ancestors: Vec<HtmlTag>, kind: HtmlTokenKind, span: Span) -> HtmlContext {
	HtmlContext {
		current: Some(HtmlToken { kind, span }),
		ancestors,
		css: None,
	}
}

fn names_match(a: &str, b: &str, xml: bool) -> bool {
	if xml { a == b } else { a.eq_ignore_ascii_case(b) }
}

fn starts_with(chars: &[char], at: usize, needle: &str) -> bool {
	needle.chars().enumerate().all(|(k, c)| chars.get(at + k) == Some(&c))
}

fn find(chars: &[char], from: usize, needle: &str) -> Option<usize> {
	(from..chars.len()).find(|&i| starts_with(chars, i, needle))
}

/// Splits a raw attribute list (`class="a b" id='x' disabled`).
fn parse_attributes(src: &str) -> Vec<RawAttribute> {
	let mut attrs = Vec::new();
	let mut chars = src.chars().peekable();

	loop {
		while chars.next_if(|c| c.is_whitespace()).is_some() {}
		let name: String = std::iter::from_fn(|| chars.next_if(|c| !c.is_whitespace() && *c != '=')).collect();
		if name.is_empty() {
			break;
		}

		let value = if chars.next_if_eq(&'=').is_some() {
			let mut value = String::new();
			match chars.peek().copied() {
				Some(quote @ ('"' | '\'')) => {
					value.push(quote);
					chars.next();
					for c in chars.by_ref() {
						value.push(c);
						if c == quote {
							break;
						}
					}
				}
				_ => value.extend(std::iter::from_fn(|| chars.next_if(|c| !c.is_whitespace()))),
			}
			Some(value)
		} else {
			None
		};
		attrs.push(RawAttribute { name, value });
	}
	attrs
}

/// Returns the same markup context for every query.
#[derive(Debug, Default, Clone)]
pub struct FixedHtml(pub HtmlContext);

impl HtmlContextProvider for FixedHtml {
	fn html_context(&self, _text: RopeSlice<'_>, _pos: CharIdx, _options: HtmlQueryOptions) -> Result<HtmlContext, StructureError> {
		Ok(self.0.clone())
	}
}

/// Returns the same stylesheet context for every query.
#[derive(Debug, Default, Clone)]
pub struct FixedCss(pub CssContext);

impl CssContextProvider for FixedCss {
	fn css_context(&self, _text: RopeSlice<'_>, _pos: CharIdx) -> Result<CssContext, StructureError> {
		Ok(self.0.clone())
	}
}

/// A structural parser that always fails and counts how often it was asked.
#[derive(Debug, Default)]
pub struct Failing {
	calls: Cell<usize>,
}

impl Failing {
	/// Number of queries received.
	pub fn calls(&self) -> usize {
		self.calls.get()
	}

	fn fail(&self) -> StructureError {
		self.calls.set(self.calls.get() + 1);
		StructureError("parser unavailable".into())
	}
}

impl HtmlContextProvider for Failing {
	fn html_context(&self, _text: RopeSlice<'_>, _pos: CharIdx, _options: HtmlQueryOptions) -> Result<HtmlContext, StructureError> {
		Err(self.fail())
	}
}

impl CssContextProvider for Failing {
	fn css_context(&self, _text: RopeSlice<'_>, _pos: CharIdx) -> Result<CssContext, StructureError> {
		Err(self.fail())
	}
}

/// Toy abbreviation parser.
///
/// Accepts alphanumerics and the common operator characters, requires
/// balanced brackets, and previews markup as `<abbr>` and stylesheets as
/// `abbr;`. Whitespace and `<`, `,`, `;` are errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct ToyParser;

impl ToyParser {
	fn check(abbr: &str) -> Result<(), ParseError> {
		let mut stack = Vec::new();
		for (pos, c) in abbr.chars().enumerate() {
			match c {
				'(' | '[' | '{' => stack.push(c),
				')' | ']' | '}' => {
					let open = match c {
						')' => '(',
						']' => '[',
						_ => '{',
					};
					if stack.pop() != Some(open) {
						return Err(ParseError {
							pos,
							message: format!("Unexpected '{c}'"),
						});
					}
				}
				c if c.is_alphanumeric() || ".#>+^*$@!:-_%/'\"=".contains(c) => {}
				_ => {
					return Err(ParseError {
						pos,
						message: format!("Unexpected character '{}'", c.escape_debug()),
					});
				}
			}
		}
		if stack.is_empty() {
			Ok(())
		} else {
			Err(ParseError {
				pos: abbr.chars().count(),
				message: "Unexpected end of abbreviation".into(),
			})
		}
	}
}

impl AbbreviationParser for ToyParser {
	fn parse(&self, abbr: &str, config: &UserConfig) -> ParseResult {
		match Self::check(abbr) {
			Ok(()) => ParseResult::Valid {
				abbr: abbr.to_string(),
				preview: match config.kind {
					AbbreviationKind::Markup => format!("<{abbr}>"),
					AbbreviationKind::Stylesheet => format!("{abbr};"),
				},
			},
			Err(error) => ParseResult::Error {
				abbr: abbr.to_string(),
				error,
			},
		}
	}
}

/// Extracts the run of non-whitespace characters ending at the position.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordExtractor;

impl Extractor for WordExtractor {
	fn extract(&self, text: RopeSlice<'_>, pos: CharIdx, _syntax: &str, prefix: Option<&str>) -> Option<Extracted> {
		let pos = pos.min(text.len_chars());
		let mut start = pos;
		while start > 0 && !text.char(start - 1).is_whitespace() {
			start -= 1;
		}

		if let Some(prefix) = prefix {
			let plen = prefix.chars().count();
			if pos - start < plen || text.slice(start..start + plen) != prefix {
				return None;
			}
			start += plen;
		}

		(start < pos).then(|| Extracted {
			start,
			end: pos,
			abbr: text.slice(start..pos).to_string(),
		})
	}
}

#[cfg(test)]
mod tests {
	use abbrev_primitives::Rope;
	use pretty_assertions::assert_eq;

	use super::*;

	fn scan(src: &str, pos: CharIdx) -> HtmlContext {
		let rope = Rope::from(src);
		ScanHtml.html_context(rope.slice(..), pos, HtmlQueryOptions::default()).unwrap()
	}

	#[test]
	fn test_scan_between_tags() {
		let ctx = scan(r#"<div class="x"></div>"#, 15);
		assert!(ctx.current.is_none());
		assert_eq!(ctx.ancestors.len(), 1);
		assert_eq!(ctx.ancestors[0].name, "div");
		assert_eq!(ctx.ancestors[0].attributes, vec![RawAttribute::new("class", Some("\"x\""))]);
	}

	#[test]
	fn test_scan_inside_tag() {
		let ctx = scan("<div  ></div>", 5);
		assert_eq!(ctx.current.map(|t| t.kind), Some(HtmlTokenKind::OpenTag));
	}

	#[test]
	fn test_scan_closed_and_void_elements() {
		let ctx = scan("<ul><li></li><br><img/></ul><p>", 31);
		let names: Vec<_> = ctx.ancestors.iter().map(|t| t.name.as_str()).collect();
		assert_eq!(names, vec!["p"]);
	}

	#[test]
	fn test_scan_comment() {
		let ctx = scan("<div><!-- note --></div>", 8);
		assert_eq!(ctx.current.map(|t| t.kind), Some(HtmlTokenKind::Comment));
	}

	#[test]
	fn test_parse_attributes() {
		assert_eq!(
			parse_attributes(r#" id='a b' hidden data-x=1"#),
			vec![
				RawAttribute::new("id", Some("'a b'")),
				RawAttribute::new("hidden", None),
				RawAttribute::new("data-x", Some("1")),
			]
		);
	}

	#[test]
	fn test_toy_parser_errors() {
		assert_eq!(ToyParser::check("ul>li.item$*3"), Ok(()));
		assert_eq!(ToyParser::check("div p").unwrap_err().pos, 3);
		assert_eq!(ToyParser::check("(a").unwrap_err().pos, 2);
		assert_eq!(ToyParser::check("a)").unwrap_err().pos, 1);
	}

	#[test]
	fn test_word_extractor_prefix() {
		let rope = Rope::from("x <div");
		let found = WordExtractor.extract(rope.slice(..), 6, "jsx", Some("<")).unwrap();
		assert_eq!((found.start, found.end, found.abbr.as_str()), (3, 6, "div"));
		assert!(WordExtractor.extract(rope.slice(..), 1, "jsx", Some("<")).is_none());
	}
}
