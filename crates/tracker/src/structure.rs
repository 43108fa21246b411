//! Capability interfaces for the external HTML/CSS structural parsers.
//!
//! The tracker never parses markup or stylesheets itself. Hosts plug in real
//! parsers through [`HtmlContextProvider`] and [`CssContextProvider`]; tests
//! substitute the fakes behind the `test-support` feature.

use abbrev_primitives::{CharIdx, RopeSlice, Span};

use crate::error::StructureError;

/// Kind of a stylesheet token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssTokenKind {
	/// Rule selector (`a:hover`, `&.active`).
	Selector,
	/// Property name in a declaration.
	PropertyName,
	/// Property value in a declaration.
	PropertyValue,
}

/// A stylesheet token with its span in the queried text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssToken {
	/// Token kind.
	pub kind: CssTokenKind,
	/// Token text as reported by the parser (selector or property name).
	pub name: String,
	/// Location in the buffer.
	pub span: Span,
}

impl CssToken {
	/// Convenience constructor.
	pub fn new(kind: CssTokenKind, name: impl Into<String>, span: Span) -> Self {
		Self {
			kind,
			name: name.into(),
			span,
		}
	}
}

/// Result of a stylesheet context query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssContext {
	/// Token under the queried position, if any.
	pub current: Option<CssToken>,
	/// Enclosing selectors and properties, outermost first.
	pub ancestors: Vec<CssToken>,
	/// The context is an inline `style="..."` attribute.
	pub inline: bool,
}

/// Kind of a markup token the caret can sit inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlTokenKind {
	/// Opening or self-closing tag, including its attribute list.
	OpenTag,
	/// Closing tag.
	CloseTag,
	/// Comment.
	Comment,
}

/// The inline token enclosing the queried position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlToken {
	/// Token kind.
	pub kind: HtmlTokenKind,
	/// Location in the buffer.
	pub span: Span,
}

/// An attribute exactly as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute {
	/// Attribute name.
	pub name: String,
	/// Raw value, quotes included. [`None`] for value-less attributes.
	pub value: Option<String>,
}

impl RawAttribute {
	/// Convenience constructor.
	pub fn new(name: impl Into<String>, value: Option<&str>) -> Self {
		Self {
			name: name.into(),
			value: value.map(str::to_string),
		}
	}
}

/// An open element enclosing the queried position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlTag {
	/// Tag name.
	pub name: String,
	/// Span of the opening tag.
	pub span: Span,
	/// Attributes of the opening tag.
	pub attributes: Vec<RawAttribute>,
}

/// Result of a markup context query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlContext {
	/// Inline token (tag or comment) under the position. [`None`] between elements.
	pub current: Option<HtmlToken>,
	/// Open elements, outermost first; the last entry is the nearest parent.
	pub ancestors: Vec<HtmlTag>,
	/// Stylesheet context when the position is inside `<style>` or a `style` attribute.
	pub css: Option<CssContext>,
}

/// Options for markup queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HtmlQueryOptions {
	/// Parse as XML: case-sensitive names, no void elements.
	pub xml: bool,
}

/// Markup structural parser.
pub trait HtmlContextProvider {
	/// Returns the ancestor chain and inline token at `pos`.
	///
	/// Implementations must report embedded stylesheet contexts through
	/// [`HtmlContext::css`].
	fn html_context(&self, text: RopeSlice<'_>, pos: CharIdx, options: HtmlQueryOptions) -> Result<HtmlContext, StructureError>;
}

/// Stylesheet structural parser.
pub trait CssContextProvider {
	/// Returns the token under `pos` and its enclosing selectors/properties.
	fn css_context(&self, text: RopeSlice<'_>, pos: CharIdx) -> Result<CssContext, StructureError>;
}

/// Borrowed pair of structural parsers used by the resolver.
#[derive(Clone, Copy)]
pub struct Structure<'a> {
	/// Markup parser.
	pub html: &'a dyn HtmlContextProvider,
	/// Stylesheet parser.
	pub css: &'a dyn CssContextProvider,
}
