//! Activation context resolution.
//!
//! Decides whether an abbreviation may be activated at a position and, if so,
//! captures everything the expander needs: effective syntax, abbreviation kind,
//! parent tag or stylesheet scope, and output options.

use abbrev_config::{Config, OutputOptions};
use abbrev_language::{SyntaxClass, lookup, stylesheet_syntax_for_mime};
use abbrev_primitives::{CharIdx, RopeSlice, Span};
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::structure::{CssContext, CssToken, CssTokenKind, HtmlContext, HtmlQueryOptions, Structure};

/// Scope for stylesheet abbreviations typed outside of any rule.
pub const SCOPE_GLOBAL: &str = "@@global";
/// Scope for stylesheet abbreviations typed as a nested rule.
pub const SCOPE_SECTION: &str = "@@section";
/// Scope for stylesheet abbreviations inside an inline `style` attribute.
pub const SCOPE_PROPERTY: &str = "@@property";

/// How the expander must interpret the abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbbreviationKind {
	/// Produces markup.
	Markup,
	/// Produces stylesheet declarations.
	Stylesheet,
}

/// Parent element or stylesheet scope of an abbreviation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbbreviationContext {
	/// Parent tag name, property name or scope marker.
	pub name: String,
	/// Parent tag attributes with quotes stripped. Empty for stylesheets.
	pub attributes: IndexMap<String, String>,
}

impl AbbreviationContext {
	/// A stylesheet scope without attributes.
	pub fn scope(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			attributes: IndexMap::new(),
		}
	}
}

/// Immutable activation snapshot handed to the parser and expander.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserConfig {
	/// Effective syntax (may be an embedded stylesheet syntax).
	pub syntax: String,
	/// Abbreviation kind.
	pub kind: AbbreviationKind,
	/// Parent element or scope. [`None`] at markup top level.
	pub context: Option<AbbreviationContext>,
	/// Output formatting preferences.
	pub options: OutputOptions,
}

impl UserConfig {
	/// A context derived from the syntax alone, without structural queries.
	///
	/// Used when tracking is forced somewhere the resolver refuses to activate.
	pub fn for_syntax(syntax: &str, options: &OutputOptions) -> Option<Self> {
		let info = lookup(syntax)?;
		let kind = match info.class {
			SyntaxClass::Markup | SyntaxClass::JsxMarkup => AbbreviationKind::Markup,
			SyntaxClass::Stylesheet => AbbreviationKind::Stylesheet,
			SyntaxClass::Unsupported => return None,
		};
		let context = (kind == AbbreviationKind::Stylesheet).then(|| AbbreviationContext::scope(SCOPE_GLOBAL));
		Some(Self {
			syntax: info.name.to_string(),
			kind,
			context,
			options: options.clone(),
		})
	}
}

/// Resolves the activation context at `pos`, or [`None`] if activation is not allowed.
///
/// Structural-parser failures deny activation; they never propagate.
pub fn resolve_activation(structure: Structure<'_>, config: &Config, text: RopeSlice<'_>, pos: CharIdx, syntax: &str) -> Option<UserConfig> {
	let info = lookup(syntax)?;
	match info.class {
		SyntaxClass::Stylesheet => {
			let ctx = structure
				.css
				.css_context(text, pos)
				.map_err(|e| debug!(pos, syntax, error = %e, "Stylesheet context query failed"))
				.ok()?;
			stylesheet_activation(text, pos, info.name, &ctx, &config.output)
		}
		SyntaxClass::Markup if info.structured => {
			let ctx = structure
				.html
				.html_context(text, pos, HtmlQueryOptions { xml: info.xml })
				.map_err(|e| debug!(pos, syntax, error = %e, "Markup context query failed"))
				.ok()?;

			if let Some(css) = &ctx.css {
				let embedded = embedded_stylesheet_syntax(&ctx, config);
				return stylesheet_activation(text, pos, &embedded, css, &config.output);
			}

			if let Some(current) = &ctx.current {
				trace!(pos, kind = ?current.kind, "Caret inside inline markup token");
				return None;
			}

			Some(UserConfig {
				syntax: info.name.to_string(),
				kind: AbbreviationKind::Markup,
				context: markup_context(&ctx),
				options: config.output.clone(),
			})
		}
		SyntaxClass::Markup | SyntaxClass::JsxMarkup => Some(UserConfig {
			syntax: info.name.to_string(),
			kind: AbbreviationKind::Markup,
			context: None,
			options: config.output.clone(),
		}),
		SyntaxClass::Unsupported => None,
	}
}

fn stylesheet_activation(text: RopeSlice<'_>, pos: CharIdx, syntax: &str, ctx: &CssContext, output: &OutputOptions) -> Option<UserConfig> {
	let allowed = ctx.current.as_ref().is_some_and(|current| {
		matches!(current.kind, CssTokenKind::PropertyName | CssTokenKind::PropertyValue)
			|| is_typing_before_selector(text, pos, current)
	});
	if !allowed {
		trace!(pos, current = ?ctx.current.as_ref().map(|t| t.kind), "Stylesheet activation denied");
		return None;
	}

	Some(UserConfig {
		syntax: syntax.to_string(),
		kind: AbbreviationKind::Stylesheet,
		context: Some(AbbreviationContext::scope(stylesheet_scope(ctx))),
		options: if ctx.inline { output.inline() } else { output.clone() },
	})
}

/// The character just typed opened a new selector on an otherwise empty line.
///
/// Typing the first character of a nested rule makes the parser report a
/// selector token starting right before the caret; anything longer on that
/// line is an edit of an existing selector.
fn is_typing_before_selector(text: RopeSlice<'_>, pos: CharIdx, current: &CssToken) -> bool {
	if current.kind != CssTokenKind::Selector || pos == 0 || current.span.start != pos - 1 {
		return false;
	}
	let token = slice_clamped(text, current.span);
	let first_line = token.split(['\n', '\r']).next().unwrap_or_default();
	first_line.trim().chars().count() == 1
}

fn stylesheet_scope(ctx: &CssContext) -> String {
	if ctx.inline {
		return SCOPE_PROPERTY.to_string();
	}

	match ctx.current.as_ref().map(|t| t.kind) {
		Some(CssTokenKind::PropertyValue) => ctx
			.ancestors
			.iter()
			.rev()
			.find(|t| t.kind == CssTokenKind::PropertyName)
			.map_or_else(|| SCOPE_GLOBAL.to_string(), |t| t.name.clone()),
		Some(CssTokenKind::Selector) if !ctx.ancestors.is_empty() => SCOPE_SECTION.to_string(),
		_ => SCOPE_GLOBAL.to_string(),
	}
}

fn markup_context(ctx: &HtmlContext) -> Option<AbbreviationContext> {
	let parent = ctx.ancestors.last()?;
	let attributes = parent
		.attributes
		.iter()
		.map(|attr| (attr.name.clone(), attr.value.as_deref().map(unquote).unwrap_or_default().to_string()))
		.collect();
	Some(AbbreviationContext {
		name: parent.name.clone(),
		attributes,
	})
}

/// Syntax of an embedded stylesheet: the enclosing `<style type>` if it names
/// one, else the configured default.
fn embedded_stylesheet_syntax(ctx: &HtmlContext, config: &Config) -> String {
	ctx.ancestors
		.iter()
		.rev()
		.find(|tag| tag.name.eq_ignore_ascii_case("style"))
		.and_then(|tag| tag.attributes.iter().find(|a| a.name.eq_ignore_ascii_case("type")))
		.and_then(|attr| attr.value.as_deref())
		.and_then(|value| stylesheet_syntax_for_mime(unquote(value)))
		.map_or_else(|| config.abbreviation.stylesheet_syntax.clone(), str::to_string)
}

/// Strips one pair of matching surrounding quotes.
pub(crate) fn unquote(value: &str) -> &str {
	for quote in ['"', '\''] {
		if let Some(inner) = value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote)) {
			return inner;
		}
	}
	value
}

fn slice_clamped(text: RopeSlice<'_>, span: Span) -> String {
	let len = text.len_chars();
	text.slice(span.start.min(len)..span.end.min(len)).to_string()
}
