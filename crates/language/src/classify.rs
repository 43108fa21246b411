//! Known syntax table.
//!
//! Every decision the tracker makes starts here: a syntax the table does not
//! know is [`SyntaxClass::Unsupported`] and never activates tracking.

/// Stylesheet syntax used when an embedded `<style>` block does not declare one.
pub const DEFAULT_STYLESHEET_SYNTAX: &str = "css";

/// How abbreviations typed in a syntax must be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxClass {
	/// HTML, XML and indentation-based markup languages.
	Markup,
	/// Markup abbreviations inside JavaScript (JSX/TSX).
	JsxMarkup,
	/// CSS-family languages.
	Stylesheet,
	/// Anything else.
	Unsupported,
}

impl SyntaxClass {
	/// Returns true for both plain and JSX markup.
	pub fn is_markup(self) -> bool {
		matches!(self, Self::Markup | Self::JsxMarkup)
	}

	/// Returns true for the JSX variant.
	pub fn is_jsx(self) -> bool {
		self == Self::JsxMarkup
	}
}

/// A row of the known syntax table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxInfo {
	/// Canonical lower-case syntax name.
	pub name: &'static str,
	/// Classification.
	pub class: SyntaxClass,
	/// Structural queries must run in XML mode (case-sensitive, no void elements).
	pub xml: bool,
	/// The buffer is tag-structured, so HTML ancestor queries are meaningful.
	///
	/// False for indentation-based markup such as pug or haml.
	pub structured: bool,
}

const fn row(name: &'static str, class: SyntaxClass, xml: bool, structured: bool) -> SyntaxInfo {
	SyntaxInfo {
		name,
		class,
		xml,
		structured,
	}
}

const SYNTAXES: &[SyntaxInfo] = &[
	row("html", SyntaxClass::Markup, false, true),
	row("xhtml", SyntaxClass::Markup, false, true),
	row("vue", SyntaxClass::Markup, false, true),
	row("svelte", SyntaxClass::Markup, false, true),
	row("xml", SyntaxClass::Markup, true, true),
	row("xsl", SyntaxClass::Markup, true, true),
	row("pug", SyntaxClass::Markup, false, false),
	row("jade", SyntaxClass::Markup, false, false),
	row("slim", SyntaxClass::Markup, false, false),
	row("haml", SyntaxClass::Markup, false, false),
	row("jsx", SyntaxClass::JsxMarkup, false, false),
	row("tsx", SyntaxClass::JsxMarkup, false, false),
	row("javascriptreact", SyntaxClass::JsxMarkup, false, false),
	row("typescriptreact", SyntaxClass::JsxMarkup, false, false),
	row("css", SyntaxClass::Stylesheet, false, false),
	row("scss", SyntaxClass::Stylesheet, false, false),
	row("sass", SyntaxClass::Stylesheet, false, false),
	row("less", SyntaxClass::Stylesheet, false, false),
	row("sss", SyntaxClass::Stylesheet, false, false),
	row("stylus", SyntaxClass::Stylesheet, false, false),
	row("postcss", SyntaxClass::Stylesheet, false, false),
];

/// Looks up a syntax by name, ignoring ASCII case.
pub fn lookup(name: &str) -> Option<&'static SyntaxInfo> {
	let name = name.trim();
	SYNTAXES.iter().find(|info| info.name.eq_ignore_ascii_case(name))
}

/// Classifies a declared syntax name. Unknown names are [`SyntaxClass::Unsupported`].
pub fn classify(name: &str) -> SyntaxClass {
	lookup(name).map_or(SyntaxClass::Unsupported, |info| info.class)
}

/// Returns true if `name` is a known stylesheet syntax.
pub fn is_stylesheet_syntax(name: &str) -> bool {
	classify(name) == SyntaxClass::Stylesheet
}

/// Resolves the syntax named by a `<style type="...">` attribute value.
///
/// `text/scss` resolves to `scss`. Values that do not end in a known
/// stylesheet syntax yield [`None`] and callers fall back to
/// [`DEFAULT_STYLESHEET_SYNTAX`] or their configured default.
pub fn stylesheet_syntax_for_mime(mime: &str) -> Option<&'static str> {
	let subtype = mime.rsplit('/').next()?.trim();
	lookup(subtype)
		.filter(|info| info.class == SyntaxClass::Stylesheet)
		.map(|info| info.name)
}
