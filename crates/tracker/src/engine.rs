//! Process-wide collaborators shared by every editor session.

use std::sync::Arc;

use abbrev_config::{Config, SharedConfig};
use abbrev_primitives::{CharIdx, RopeSlice};

use crate::abbreviation::{AbbreviationParser, ParseResult};
use crate::boundary::{self, Detected};
use crate::context::{self, UserConfig};
use crate::structure::{CssContextProvider, HtmlContextProvider, Structure};

/// Structural parsers, abbreviation parser and configuration.
///
/// Sessions hold an `Arc<Engine>`; the engine itself carries no per-editor state.
pub struct Engine {
	html: Box<dyn HtmlContextProvider>,
	css: Box<dyn CssContextProvider>,
	parser: Box<dyn AbbreviationParser>,
	config: SharedConfig,
}

impl Engine {
	/// Assembles an engine from its collaborators.
	pub fn new(
		html: impl HtmlContextProvider + 'static,
		css: impl CssContextProvider + 'static,
		parser: impl AbbreviationParser + 'static,
		config: SharedConfig,
	) -> Arc<Self> {
		Arc::new(Self {
			html: Box::new(html),
			css: Box::new(css),
			parser: Box::new(parser),
			config,
		})
	}

	/// Fresh configuration snapshot. Never cache it across events.
	pub fn config(&self) -> Arc<Config> {
		self.config.snapshot()
	}

	/// The shared configuration handle.
	pub fn shared_config(&self) -> &SharedConfig {
		&self.config
	}

	/// Borrowed structural parsers.
	pub fn structure(&self) -> Structure<'_> {
		Structure {
			html: &*self.html,
			css: &*self.css,
		}
	}

	/// Activation context at `pos`, or [`None`] if not allowed.
	pub fn resolve_activation(&self, text: RopeSlice<'_>, pos: CharIdx, syntax: &str) -> Option<UserConfig> {
		context::resolve_activation(self.structure(), &self.config(), text, pos, syntax)
	}

	/// Typing heuristics plus context validation at `pos`.
	pub fn detect_start(&self, text: RopeSlice<'_>, pos: CharIdx, syntax: &str) -> Option<Detected> {
		boundary::detect_start(self.structure(), &self.config(), text, pos, syntax)
	}

	/// Parses abbreviation text. Empty text yields [`None`].
	pub fn parse(&self, abbr: &str, config: &UserConfig) -> Option<ParseResult> {
		(!abbr.is_empty()).then(|| self.parser.parse(abbr, config))
	}
}

impl std::fmt::Debug for Engine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Engine").field("config", &self.config).finish_non_exhaustive()
	}
}
