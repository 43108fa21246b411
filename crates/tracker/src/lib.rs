//! Abbreviation tracking for editors.
//!
//! Watches typing in a buffer, detects where a shorthand abbreviation starts,
//! keeps its span in sync with edits, re-parses it on every change and stops
//! tracking when the text can no longer become a valid abbreviation. Whether
//! an abbreviation may start at all depends on the structural context at the
//! caret, queried through pluggable HTML/CSS parsers.
//!
//! Hosts create one [`Engine`] per process and one [`Session`] per editor.

/// Abbreviation parser and extractor interfaces.
pub mod abbreviation;
/// Typing heuristics that detect an abbreviation start.
pub mod boundary;
/// Activation context resolution.
pub mod context;
/// Process-wide collaborators.
pub mod engine;
/// Error types.
pub mod error;
/// Naive structural parsers and abbreviation parser for tests.
#[cfg(any(test, feature = "test-support"))]
pub mod fakes;
/// Pure tracking state machine.
pub mod machine;
/// Per-editor session.
pub mod session;
/// Stop conditions.
pub mod stop;
/// Structural parser interfaces.
pub mod structure;
/// The tracked abbreviation record.
pub mod tracker;

pub use abbreviation::{AbbreviationParser, Extracted, Extractor, ParseError, ParseResult, TAB_STOP};
pub use context::{AbbreviationContext, AbbreviationKind, UserConfig, resolve_activation};
pub use engine::Engine;
pub use error::{Result, StructureError, TrackError};
pub use machine::{Effect, Effects, Event, Phase, StartRequest, State, transition};
pub use session::{Session, TrackOptions};
pub use stop::{StopReason, should_stop};
pub use structure::{
	CssContext, CssContextProvider, CssToken, CssTokenKind, HtmlContext, HtmlContextProvider, HtmlQueryOptions, HtmlTag, HtmlToken,
	HtmlTokenKind, RawAttribute, Structure,
};
pub use tracker::TrackedAbbreviation;
