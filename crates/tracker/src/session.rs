//! Per-editor tracking session.

use std::sync::Arc;

use abbrev_language::classify;
use abbrev_primitives::{Buffer, CharIdx, CharLen, Edit, Span};
use tracing::debug;

use crate::abbreviation::Extractor;
use crate::context::UserConfig;
use crate::engine::Engine;
use crate::error::{Result, TrackError};
use crate::machine::{Effect, Effects, Event, StartRequest, State, transition};
use crate::stop::StopReason;
use crate::tracker::TrackedAbbreviation;

/// Options for [`Session::start_tracking`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackOptions {
	/// Prefix characters excluded from the abbreviation text.
	pub offset: CharLen,
	/// Activation context to parse against.
	pub config: UserConfig,
	/// Exempt the tracker from the stop heuristics.
	pub forced: bool,
}

/// Owns the tracking state of one editor.
///
/// At most one abbreviation is tracked at a time. Every method takes the
/// buffer as it is *after* whatever the host just did.
#[derive(Debug)]
pub struct Session {
	engine: Arc<Engine>,
	state: State,
}

impl Session {
	/// Creates an idle session.
	pub fn new(engine: Arc<Engine>) -> Self {
		Self {
			engine,
			state: State::default(),
		}
	}

	/// The shared engine.
	pub fn engine(&self) -> &Arc<Engine> {
		&self.engine
	}

	/// The live tracker, if any.
	pub fn tracker(&self) -> Option<&TrackedAbbreviation> {
		self.state.tracked()
	}

	/// Whether `pos` lies inside the tracked span (ends inclusive).
	pub fn contains(&self, pos: CharIdx) -> bool {
		self.tracker().is_some_and(|t| t.range.contains(pos))
	}

	/// Feeds one event through the state machine and returns its effects.
	pub fn dispatch(&mut self, event: Event<'_>) -> Effects {
		let (state, effects) = transition(std::mem::take(&mut self.state), event, &self.engine);
		self.state = state;
		effects
	}

	/// Reacts to a buffer change; returns the tracker that survives it.
	///
	/// `edit` is the change in pre-edit coordinates. Pass [`None`] when the
	/// host cannot describe it; a single edit is then inferred from how the
	/// caret and buffer length moved since the previous event.
	pub fn handle_change(&mut self, buffer: &dyn Buffer, edit: Option<Edit>) -> Option<&TrackedAbbreviation> {
		self.dispatch(Event::Changed { buffer, edit });
		self.tracker()
	}

	/// Records a caret move that was not caused by an edit.
	pub fn handle_caret_moved(&mut self, buffer: &dyn Buffer) {
		self.dispatch(Event::CaretMoved {
			caret: buffer.caret(),
			len: buffer.len_chars(),
		});
	}

	/// Starts tracking `span`, replacing any live tracker.
	pub fn start_tracking(&mut self, buffer: &dyn Buffer, span: Span, options: TrackOptions) -> Result<&TrackedAbbreviation> {
		let request = StartRequest {
			span,
			offset: options.offset,
			config: options.config,
			forced: options.forced,
		};
		for effect in self.dispatch(Event::Start { buffer, request: &request }) {
			if let Effect::Rejected(err) = effect {
				return Err(err);
			}
		}
		self.tracker().ok_or(TrackError::Stopped(StopReason::NoAbbreviation))
	}

	/// Discards the live tracker. Idempotent.
	pub fn stop_tracking(&mut self) {
		self.dispatch(Event::Stop);
	}

	/// Explicit abbreviation mode over the current selection.
	///
	/// The tracker is forced: it survives invalid text, line breaks and
	/// contexts the resolver would normally refuse.
	pub fn enter_abbreviation_mode(&mut self, buffer: &dyn Buffer) -> Result<&TrackedAbbreviation> {
		let syntax = buffer.syntax();
		let config = self
			.engine
			.resolve_activation(buffer.text(), buffer.caret(), syntax)
			.or_else(|| UserConfig::for_syntax(syntax, &self.engine.config().output))
			.ok_or_else(|| TrackError::UnsupportedSyntax(syntax.to_string()))?;

		debug!(syntax, selection = ?buffer.selection(), "Entering abbreviation mode");
		self.start_tracking(
			buffer,
			buffer.selection(),
			TrackOptions {
				offset: 0,
				config,
				forced: true,
			},
		)
	}

	/// Tracks an abbreviation already present before the caret.
	///
	/// Uses `extractor` to find it and only tracks where activation is
	/// allowed. The tracker is not forced.
	pub fn track_extracted(&mut self, buffer: &dyn Buffer, extractor: &dyn Extractor) -> Option<&TrackedAbbreviation> {
		let caret = buffer.caret();
		let syntax = buffer.syntax();
		let config = self.engine.config();
		let prefix = classify(syntax).is_jsx().then_some(config.abbreviation.jsx_prefix.as_str());

		let found = extractor.extract(buffer.text(), caret, syntax, prefix)?;
		let user = self.engine.resolve_activation(buffer.text(), caret, syntax)?;
		let offset = prefix.map_or(0, |p| p.chars().count());
		let span = Span::new(found.start.checked_sub(offset)?, found.end)?;

		self.start_tracking(
			buffer,
			span,
			TrackOptions {
				offset,
				config: user,
				forced: false,
			},
		)
		.map_err(|err| debug!(error = %err, "Extracted abbreviation not tracked"))
		.ok()
	}
}

#[cfg(test)]
mod tests {
	use abbrev_config::SharedConfig;
	use abbrev_primitives::Document;
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::fakes::{FixedCss, ScanHtml, ToyParser, WordExtractor};

	fn session() -> Session {
		Session::new(Engine::new(ScanHtml, FixedCss::default(), ToyParser, SharedConfig::default()))
	}

	fn html_options() -> TrackOptions {
		TrackOptions {
			offset: 0,
			config: UserConfig::for_syntax("html", &Default::default()).unwrap(),
			forced: false,
		}
	}

	#[test]
	fn test_start_and_stop() {
		let doc = Document::new("html", "ul>li");
		let mut s = session();
		let t = s.start_tracking(&doc, Span { start: 0, end: 5 }, html_options()).unwrap();
		assert_eq!(t.abbreviation(), Some("ul>li"));
		assert!(s.contains(0));
		assert!(s.contains(5));

		s.stop_tracking();
		assert!(s.tracker().is_none());
		assert!(!s.contains(0));
		s.stop_tracking();
		assert!(s.tracker().is_none());
	}

	#[test]
	fn test_start_rejects_bad_span() {
		let doc = Document::new("html", "ab");
		let mut s = session();
		let err = s.start_tracking(&doc, Span { start: 1, end: 9 }, html_options()).unwrap_err();
		assert_eq!(err, TrackError::InvalidSpan { start: 1, end: 9, len: 2 });

		let err = s
			.start_tracking(&doc, Span { start: 0, end: 1 }, TrackOptions { offset: 2, ..html_options() })
			.unwrap_err();
		assert_eq!(err, TrackError::OffsetOutOfRange { offset: 2, len: 1 });
		assert!(s.tracker().is_none());
	}

	#[test]
	fn test_inverted_span_drops_live_tracker() {
		let doc = Document::new("html", "ab");
		let mut s = session();
		s.start_tracking(&doc, Span { start: 0, end: 2 }, html_options()).unwrap();
		assert!(s.tracker().is_some());

		let err = s.start_tracking(&doc, Span { start: 2, end: 1 }, html_options()).unwrap_err();
		assert_eq!(err, TrackError::InvalidSpan { start: 2, end: 1, len: 2 });
		assert!(s.tracker().is_none());
		assert!(!s.contains(1));
	}

	#[test]
	fn test_start_rejected_by_stop_rules() {
		let doc = Document::new("html", "a b");
		let mut s = session();
		let err = s.start_tracking(&doc, Span { start: 0, end: 3 }, html_options()).unwrap_err();
		assert_eq!(err, TrackError::Stopped(StopReason::InvalidLastChar));
	}

	#[test]
	fn test_start_replaces_previous() {
		let doc = Document::new("html", "ab cd");
		let mut s = session();
		s.start_tracking(&doc, Span { start: 0, end: 2 }, html_options()).unwrap();
		let request = StartRequest {
			span: Span { start: 3, end: 5 },
			offset: 0,
			config: html_options().config,
			forced: false,
		};
		let effects = s.dispatch(Event::Start { buffer: &doc, request: &request });
		assert_eq!(
			effects.as_slice(),
			&[Effect::Stopped(StopReason::Replaced), Effect::Started(Span { start: 3, end: 5 })]
		);
		assert_eq!(s.tracker().and_then(TrackedAbbreviation::abbreviation), Some("cd"));
	}

	#[test]
	fn test_abbreviation_mode_is_forced() {
		let mut doc = Document::new("html", "x a b");
		doc.select(Span { start: 2, end: 5 });
		let mut s = session();
		let t = s.enter_abbreviation_mode(&doc).unwrap();
		assert!(t.forced);
		assert_eq!(t.range, Span { start: 2, end: 5 });
		assert!(t.parse_result.as_ref().is_some_and(|r| r.error().is_some()));
	}

	#[test]
	fn test_abbreviation_mode_inside_tag_falls_back_to_syntax() {
		let doc = Document::new("html", "<div ></div>").with_caret(5);
		let mut s = session();
		let t = s.enter_abbreviation_mode(&doc).unwrap();
		assert_eq!(t.range, Span::point(5));
		assert_eq!(t.activation_options.syntax, "html");
		assert_eq!(t.parse_result, None);
	}

	#[test]
	fn test_abbreviation_mode_unsupported_syntax() {
		let doc = Document::new("rust", "fn");
		let mut s = session();
		assert_eq!(s.enter_abbreviation_mode(&doc).unwrap_err(), TrackError::UnsupportedSyntax("rust".into()));
	}

	#[test]
	fn test_track_extracted() {
		let mut s = session();
		let doc = Document::new("html", "text ul>li");
		let t = s.track_extracted(&doc, &WordExtractor).unwrap();
		assert_eq!(t.range, Span { start: 5, end: 10 });
		assert_eq!(t.abbreviation(), Some("ul>li"));
		assert!(!t.forced);
	}

	#[test]
	fn test_track_extracted_jsx_prefix() {
		let doc = Document::new("jsx", "return <div.a");
		let mut s = session();
		let t = s.track_extracted(&doc, &WordExtractor).unwrap();
		assert_eq!(t.range, Span { start: 7, end: 13 });
		assert_eq!(t.offset, 1);
		assert_eq!(t.abbreviation(), Some("div.a"));
	}

	#[test]
	fn test_track_extracted_needs_context() {
		let doc = Document::new("html", "<div class></div>").with_caret(10);
		let mut s = session();
		assert!(s.track_extracted(&doc, &WordExtractor).is_none());
	}
}
