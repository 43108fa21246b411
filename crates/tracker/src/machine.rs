//! Tracking state machine.
//!
//! [`transition`] is a pure function of the previous [`State`], one [`Event`]
//! and the shared [`Engine`]. It never touches editor state; the host applies
//! the returned [`Effects`] (highlight marks, previews) itself.

use std::cmp::Ordering;

use abbrev_primitives::{Buffer, CharIdx, CharLen, Edit, Span};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::boundary;
use crate::context::UserConfig;
use crate::engine::Engine;
use crate::error::TrackError;
use crate::stop::{StopReason, should_stop};
use crate::tracker::TrackedAbbreviation;

/// Whether an abbreviation is being tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
	/// Nothing tracked.
	#[default]
	Idle,
	/// One live abbreviation.
	Tracking(TrackedAbbreviation),
}

/// Per-editor machine state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
	/// Current phase.
	pub phase: Phase,
	/// Caret position observed by the previous event.
	pub last_caret: Option<CharIdx>,
	/// Buffer length observed by the previous event.
	pub last_len: Option<CharLen>,
}

impl State {
	/// The tracked abbreviation, if any.
	pub fn tracked(&self) -> Option<&TrackedAbbreviation> {
		match &self.phase {
			Phase::Idle => None,
			Phase::Tracking(tracked) => Some(tracked),
		}
	}
}

/// Parameters of an explicit start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRequest {
	/// Span to track, prefix included.
	pub span: Span,
	/// Prefix characters excluded from the abbreviation text.
	pub offset: CharLen,
	/// Activation context to parse against.
	pub config: UserConfig,
	/// Exempt the tracker from the stop heuristics.
	pub forced: bool,
}

/// Inputs to the state machine.
#[derive(Clone, Copy)]
pub enum Event<'a> {
	/// The buffer changed. `edit` describes the change when the host knows it;
	/// otherwise it is inferred from the caret and length deltas.
	Changed {
		/// Buffer after the change.
		buffer: &'a dyn Buffer,
		/// The applied edit, in pre-change coordinates.
		edit: Option<Edit>,
	},
	/// The caret moved without an edit.
	CaretMoved {
		/// New caret position.
		caret: CharIdx,
		/// Current buffer length.
		len: CharLen,
	},
	/// Stop command or document teardown.
	Stop,
	/// Explicit start over a given span.
	Start {
		/// Buffer to read the span from.
		buffer: &'a dyn Buffer,
		/// What to track.
		request: &'a StartRequest,
	},
}

/// Observable outcome of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
	/// A tracker was created over the span.
	Started(Span),
	/// The live tracker was re-parsed; its span is now this.
	Updated(Span),
	/// The live tracker was discarded.
	Stopped(StopReason),
	/// An explicit start was refused.
	Rejected(TrackError),
}

/// Effects of one transition; rarely more than two.
pub type Effects = SmallVec<[Effect; 2]>;

/// Advances the machine by one event.
pub fn transition(mut state: State, event: Event<'_>, engine: &Engine) -> (State, Effects) {
	let mut effects = Effects::new();

	match event {
		Event::Changed { buffer, edit } => {
			let last_caret = state.last_caret.replace(buffer.caret());
			let last_len = state.last_len.replace(buffer.len_chars());
			let edit = edit.or_else(|| infer_edit(last_caret, last_len, buffer));
			state.phase = match std::mem::take(&mut state.phase) {
				Phase::Tracking(tracked) => update(tracked, edit, engine, buffer, &mut effects),
				Phase::Idle => start_typed(last_caret, engine, buffer, &mut effects),
			};
		}
		Event::CaretMoved { caret, len } => {
			state.last_caret = Some(caret);
			state.last_len = Some(len);
		}
		Event::Stop => {
			if let Phase::Tracking(tracked) = std::mem::take(&mut state.phase) {
				debug!(start = tracked.range.start, end = tracked.range.end, "Stopped tracking abbreviation on request");
				effects.push(Effect::Stopped(StopReason::Explicit));
			}
		}
		Event::Start { buffer, request } => {
			state.last_caret = Some(buffer.caret());
			state.last_len = Some(buffer.len_chars());
			if let Phase::Tracking(_) = std::mem::take(&mut state.phase) {
				effects.push(Effect::Stopped(StopReason::Replaced));
			}
			state.phase = match start_requested(request, engine, buffer) {
				Ok(tracked) => {
					debug!(start = tracked.range.start, end = tracked.range.end, forced = tracked.forced, "Started tracking abbreviation");
					effects.push(Effect::Started(tracked.range));
					Phase::Tracking(tracked)
				}
				Err(err) => {
					debug!(error = %err, "Explicit tracking start refused");
					effects.push(Effect::Rejected(err));
					Phase::Idle
				}
			};
		}
	}

	(state, effects)
}

/// Reconstructs a single edit from what changed since the previous event.
///
/// Growth is an insertion at the previous caret (or right before the current
/// one); shrinkage is a deletion at the current caret. An unchanged length
/// yields [`None`], which leaves the span where it was.
fn infer_edit(last_caret: Option<CharIdx>, last_len: Option<CharLen>, buffer: &dyn Buffer) -> Option<Edit> {
	let before = last_len?;
	let after = buffer.len_chars();
	let caret = buffer.caret();
	match after.cmp(&before) {
		Ordering::Greater => {
			let inserted = after - before;
			let at = last_caret
				.filter(|&prev| prev + inserted <= after)
				.unwrap_or_else(|| caret.saturating_sub(inserted));
			Some(Edit::insert(at, inserted))
		}
		Ordering::Less => Some(Edit::delete(caret, caret + (before - after))),
		Ordering::Equal => None,
	}
}

fn update(tracked: TrackedAbbreviation, edit: Option<Edit>, engine: &Engine, buffer: &dyn Buffer, effects: &mut Effects) -> Phase {
	let mapped = match edit {
		Some(edit) => edit.map_span(tracked.range),
		None => Some(tracked.range),
	};
	let Some(range) = mapped.filter(|r| r.fits(buffer.len_chars())) else {
		debug!(?edit, range = ?tracked.range, "Edit invalidated tracked abbreviation");
		effects.push(Effect::Stopped(StopReason::Invalidated));
		return Phase::Idle;
	};

	if !tracked.forced && !engine.config().completions_enabled(buffer.syntax()) {
		debug!(syntax = buffer.syntax(), "Completions disabled, dropping typed abbreviation");
		effects.push(Effect::Stopped(StopReason::Disabled));
		return Phase::Idle;
	}

	let tracked = reparse(TrackedAbbreviation { range, ..tracked }, engine, buffer);
	if let Some(reason) = should_stop(&tracked, buffer.caret()) {
		debug!(?reason, abbr = ?tracked.abbreviation(), "Stopped tracking abbreviation");
		effects.push(Effect::Stopped(reason));
		return Phase::Idle;
	}

	effects.push(Effect::Updated(range));
	Phase::Tracking(tracked)
}

fn start_typed(last_caret: Option<CharIdx>, engine: &Engine, buffer: &dyn Buffer, effects: &mut Effects) -> Phase {
	let caret = buffer.caret();
	let simple_insert = caret.checked_sub(1).is_some_and(|prev| last_caret == Some(prev));
	if !simple_insert {
		return Phase::Idle;
	}

	let config = engine.config();
	if !config.completions_enabled(buffer.syntax()) {
		return Phase::Idle;
	}

	let Some(detected) = boundary::detect_start(engine.structure(), &config, buffer.text(), caret, buffer.syntax()) else {
		return Phase::Idle;
	};

	let tracked = reparse(
		TrackedAbbreviation {
			range: detected.candidate.span,
			forced: false,
			offset: detected.candidate.offset,
			parse_result: None,
			activation_options: detected.config,
		},
		engine,
		buffer,
	);
	if let Some(reason) = should_stop(&tracked, caret) {
		trace!(?reason, abbr = ?tracked.abbreviation(), "Typed abbreviation rejected on start");
		return Phase::Idle;
	}

	debug!(start = tracked.range.start, end = tracked.range.end, syntax = %tracked.activation_options.syntax, "Started tracking abbreviation");
	effects.push(Effect::Started(tracked.range));
	Phase::Tracking(tracked)
}

fn start_requested(request: &StartRequest, engine: &Engine, buffer: &dyn Buffer) -> Result<TrackedAbbreviation, TrackError> {
	let StartRequest { span, offset, config, forced } = request;
	let len = buffer.len_chars();
	if span.start > span.end || !span.fits(len) {
		return Err(TrackError::InvalidSpan {
			start: span.start,
			end: span.end,
			len,
		});
	}
	if *offset > span.len() {
		return Err(TrackError::OffsetOutOfRange {
			offset: *offset,
			len: span.len(),
		});
	}

	let tracked = reparse(
		TrackedAbbreviation {
			range: *span,
			forced: *forced,
			offset: *offset,
			parse_result: None,
			activation_options: config.clone(),
		},
		engine,
		buffer,
	);
	match should_stop(&tracked, buffer.caret()) {
		Some(reason) => Err(TrackError::Stopped(reason)),
		None => Ok(tracked),
	}
}

fn reparse(mut tracked: TrackedAbbreviation, engine: &Engine, buffer: &dyn Buffer) -> TrackedAbbreviation {
	let text = buffer.slice(tracked.abbreviation_span());
	tracked.parse_result = engine.parse(&text, &tracked.activation_options);
	tracked
}
