use crate::range::{CharIdx, CharLen, Span};

/// Bias determines how positions at change boundaries are mapped.
///
/// When mapping a position through a change, bias determines whether the position
/// moves with insertions or stays before them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
	/// Position stays before insertions at the same location.
	Left,
	/// Position moves after insertions at the same location.
	Right,
}

/// A single applied text change: `[from, to)` was replaced by `inserted` chars.
///
/// Coordinates refer to the document *before* the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
	/// Start of the replaced range.
	pub from: CharIdx,
	/// End of the replaced range (exclusive).
	pub to: CharIdx,
	/// Number of characters inserted at `from`.
	pub inserted: CharLen,
}

impl Edit {
	/// A pure insertion of `len` characters at `at`.
	pub fn insert(at: CharIdx, len: CharLen) -> Self {
		Self {
			from: at,
			to: at,
			inserted: len,
		}
	}

	/// A pure deletion of `[from, to)`.
	pub fn delete(from: CharIdx, to: CharIdx) -> Self {
		debug_assert!(from <= to);
		Self { from, to, inserted: 0 }
	}

	/// Number of characters removed by this edit.
	#[inline]
	pub fn removed(&self) -> CharLen {
		self.to - self.from
	}

	/// Maps a position in the old document to the new document.
	pub fn map_pos(&self, pos: CharIdx, bias: Bias) -> CharIdx {
		if pos < self.from || (pos == self.from && bias == Bias::Left) {
			pos
		} else if pos >= self.to {
			pos - self.removed() + self.inserted
		} else {
			// Inside the deleted range: collapse onto the insertion.
			match bias {
				Bias::Left => self.from,
				Bias::Right => self.from + self.inserted,
			}
		}
	}

	/// Maps a tracked span through this edit.
	///
	/// Edits fully inside the span (ends inclusive) resize it, edits strictly
	/// before shift it, edits after leave it alone. An edit that straddles
	/// either boundary invalidates the span and yields [`None`].
	pub fn map_span(&self, span: Span) -> Option<Span> {
		let pure_insert = self.from == self.to;

		if self.to < span.start || (self.to == span.start && !pure_insert) {
			let start = self.map_pos(span.start, Bias::Right);
			let end = self.map_pos(span.end, Bias::Right);
			return Span::new(start, end);
		}

		if self.from > span.end || (self.from == span.end && !pure_insert) {
			return Some(span);
		}

		if span.start <= self.from && self.to <= span.end {
			return Span::new(span.start, span.end - self.removed() + self.inserted);
		}

		None
	}
}
