/// A position in the text, measured in characters (not bytes).
///
/// This is the canonical coordinate space for the tracker.
pub type CharIdx = usize;

/// A length or count in the text, measured in characters (not bytes).
///
/// This is distinct from CharIdx to avoid accidentally passing an index
/// where a length is expected or vice versa.
pub type CharLen = usize;

/// A half-open `[start, end)` span of characters.
///
/// Spans built through [`Span::new`], [`Span::point`] and [`Span::with_end`]
/// satisfy `start <= end`. The fields are public, so code that assembles a
/// span by hand must check the bounds itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
	/// First character covered by the span.
	pub start: CharIdx,
	/// One past the last character covered by the span.
	pub end: CharIdx,
}

impl Span {
	/// Creates a span, returning [`None`] if `start > end`.
	pub fn new(start: CharIdx, end: CharIdx) -> Option<Self> {
		(start <= end).then_some(Self { start, end })
	}

	/// Creates a zero-width span at the given position.
	pub fn point(pos: CharIdx) -> Self {
		Self { start: pos, end: pos }
	}

	/// Returns the length of the span in characters; zero for an inverted span.
	#[inline]
	pub fn len(&self) -> CharLen {
		self.end.saturating_sub(self.start)
	}

	/// Returns true if the span covers no characters.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.start >= self.end
	}

	/// Returns true if `pos` lies within the span, both ends inclusive.
	///
	/// A caret sitting right after the last character is still "in" the span.
	#[inline]
	pub fn contains(&self, pos: CharIdx) -> bool {
		self.start <= pos && pos <= self.end
	}

	/// Returns true if the span fits inside a text of `len` characters.
	#[inline]
	pub fn fits(&self, len: CharLen) -> bool {
		self.end <= len
	}

	/// Returns a copy with `end` replaced.
	///
	/// Returns [`None`] if the result would end before `start`.
	pub fn with_end(self, end: CharIdx) -> Option<Self> {
		Self::new(self.start, end)
	}

	/// Returns this span as a std range for slicing ropes.
	#[inline]
	pub fn as_range(&self) -> std::ops::Range<CharIdx> {
		self.start..self.end
	}
}

impl From<Span> for std::ops::Range<CharIdx> {
	fn from(span: Span) -> Self {
		span.start..span.end
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_span_rejects_inverted_bounds() {
		assert!(Span::new(3, 2).is_none());
		assert_eq!(Span::new(2, 3), Some(Span { start: 2, end: 3 }));
	}

	#[test]
	fn test_span_basics() {
		let s = Span::new(4, 9).unwrap();
		assert_eq!(s.len(), 5);
		assert!(!s.is_empty());
		assert!(Span::point(7).is_empty());
	}

	#[test]
	fn test_hand_built_inverted_span_is_empty() {
		let s = Span { start: 2, end: 1 };
		assert_eq!(s.len(), 0);
		assert!(s.is_empty());
	}

	#[test]
	fn test_contains_is_inclusive() {
		let s = Span::new(2, 5).unwrap();
		assert!(s.contains(2));
		assert!(s.contains(5));
		assert!(!s.contains(1));
		assert!(!s.contains(6));
	}

	#[test]
	fn test_fits() {
		let s = Span::new(0, 3).unwrap();
		assert!(s.fits(3));
		assert!(!s.fits(2));
	}
}
