//! Buffer queries consumed by the tracker.
//!
//! The tracker never owns editor text. It reads it through [`Buffer`], which a
//! host editor implements over its own storage. [`Document`] is a small
//! rope-backed implementation used by tests and headless hosts.

use ropey::{Rope, RopeSlice};

use crate::edit::Edit;
use crate::range::{CharIdx, Span};

/// Read-only view of an editor buffer.
pub trait Buffer {
	/// The full buffer text.
	fn text(&self) -> RopeSlice<'_>;

	/// Current caret position.
	fn caret(&self) -> CharIdx;

	/// Declared syntax name of the document (e.g. `"html"`, `"scss"`).
	fn syntax(&self) -> &str;

	/// Current primary selection. Defaults to an empty span at the caret.
	fn selection(&self) -> Span {
		Span::point(self.caret())
	}

	/// Total length in characters.
	fn len_chars(&self) -> usize {
		self.text().len_chars()
	}

	/// Text covered by `span`, clamped to the buffer.
	fn slice(&self, span: Span) -> String {
		let len = self.len_chars();
		let start = span.start.min(len);
		let end = span.end.min(len);
		self.text().slice(start..end).to_string()
	}

	/// Character at `pos`, if any.
	fn char_at(&self, pos: CharIdx) -> Option<char> {
		(pos < self.len_chars()).then(|| self.text().char(pos))
	}
}

/// A headless rope-backed document with a caret and selection.
#[derive(Debug, Clone)]
pub struct Document {
	content: Rope,
	syntax: String,
	caret: CharIdx,
	anchor: Option<CharIdx>,
}

impl Document {
	/// Creates a document with the caret at the end of `content`.
	pub fn new(syntax: impl Into<String>, content: &str) -> Self {
		let content = Rope::from(content);
		let caret = content.len_chars();
		Self {
			content,
			syntax: syntax.into(),
			caret,
			anchor: None,
		}
	}

	/// Builder-style caret placement.
	pub fn with_caret(mut self, caret: CharIdx) -> Self {
		self.set_caret(caret);
		self
	}

	/// Moves the caret, clearing any selection.
	pub fn set_caret(&mut self, caret: CharIdx) {
		self.caret = caret.min(self.content.len_chars());
		self.anchor = None;
	}

	/// Selects `span`, leaving the caret at its end.
	pub fn select(&mut self, span: Span) {
		let len = self.content.len_chars();
		self.anchor = Some(span.start.min(len));
		self.caret = span.end.min(len);
	}

	/// Inserts `text` at the caret and advances past it.
	///
	/// Returns the applied edit.
	pub fn type_str(&mut self, text: &str) -> Edit {
		let at = self.caret;
		let len = text.chars().count();
		self.content.insert(at, text);
		self.caret = at + len;
		self.anchor = None;
		Edit::insert(at, len)
	}

	/// Inserts `text` at `at` without moving the caret (unless it sits after `at`).
	///
	/// Models auto-inserted closers and edits made by other views.
	pub fn insert_at(&mut self, at: CharIdx, text: &str) -> Edit {
		let at = at.min(self.content.len_chars());
		let len = text.chars().count();
		self.content.insert(at, text);
		if self.caret > at {
			self.caret += len;
		}
		Edit::insert(at, len)
	}

	/// Deletes the character before the caret.
	///
	/// Returns [`None`] when the caret is at the start of the buffer.
	pub fn backspace(&mut self) -> Option<Edit> {
		if self.caret == 0 {
			return None;
		}
		let from = self.caret - 1;
		self.content.remove(from..self.caret);
		self.caret = from;
		self.anchor = None;
		Some(Edit::delete(from, from + 1))
	}

	/// Deletes `span`, placing the caret at its start.
	pub fn delete(&mut self, span: Span) -> Edit {
		let len = self.content.len_chars();
		let (from, to) = (span.start.min(len), span.end.min(len));
		self.content.remove(from..to);
		self.caret = from;
		self.anchor = None;
		Edit::delete(from, to)
	}

	/// The full text as an owned string.
	pub fn contents(&self) -> String {
		self.content.to_string()
	}
}

impl Buffer for Document {
	fn text(&self) -> RopeSlice<'_> {
		self.content.slice(..)
	}

	fn caret(&self) -> CharIdx {
		self.caret
	}

	fn syntax(&self) -> &str {
		&self.syntax
	}

	fn selection(&self) -> Span {
		match self.anchor {
			Some(anchor) => Span {
				start: anchor.min(self.caret),
				end: anchor.max(self.caret),
			},
			None => Span::point(self.caret),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_type_str_advances_caret() {
		let mut doc = Document::new("html", "ab").with_caret(1);
		let edit = doc.type_str("xy");
		assert_eq!(doc.contents(), "axyb");
		assert_eq!(doc.caret(), 3);
		assert_eq!(edit, Edit::insert(1, 2));
	}

	#[test]
	fn test_insert_at_keeps_caret_before() {
		let mut doc = Document::new("html", "ab").with_caret(1);
		doc.insert_at(1, ")");
		assert_eq!(doc.contents(), "a)b");
		assert_eq!(doc.caret(), 1);
	}

	#[test]
	fn test_backspace() {
		let mut doc = Document::new("css", "abc");
		assert_eq!(doc.backspace(), Some(Edit::delete(2, 3)));
		assert_eq!(doc.contents(), "ab");
		let mut empty = Document::new("css", "");
		assert_eq!(empty.backspace(), None);
	}

	#[test]
	fn test_selection_defaults_to_caret() {
		let mut doc = Document::new("html", "hello world");
		assert_eq!(doc.selection(), Span::point(11));
		doc.select(Span { start: 0, end: 5 });
		assert_eq!(doc.selection(), Span { start: 0, end: 5 });
		assert_eq!(doc.caret(), 5);
	}

	#[test]
	fn test_slice_and_char_at_clamp() {
		let doc = Document::new("html", "héllo");
		assert_eq!(doc.slice(Span { start: 1, end: 3 }), "él");
		assert_eq!(doc.slice(Span { start: 3, end: 99 }), "lo");
		assert_eq!(doc.char_at(1), Some('é'));
		assert_eq!(doc.char_at(5), None);
	}
}
