//! Core types shared by the abbreviation tracker: spans, edits, and buffers.

/// Buffer query interface and the rope-backed [`Document`].
pub mod buffer;
/// Single text change and span mapping through it.
pub mod edit;
/// Char index and half-open span types.
pub mod range;

pub use buffer::{Buffer, Document};
pub use edit::{Bias, Edit};
pub use range::{CharIdx, CharLen, Span};
pub use ropey::{Rope, RopeSlice};
