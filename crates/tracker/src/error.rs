//! Error types for tracking operations.

use abbrev_primitives::{CharIdx, CharLen};
use thiserror::Error;

use crate::stop::StopReason;

/// Why a tracking operation was abandoned.
///
/// None of these reach the user: every failure degrades to "not tracking".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
	/// `start > end`, or the span does not fit inside the buffer.
	#[error("invalid span {start}..{end} for buffer of {len} chars")]
	InvalidSpan {
		/// Requested start.
		start: CharIdx,
		/// Requested end.
		end: CharIdx,
		/// Buffer length at the time of the request.
		len: CharLen,
	},

	/// The prefix offset is longer than the span itself.
	#[error("prefix offset {offset} exceeds span length {len}")]
	OffsetOutOfRange {
		/// Requested offset.
		offset: CharLen,
		/// Span length.
		len: CharLen,
	},

	/// The document syntax has no abbreviation support.
	#[error("syntax '{0}' does not support abbreviations")]
	UnsupportedSyntax(String),

	/// The stop-condition evaluator rejected the record as soon as it was built.
	#[error("tracking stopped immediately: {0:?}")]
	Stopped(StopReason),
}

/// Failure reported by an external structural parser.
///
/// Treated as "no context available": activation is denied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("structural query failed: {0}")]
pub struct StructureError(pub String);

/// Result type for tracking operations.
pub type Result<T> = std::result::Result<T, TrackError>;
