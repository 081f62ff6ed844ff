//! Error types for trace ingestion and layout.
//!
//! - **`TraceError`** - stream-integrity failures raised by the builder. Each
//!   one rejects a single malformed event; ingestion should stop there.
//!
//! - **`LayoutError`** - the layout engine found a span it had not finished
//!   laying out, or its output failed the row sanity check. These point at a
//!   traversal bug or at input that slipped past ingestion checks.
//!
//! - **`ParseError`** - a line of NDJSON input could not be decoded.

use super::event::{SpanId, Timestamp};
use super::span::SpanIndex;

/// Stream-integrity errors from [`TraceBuilder::add_event`](super::TraceBuilder::add_event).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraceError {
    /// Event timestamp did not advance past the latest one seen
    #[error("time moved backward from {previous} to {ts}")]
    NonMonotonic { previous: Timestamp, ts: Timestamp },

    /// `SpanStart` reused an id
    #[error("duplicate span ID {id}")]
    DuplicateSpan { id: SpanId },

    /// `SpanStart` named a parent that was never started
    #[error("invalid parent ID {parent} for span {id}")]
    InvalidParent { id: SpanId, parent: SpanId },

    /// Event refers to a span that was never started
    #[error("missing span ID {id}")]
    UnknownSpan { id: SpanId },

    /// `Schedule` while the previous scheduled interval is still open
    #[error("duplicate Schedule event for {id} at {ts}")]
    DuplicateSchedule { id: SpanId, ts: Timestamp },

    /// `Deschedule` with no open scheduled interval
    #[error("mismatched Deschedule event for {id} at {ts}")]
    MismatchedDeschedule { id: SpanId, ts: Timestamp },

    /// `SpanEnd` on a span that is already closed
    #[error("duplicate close on {id}")]
    DuplicateClose { id: SpanId },
}

/// Failures from [`compute_layout`](super::compute_layout).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    // -------------------------------------------------------------------------
    // Traversal consistency
    // -------------------------------------------------------------------------
    /// A parent was processed before one of its children
    #[error("missing local layout for child {child:?} of {parent:?}")]
    MissingChildLayout { parent: SpanIndex, child: SpanIndex },

    /// Placement found a child with no rectangle in its parent's layout
    #[error("missing layout rectangle for child {child:?} of {parent:?}")]
    MissingChildRect { parent: SpanIndex, child: SpanIndex },

    /// The bottom-up pass drained without reaching the root
    #[error("root span was never laid out")]
    MissingRootLayout,

    /// Placement produced a row past the root's computed height
    #[error("span {span:?} placed on row {row} but only {row_count} rows exist")]
    RowOutOfRange {
        span: SpanIndex,
        row: usize,
        row_count: usize,
    },

    // -------------------------------------------------------------------------
    // Post-layout sanity
    // -------------------------------------------------------------------------
    /// Two spans share a row and overlap in time
    #[error("span {next:?} in row {row} starts at {start}, before previous span {previous:?} ends at {end}")]
    RowOverlap {
        row: usize,
        previous: SpanIndex,
        next: SpanIndex,
        end: Timestamp,
        start: Timestamp,
    },

    /// A span ends before it starts
    #[error("span {span:?} in row {row} ends at {end}, before its start {start}")]
    InvertedInterval {
        row: usize,
        span: SpanIndex,
        start: Timestamp,
        end: Timestamp,
    },
}

/// A line of NDJSON event input that failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    /// 1-based line number
    pub line: usize,
    pub message: String,
}
