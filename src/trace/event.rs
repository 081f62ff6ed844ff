//! Span lifecycle events and newline-delimited JSON parsing.
//!
//! Each input line holds one event object tagged by `"type"`:
//!
//! ```text
//! {"type":"SpanStart","id":1,"parent":null,"ts":0,"name":"compile"}
//! {"type":"Schedule","id":1,"ts":1}
//! {"type":"Deschedule","id":1,"ts":4}
//! {"type":"SpanEnd","id":1,"ts":10}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use serde::{Deserialize, Serialize};

use super::error::ParseError;

/// Identifier assigned to a span by the event producer.
pub type SpanId = u64;

/// Monotonic tick count.
pub type Timestamp = u64;

/// A closed time range, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Interval {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Timestamp {
        self.end.saturating_sub(self.start)
    }

    /// Whether `other` lies within this interval (bounds inclusive).
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// One step in a span's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "type")]
pub enum Event {
    /// A span begins. `parent: None` attaches it to the trace root.
    SpanStart {
        id: SpanId,
        #[serde(default)]
        parent: Option<SpanId>,
        ts: Timestamp,
        name: String,
    },
    /// The span starts running on a resource.
    Schedule { id: SpanId, ts: Timestamp },
    /// The span stops running but stays alive.
    Deschedule { id: SpanId, ts: Timestamp },
    /// The span completes.
    SpanEnd { id: SpanId, ts: Timestamp },
}

impl Event {
    pub fn ts(&self) -> Timestamp {
        match self {
            Event::SpanStart { ts, .. }
            | Event::Schedule { ts, .. }
            | Event::Deschedule { ts, .. }
            | Event::SpanEnd { ts, .. } => *ts,
        }
    }

    pub fn id(&self) -> SpanId {
        match self {
            Event::SpanStart { id, .. }
            | Event::Schedule { id, .. }
            | Event::Deschedule { id, .. }
            | Event::SpanEnd { id, .. } => *id,
        }
    }

    /// Variant name, e.g. `"SpanStart"`.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

/// Parse a single NDJSON line.
///
/// Returns `Ok(None)` for blank lines and `#` comments. The reported line
/// number is always 1; use [`parse_events`] for multi-line input.
pub fn parse_line(line: &str) -> Result<Option<Event>, ParseError> {
    parse_numbered(line, 1)
}

/// Parse every event in an NDJSON document, stopping at the first bad line.
pub fn parse_events(input: &str) -> Result<Vec<Event>, ParseError> {
    let mut events = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        if let Some(event) = parse_numbered(line, idx + 1)? {
            events.push(event);
        }
    }
    Ok(events)
}

fn parse_numbered(line: &str, line_number: usize) -> Result<Option<Event>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| ParseError {
            line: line_number,
            message: e.to_string(),
        })
}
