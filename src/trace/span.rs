//! Finished span tree.
//!
//! Spans live in a flat arena addressed by [`SpanIndex`]. Slot 0 always holds
//! the synthetic root, so every other span has exactly one parent and tree
//! walks never need a null-parent branch.

use std::collections::HashMap;
use std::ops::Index;
use std::sync::Arc;

use super::event::{Interval, SpanId, Timestamp};

/// Handle into a [`Trace`]'s span arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpanIndex(usize);

impl SpanIndex {
    /// The synthetic root span.
    pub const ROOT: SpanIndex = SpanIndex(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

/// One unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Producer-assigned id; `None` only for the root
    pub id: Option<SpanId>,
    /// Interned name, shared between spans with equal names
    pub name: Arc<str>,
    pub interval: Interval,
    /// `None` only for the root
    pub parent: Option<SpanIndex>,
    /// Sorted by `interval.start`, ties in event-arrival order
    pub children: Vec<SpanIndex>,
    /// Periods the span was running on a resource, in order
    pub scheduled: Vec<Interval>,
}

impl Span {
    pub fn duration(&self) -> Timestamp {
        self.interval.duration()
    }

    pub fn scheduled_time(&self) -> Timestamp {
        self.scheduled.iter().map(Interval::duration).sum()
    }
}

/// A finalized, read-only span tree.
///
/// Produced once per event stream by [`TraceBuilder::finalize`](super::TraceBuilder::finalize)
/// and consumed by the layout engine and renderers.
#[derive(Debug, Clone)]
pub struct Trace {
    spans: Vec<Span>,
    ids: HashMap<SpanId, SpanIndex>,
}

impl Trace {
    /// Parents must precede their children in `spans`, and slot 0 must be the root.
    pub(crate) fn new(spans: Vec<Span>, ids: HashMap<SpanId, SpanIndex>) -> Self {
        debug_assert!(spans.first().is_some_and(|root| root.parent.is_none()));
        Self { spans, ids }
    }

    pub fn root(&self) -> &Span {
        &self.spans[SpanIndex::ROOT.0]
    }

    pub fn get(&self, index: SpanIndex) -> Option<&Span> {
        self.spans.get(index.0)
    }

    /// Look up a span by its producer-assigned id.
    pub fn index_of(&self, id: SpanId) -> Option<SpanIndex> {
        self.ids.get(&id).copied()
    }

    /// All spans, root first, in the order they were started.
    pub fn iter(&self) -> impl Iterator<Item = (SpanIndex, &Span)> {
        self.spans
            .iter()
            .enumerate()
            .map(|(i, span)| (SpanIndex(i), span))
    }

    /// Number of spans including the root.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// True when no span besides the root exists.
    pub fn is_empty(&self) -> bool {
        self.spans.len() <= 1
    }

    /// Latest timestamp in the event stream.
    pub fn max_timestamp(&self) -> Timestamp {
        self.root().interval.end
    }

    /// Nesting depth of the deepest span; top-level spans have depth 1.
    pub fn depth(&self) -> usize {
        // Parents always sit at a lower index than their children
        let mut depths = vec![0usize; self.spans.len()];
        for (i, span) in self.spans.iter().enumerate().skip(1) {
            if let Some(parent) = span.parent {
                depths[i] = depths[parent.0] + 1;
            }
        }
        depths.into_iter().max().unwrap_or(0)
    }
}

impl Index<SpanIndex> for Trace {
    type Output = Span;

    fn index(&self, index: SpanIndex) -> &Span {
        &self.spans[index.0]
    }
}
