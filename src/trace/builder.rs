//! Event-stream state machine that assembles a [`Trace`].
//!
//! Every event is validated in O(1) before it touches any state, so a rejected
//! event leaves the builder exactly as it was. Finalizing is lenient: spans
//! still open at the end of the stream are closed at the latest timestamp, so
//! a capture cut off mid-flight still produces a usable trace.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexSet;

use super::error::TraceError;
use super::event::{Event, Interval, SpanId, Timestamp};
use super::span::{Span, SpanIndex, Trace};

/// Name given to the synthetic root span.
pub const ROOT_NAME: &str = "<root>";

/// A span whose end (and latest scheduled interval) may still be open.
#[derive(Debug)]
struct PendingSpan {
    id: Option<SpanId>,
    name: Arc<str>,
    start: Timestamp,
    end: Option<Timestamp>,
    parent: Option<SpanIndex>,
    children: Vec<SpanIndex>,
    scheduled: Vec<PendingInterval>,
}

#[derive(Debug)]
struct PendingInterval {
    start: Timestamp,
    end: Option<Timestamp>,
}

/// Builds a [`Trace`] from an ordered stream of [`Event`]s.
///
/// # Usage
///
/// ```
/// use swimlane::{Event, TraceBuilder};
///
/// let mut builder = TraceBuilder::new();
/// builder.add_event(Event::SpanStart { id: 1, parent: None, ts: 0, name: "work".into() })?;
/// builder.add_event(Event::SpanEnd { id: 1, ts: 10 })?;
/// let trace = builder.finalize();
/// assert_eq!(trace.max_timestamp(), 10);
/// # Ok::<(), swimlane::trace::TraceError>(())
/// ```
#[derive(Debug)]
pub struct TraceBuilder {
    /// Slot 0 is the root; its `end` tracks the latest timestamp seen
    spans: Vec<PendingSpan>,
    ids: HashMap<SpanId, SpanIndex>,
    unclosed: IndexSet<SpanIndex>,
    names: HashSet<Arc<str>>,
}

impl TraceBuilder {
    pub fn new() -> Self {
        let root_name: Arc<str> = Arc::from(ROOT_NAME);
        let root = PendingSpan {
            id: None,
            name: Arc::clone(&root_name),
            start: 0,
            end: None,
            parent: None,
            children: Vec::new(),
            scheduled: Vec::new(),
        };
        Self {
            spans: vec![root],
            ids: HashMap::new(),
            unclosed: IndexSet::new(),
            names: HashSet::from([root_name]),
        }
    }

    /// Feed every event in order and finalize, stopping at the first invalid event.
    pub fn from_events<I>(events: I) -> Result<Trace, TraceError>
    where
        I: IntoIterator<Item = Event>,
    {
        let mut builder = Self::new();
        for event in events {
            builder.add_event(event)?;
        }
        Ok(builder.finalize())
    }

    /// Latest timestamp accepted so far, `None` before the first event.
    pub fn max_timestamp(&self) -> Option<Timestamp> {
        self.spans[SpanIndex::ROOT.index()].end
    }

    /// Number of spans started and not yet ended.
    pub fn open_spans(&self) -> usize {
        self.unclosed.len()
    }

    /// Validate and apply one event.
    ///
    /// Timestamps must strictly increase across all events, whatever their kind.
    pub fn add_event(&mut self, event: Event) -> Result<(), TraceError> {
        let ts = event.ts();
        if let Some(previous) = self.max_timestamp()
            && ts <= previous
        {
            return Err(TraceError::NonMonotonic { previous, ts });
        }

        match event {
            Event::SpanStart {
                id,
                parent,
                ts,
                name,
            } => self.start_span(id, parent, ts, &name)?,
            Event::Schedule { id, ts } => self.schedule(id, ts)?,
            Event::Deschedule { id, ts } => self.deschedule(id, ts)?,
            Event::SpanEnd { id, ts } => self.end_span(id, ts)?,
        }

        self.spans[SpanIndex::ROOT.index()].end = Some(ts);
        Ok(())
    }

    fn start_span(
        &mut self,
        id: SpanId,
        parent: Option<SpanId>,
        ts: Timestamp,
        name: &str,
    ) -> Result<(), TraceError> {
        if self.ids.contains_key(&id) {
            return Err(TraceError::DuplicateSpan { id });
        }
        let parent_index = match parent {
            Some(parent) => *self
                .ids
                .get(&parent)
                .ok_or(TraceError::InvalidParent { id, parent })?,
            None => SpanIndex::ROOT,
        };

        let index = SpanIndex::new(self.spans.len());
        let name = self.intern(name);
        self.spans.push(PendingSpan {
            id: Some(id),
            name,
            start: ts,
            end: None,
            parent: Some(parent_index),
            children: Vec::new(),
            scheduled: Vec::new(),
        });
        self.spans[parent_index.index()].children.push(index);
        self.ids.insert(id, index);
        self.unclosed.insert(index);
        Ok(())
    }

    fn schedule(&mut self, id: SpanId, ts: Timestamp) -> Result<(), TraceError> {
        let span = self.lookup_mut(id)?;
        if span.scheduled.last().is_some_and(|last| last.end.is_none()) {
            return Err(TraceError::DuplicateSchedule { id, ts });
        }
        span.scheduled.push(PendingInterval {
            start: ts,
            end: None,
        });
        Ok(())
    }

    fn deschedule(&mut self, id: SpanId, ts: Timestamp) -> Result<(), TraceError> {
        let span = self.lookup_mut(id)?;
        match span.scheduled.last_mut() {
            Some(last) if last.end.is_none() => {
                last.end = Some(ts);
                Ok(())
            }
            _ => Err(TraceError::MismatchedDeschedule { id, ts }),
        }
    }

    fn end_span(&mut self, id: SpanId, ts: Timestamp) -> Result<(), TraceError> {
        let index = self.lookup(id)?;
        if !self.unclosed.shift_remove(&index) {
            return Err(TraceError::DuplicateClose { id });
        }
        self.spans[index.index()].end = Some(ts);
        Ok(())
    }

    fn lookup(&self, id: SpanId) -> Result<SpanIndex, TraceError> {
        self.ids
            .get(&id)
            .copied()
            .ok_or(TraceError::UnknownSpan { id })
    }

    fn lookup_mut(&mut self, id: SpanId) -> Result<&mut PendingSpan, TraceError> {
        let index = self.lookup(id)?;
        Ok(&mut self.spans[index.index()])
    }

    /// Return the stored copy of `name`, storing it on first sight.
    fn intern(&mut self, name: &str) -> Arc<str> {
        if let Some(cached) = self.names.get(name) {
            return Arc::clone(cached);
        }
        let name: Arc<str> = Arc::from(name);
        self.names.insert(Arc::clone(&name));
        name
    }

    /// Close anything still open and freeze the tree.
    ///
    /// Open spans and open scheduled intervals end at the latest timestamp.
    /// Children are sorted by start time, ties keeping arrival order.
    pub fn finalize(self) -> Trace {
        let max_ts = self.max_timestamp().unwrap_or(0);

        if !self.unclosed.is_empty() {
            log::warn!(
                "Closing {} unfinished span(s) at timestamp {}",
                self.unclosed.len(),
                max_ts
            );
        }
        for index in &self.unclosed {
            let span = &self.spans[index.index()];
            log::debug!(
                "Force-closing span {:?} '{}' started at {}",
                span.id,
                span.name,
                span.start
            );
        }

        let starts: Vec<Timestamp> = self.spans.iter().map(|span| span.start).collect();
        let spans = self
            .spans
            .into_iter()
            .map(|pending| {
                let mut children = pending.children;
                children.sort_by_key(|child| starts[child.index()]);
                Span {
                    id: pending.id,
                    name: pending.name,
                    interval: Interval::new(pending.start, pending.end.unwrap_or(max_ts)),
                    parent: pending.parent,
                    children,
                    scheduled: pending
                        .scheduled
                        .into_iter()
                        .map(|s| Interval::new(s.start, s.end.unwrap_or(max_ts)))
                        .collect(),
                }
            })
            .collect();

        Trace::new(spans, self.ids)
    }
}

impl Default for TraceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
