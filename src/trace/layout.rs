//! Swimlane row assignment.
//!
//! Two passes over a finished [`Trace`]:
//!
//! 1. **Local, bottom-up.** Each span packs its own children into rows below
//!    itself (row 0 is the span). Children are taken in start order and each
//!    one drops to the first row where its rectangle (time interval × the rows
//!    its own subtree needs) does not hit an already-placed sibling. A span is
//!    processed only once all its children are, driven by a [`WorkQueue`].
//!
//! 2. **Absolute, top-down.** A depth-first walk from the root adds each
//!    child's relative row to its parent's absolute row. Children are pushed in
//!    reverse start order so every row fills in time order.
//!
//! The resulting rows are then checked: spans within a row must not overlap
//! and no span may end before it starts. A failed check is an error, never
//! silently rendered.

use std::collections::HashMap;

use super::error::LayoutError;
use super::event::Interval;
use super::queue::WorkQueue;
use super::span::{SpanIndex, Trace};

/// A child's placement relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LayoutRect {
    interval: Interval,
    /// Offset below the parent, at least 1
    row: usize,
    /// Rows taken by the child's subtree, including the child itself
    height: usize,
}

impl LayoutRect {
    /// Time intervals intersect (touching counts) and row bands intersect.
    fn overlaps(&self, other: &LayoutRect) -> bool {
        let left = self.interval.end < other.interval.start;
        let right = other.interval.end < self.interval.start;
        let up = self.row + self.height <= other.row;
        let down = other.row + other.height <= self.row;
        !(left || right || up || down)
    }
}

/// How a span arranges its own children.
#[derive(Debug, Clone)]
struct LocalLayout {
    /// Rows used by the span and its subtree
    total_height: usize,
    /// Children in start order
    children: Vec<SpanIndex>,
    rects: HashMap<SpanIndex, LayoutRect>,
}

/// Final row assignment for every span in a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    rows: Vec<Vec<SpanIndex>>,
    span_rows: Vec<Option<usize>>,
}

impl Layout {
    /// Spans per row, each row in start order. Row 0 holds only the root.
    pub fn rows(&self) -> &[Vec<SpanIndex>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Absolute row of a span.
    pub fn row_of(&self, span: SpanIndex) -> Option<usize> {
        self.span_rows.get(span.index()).copied().flatten()
    }

    /// Every `(row, span)` pair, row by row.
    pub fn placements(&self) -> impl Iterator<Item = (usize, SpanIndex)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(row, spans)| spans.iter().map(move |span| (row, *span)))
    }
}

/// Assign every span in `trace` to a row.
pub fn compute_layout(trace: &Trace) -> Result<Layout, LayoutError> {
    let layouts = compute_local_layouts(trace)?;
    let root_layout = layouts[SpanIndex::ROOT.index()]
        .as_ref()
        .ok_or(LayoutError::MissingRootLayout)?;

    let row_count = root_layout.total_height;
    let mut rows: Vec<Vec<SpanIndex>> = vec![Vec::new(); row_count];
    let mut span_rows = vec![None; trace.len()];

    let mut stack = vec![(SpanIndex::ROOT, 0usize)];
    while let Some((span, row)) = stack.pop() {
        let Some(lane) = rows.get_mut(row) else {
            return Err(LayoutError::RowOutOfRange {
                span,
                row,
                row_count,
            });
        };
        lane.push(span);
        span_rows[span.index()] = Some(row);

        let local = layouts[span.index()]
            .as_ref()
            .ok_or(LayoutError::MissingChildLayout {
                parent: trace[span].parent.unwrap_or(SpanIndex::ROOT),
                child: span,
            })?;
        for &child in local.children.iter().rev() {
            let rect = local
                .rects
                .get(&child)
                .ok_or(LayoutError::MissingChildRect {
                    parent: span,
                    child,
                })?;
            stack.push((child, row + rect.row));
        }
    }

    verify_rows(trace, &rows)?;
    log::debug!("Laid out {} spans in {} rows", trace.len(), rows.len());

    Ok(Layout { rows, span_rows })
}

/// Pass 1: compute every span's local layout, leaves before parents.
fn compute_local_layouts(trace: &Trace) -> Result<Vec<Option<LocalLayout>>, LayoutError> {
    let mut children_remaining: Vec<usize> =
        trace.iter().map(|(_, span)| span.children.len()).collect();
    let leaves: Vec<SpanIndex> = trace
        .iter()
        .filter(|(_, span)| span.children.is_empty())
        .map(|(index, _)| index)
        .collect();

    let mut layouts: Vec<Option<LocalLayout>> = vec![None; trace.len()];
    let mut queue = WorkQueue::from(leaves);

    while let Some(span) = queue.pop() {
        let layout = compute_local_layout(trace, span, &layouts)?;
        layouts[span.index()] = Some(layout);

        if let Some(parent) = trace[span].parent {
            let remaining = &mut children_remaining[parent.index()];
            *remaining -= 1;
            if *remaining == 0 {
                queue.push(parent);
            }
        }
    }

    Ok(layouts)
}

/// Greedily pack `span`'s children into the lowest free rows below it.
fn compute_local_layout(
    trace: &Trace,
    span: SpanIndex,
    layouts: &[Option<LocalLayout>],
) -> Result<LocalLayout, LayoutError> {
    let mut children = trace[span].children.clone();
    // Stable: equal starts keep event-arrival order
    children.sort_by_key(|child| trace[*child].interval.start);

    let mut placed: Vec<LayoutRect> = Vec::with_capacity(children.len());
    let mut rects = HashMap::with_capacity(children.len());
    let mut total_height = 1;

    for &child in &children {
        let child_layout =
            layouts[child.index()]
                .as_ref()
                .ok_or(LayoutError::MissingChildLayout {
                    parent: span,
                    child,
                })?;

        let mut rect = LayoutRect {
            interval: trace[child].interval,
            row: 1,
            height: child_layout.total_height,
        };
        while placed.iter().any(|other| rect.overlaps(other)) {
            rect.row += 1;
        }

        total_height = total_height.max(rect.row + rect.height);
        placed.push(rect);
        rects.insert(child, rect);
    }

    Ok(LocalLayout {
        total_height,
        children,
        rects,
    })
}

/// Every row must be in time order with no overlaps and no inverted spans.
fn verify_rows(trace: &Trace, rows: &[Vec<SpanIndex>]) -> Result<(), LayoutError> {
    for (row, lane) in rows.iter().enumerate() {
        let mut previous: Option<SpanIndex> = None;
        for &span in lane {
            let interval = trace[span].interval;
            if interval.end < interval.start {
                return Err(LayoutError::InvertedInterval {
                    row,
                    span,
                    start: interval.start,
                    end: interval.end,
                });
            }
            if let Some(previous) = previous {
                let end = trace[previous].interval.end;
                if interval.start < end {
                    return Err(LayoutError::RowOverlap {
                        row,
                        previous,
                        next: span,
                        end,
                        start: interval.start,
                    });
                }
            }
            previous = Some(span);
        }
    }
    Ok(())
}
