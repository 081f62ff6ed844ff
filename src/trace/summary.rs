//! Aggregate statistics over a finished trace.

use std::collections::HashMap;
use std::sync::Arc;

use super::event::Timestamp;
use super::layout::Layout;
use super::span::Trace;

/// Statistics for all spans sharing one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameStats {
    pub name: Arc<str>,
    pub count: usize,
    /// Sum of span lifetimes, in ticks
    pub total: Timestamp,
    /// Sum of scheduled sub-intervals, in ticks
    pub scheduled: Timestamp,
    pub p50: Timestamp,
    pub max: Timestamp,
}

/// Overview of a trace and its layout.
#[derive(Debug)]
pub struct TraceSummary {
    /// Spans excluding the root
    pub span_count: usize,
    pub max_depth: usize,
    /// Latest timestamp in the trace
    pub duration: Timestamp,
    pub row_count: usize,
    /// Sorted by total time descending, then by name
    pub name_stats: Vec<NameStats>,
}

/// Summarize `trace` and the rows `layout` assigned to it.
pub fn summarize(trace: &Trace, layout: &Layout) -> TraceSummary {
    TraceSummary {
        span_count: trace.len() - 1,
        max_depth: trace.depth(),
        duration: trace.max_timestamp(),
        row_count: layout.row_count(),
        name_stats: compute_name_stats(trace),
    }
}

/// Group spans by name and compute statistics for each group.
fn compute_name_stats(trace: &Trace) -> Vec<NameStats> {
    let mut groups: HashMap<Arc<str>, (Vec<Timestamp>, Timestamp)> = HashMap::new();

    for (_, span) in trace.iter().skip(1) {
        let (durations, scheduled) = groups.entry(Arc::clone(&span.name)).or_default();
        durations.push(span.duration());
        *scheduled += span.scheduled_time();
    }

    let mut stats: Vec<NameStats> = groups
        .into_iter()
        .map(|(name, (mut durations, scheduled))| {
            durations.sort_unstable();
            NameStats {
                name,
                count: durations.len(),
                total: durations.iter().sum(),
                scheduled,
                p50: percentile(&durations, 50),
                max: durations.last().copied().unwrap_or(0),
            }
        })
        .collect();

    stats.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    stats
}

/// Compute a percentile from sorted durations.
fn percentile(sorted: &[Timestamp], pct: usize) -> Timestamp {
    if sorted.is_empty() {
        return 0;
    }
    let idx = (sorted.len() * pct / 100).min(sorted.len() - 1);
    sorted[idx]
}
