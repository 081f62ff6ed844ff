//! Plain-text rendering of a laid-out trace.

use std::fmt::Write as _;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::event::{Interval, Timestamp};
use super::layout::Layout;
use super::span::Trace;
use super::summary::TraceSummary;
use crate::config::RenderConfig;

const NAME_COLUMN: usize = 15;

/// Render the layout: header, optional timeline, then every row's spans.
pub fn render(trace: &Trace, layout: &Layout, config: &RenderConfig) -> String {
    let mut out = String::new();

    render_header(&mut out, trace, layout);
    if config.timeline {
        render_timeline(&mut out, trace, layout, config);
    }
    render_rows(&mut out, trace, layout);

    out
}

/// Render the per-name breakdown table.
pub fn render_summary(summary: &TraceSummary) -> String {
    let mut out = String::new();

    out.push_str("\nNAME BREAKDOWN\n");
    out.push_str("--------------\n");
    writeln!(
        out,
        "{} {:>6} {:>8} {:>8} {:>8} {:>8}",
        pad("Name", NAME_COLUMN),
        "Count",
        "Total",
        "Sched",
        "p50",
        "Max"
    )
    .unwrap();
    writeln!(
        out,
        "{} {:>6} {:>8} {:>8} {:>8} {:>8}",
        "-".repeat(NAME_COLUMN),
        "------",
        "--------",
        "--------",
        "--------",
        "--------"
    )
    .unwrap();

    for stat in &summary.name_stats {
        writeln!(
            out,
            "{} {:>6} {:>8} {:>8} {:>8} {:>8}",
            pad(&truncate(&stat.name, NAME_COLUMN), NAME_COLUMN),
            stat.count,
            stat.total,
            stat.scheduled,
            stat.p50,
            stat.max,
        )
        .unwrap();
    }

    writeln!(
        out,
        "\nspans: {}  depth: {}  rows: {}  duration: {}",
        summary.span_count, summary.max_depth, summary.row_count, summary.duration
    )
    .unwrap();

    out
}

fn render_header(out: &mut String, trace: &Trace, layout: &Layout) {
    out.push_str("============================================================\n");
    out.push_str("                      SWIMLANE LAYOUT\n");
    out.push_str("============================================================\n");
    writeln!(
        out,
        "spans: {}  rows: {}  duration: {}",
        trace.len() - 1,
        layout.row_count(),
        trace.max_timestamp()
    )
    .unwrap();
}

fn render_timeline(out: &mut String, trace: &Trace, layout: &Layout, config: &RenderConfig) {
    out.push_str("\nTIMELINE\n");
    out.push_str("--------\n");

    let width = config.width;
    let max_ts = trace.max_timestamp().max(1);

    for (row, spans) in layout.rows().iter().enumerate() {
        let mut cells = vec![' '; width];
        for &span in spans {
            let span = &trace[span];
            fill(&mut cells, span.interval, max_ts, '-');
            if config.scheduled {
                for scheduled in &span.scheduled {
                    fill(&mut cells, *scheduled, max_ts, '#');
                }
            }
        }
        let bar: String = cells.into_iter().collect();
        writeln!(out, "{row:>4} |{bar}|").unwrap();
    }
}

/// Paint `interval` onto `cells`; every span gets at least one cell.
fn fill(cells: &mut [char], interval: Interval, max_ts: Timestamp, ch: char) {
    let width = cells.len();
    if width == 0 {
        return;
    }
    let start = column(interval.start, max_ts, width).min(width - 1);
    let end = column(interval.end, max_ts, width).max(start + 1).min(width);
    cells[start..end].fill(ch);
}

fn column(ts: Timestamp, max_ts: Timestamp, width: usize) -> usize {
    (u128::from(ts) * width as u128 / u128::from(max_ts)) as usize
}

fn render_rows(out: &mut String, trace: &Trace, layout: &Layout) {
    out.push_str("\nROWS\n");
    out.push_str("----\n");

    for (row, spans) in layout.rows().iter().enumerate() {
        writeln!(out, "Row {row}").unwrap();
        for &span in spans {
            let span = &trace[span];
            writeln!(
                out,
                "  {} ({} to {})",
                span.name, span.interval.start, span.interval.end
            )
            .unwrap();
        }
    }
}

/// Shorten `s` to at most `max_width` display columns, ending in `...` when cut.
fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(3);
    let mut used = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str("...");
    out
}

/// Left-align `s` in `width` display columns.
fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(fill))
}
