//! Span-tree construction and swimlane layout.
//!
//! A trace arrives as an ordered stream of span events (start, schedule,
//! deschedule, end). [`TraceBuilder`] validates the stream and assembles a
//! [`Trace`]; [`compute_layout`] then packs every span onto a row so that a
//! span sits below its parent and no two spans on a row overlap in time.
//!
//! # Usage
//!
//! ```
//! use swimlane::config::RenderConfig;
//! use swimlane::trace::{TraceBuilder, compute_layout, parse_events, render};
//!
//! let input = r#"
//! {"type": "SpanStart", "id": 1, "ts": 0, "name": "request"}
//! {"type": "SpanEnd", "id": 1, "ts": 10}
//! "#;
//!
//! let trace = TraceBuilder::from_events(parse_events(input)?)?;
//! let layout = compute_layout(&trace)?;
//! println!("{}", render(&trace, &layout, &RenderConfig::default()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod display;
pub mod error;
pub mod event;
pub mod layout;
pub mod queue;
pub mod span;
pub mod summary;

// Re-export main types for convenience
pub use builder::{ROOT_NAME, TraceBuilder};
pub use display::{render, render_summary};
pub use error::{LayoutError, ParseError, TraceError};
pub use event::{Event, Interval, SpanId, Timestamp, parse_events, parse_line};
pub use layout::{Layout, compute_layout};
pub use queue::WorkQueue;
pub use span::{Span, SpanIndex, Trace};
pub use summary::{NameStats, TraceSummary, summarize};
