pub mod config;
pub mod trace;

// Re-export the pipeline entry points for convenience
pub use config::{RenderConfig, SwimlaneConfig};
pub use trace::{Event, Layout, Trace, TraceBuilder, compute_layout};
