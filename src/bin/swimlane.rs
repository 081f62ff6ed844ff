//! Lay out a span-event trace as swimlanes and print it.
//!
//! # Usage
//!
//! ```bash
//! # Render from a file
//! swimlane trace.ndjson
//!
//! # Render from stdin, with the per-name breakdown
//! my-app --emit-trace | swimlane --summary
//! ```
//!
//! Input is newline-delimited JSON, one event per line:
//!
//! ```text
//! {"type":"SpanStart","id":1,"ts":0,"name":"request"}
//! {"type":"SpanEnd","id":1,"ts":10}
//! ```

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, bail};
use clap::Parser;
use swimlane::config::{MIN_WIDTH, SwimlaneConfig};
use swimlane::trace::{self, TraceBuilder};

#[derive(Parser, Debug)]
#[command(name = "swimlane", version, about = "Lay out span traces as swimlanes")]
struct Cli {
    /// NDJSON trace file; reads stdin when omitted or `-`
    file: Option<PathBuf>,

    /// Config file (default: $SWIMLANE_CONFIG_PATH, then ~/.config/swimlane/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Timeline width in columns
    #[arg(long, value_parser = clap::value_parser!(u16).range(MIN_WIDTH as i64..))]
    width: Option<u16>,

    /// Skip the ASCII timeline
    #[arg(long)]
    no_timeline: bool,

    /// Append the per-name breakdown
    #[arg(long)]
    summary: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = SwimlaneConfig::load(cli.config.as_deref())?.render;
    if let Some(width) = cli.width {
        config.width = usize::from(width);
    }
    if cli.no_timeline {
        config.timeline = false;
    }
    if cli.summary {
        config.summary = true;
    }

    let input = read_input(cli.file.as_deref())?;
    let events = trace::parse_events(&input).context("Failed to parse trace")?;
    if events.is_empty() {
        bail!("No events found in input");
    }
    log::debug!("Parsed {} events", events.len());

    let trace = TraceBuilder::from_events(events).context("Invalid event stream")?;
    let layout = trace::compute_layout(&trace).context("Failed to lay out trace")?;

    print!("{}", trace::render(&trace, &layout, &config));
    if config.summary {
        print!("{}", trace::render_summary(&trace::summarize(&trace, &layout)));
    }
    Ok(())
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            if std::io::stdin().is_terminal() {
                bail!("No input: pass a trace file or pipe events on stdin");
            }
            let mut content = String::new();
            std::io::stdin()
                .lock()
                .read_to_string(&mut content)
                .context("Failed to read stdin")?;
            Ok(content)
        }
    }
}
