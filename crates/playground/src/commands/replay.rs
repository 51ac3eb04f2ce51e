//! Replay command - feed a stream of events through the store.
//!
//! Input is newline-delimited JSON, one event handler invocation per line:
//!
//! ```text
//! {"type": "interaction", "description": "click", "data": {"x": 1}}
//! {"action": "clear"}
//! {"action": "export", "dir": "./exports"}
//! ```
//!
//! Deferred work queued by a line runs before the next line is read.

use std::path::PathBuf;

use anyhow::{Context as _, Result, anyhow};
use clap::Args;
use console::Style;
use playground_context::{DirectorySink, EntryData, EntryKind};
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use super::Context;

/// Arguments for the replay command.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// File of newline-delimited JSON events (default: stdin)
    pub file: Option<PathBuf>,

    /// Skip malformed lines instead of stopping
    #[arg(long)]
    pub keep_going: bool,
}

/// One line of replay input.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
enum ReplayLine {
    Action(ActionLine),
    Event {
        #[serde(rename = "type")]
        kind: EntryKind,
        description: String,
        #[serde(default)]
        data: EntryData,
    },
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ActionLine {
    Clear,
    Export { dir: Option<PathBuf> },
}

#[derive(Debug, Default, PartialEq)]
struct ReplayStats {
    recorded: usize,
    clears: usize,
    exports: Vec<PathBuf>,
    skipped: usize,
}

/// Run the replay command.
pub async fn run(args: ReplayArgs, ctx: &Context) -> Result<()> {
    let stats = match &args.file {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            replay(BufReader::new(file), args.keep_going, ctx).await?
        }
        None => replay(BufReader::new(tokio::io::stdin()), args.keep_going, ctx).await?,
    };

    if ctx.json_output {
        println!(
            "{}",
            serde_json::json!({
                "recorded": stats.recorded,
                "clears": stats.clears,
                "exports": stats.exports,
                "skipped": stats.skipped,
                "sessionId": ctx.store().session_id(),
            })
        );
    } else {
        let green = Style::new().green();
        let dim = Style::new().dim();
        println!(
            "{} Replayed {} events ({} clears, {} exports)",
            green.apply_to("✓"),
            stats.recorded,
            stats.clears,
            stats.exports.len()
        );
        if stats.skipped > 0 {
            println!("{}", dim.apply_to(format!("  {} lines skipped", stats.skipped)));
        }
        for path in &stats.exports {
            println!("  {} {}", dim.apply_to("Exported:"), path.display());
        }
    }

    Ok(())
}

async fn replay<R: AsyncBufRead + Unpin>(
    reader: R,
    keep_going: bool,
    ctx: &Context,
) -> Result<ReplayStats> {
    let store = ctx.store();
    let mut stats = ReplayStats::default();
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parsed = match serde_json::from_str::<ReplayLine>(line) {
            Ok(parsed) => parsed,
            Err(e) if keep_going => {
                debug!(line = line_no, error = %e, "Skipping malformed replay line");
                stats.skipped += 1;
                continue;
            }
            Err(e) => return Err(anyhow!("line {line_no}: {e}")),
        };

        match parsed {
            ReplayLine::Event {
                kind,
                description,
                data,
            } => {
                store.add_entry(kind, description, data);
                stats.recorded += 1;
            }
            ReplayLine::Action(ActionLine::Clear) => {
                store.clear_context();
                stats.clears += 1;
            }
            ReplayLine::Action(ActionLine::Export { dir }) => {
                let dir = dir.unwrap_or_else(|| ctx.config.config.effective_export_dir());
                let path = store
                    .export_to(&DirectorySink::new(dir))
                    .with_context(|| format!("line {line_no}: export failed"))?;
                stats.exports.push(path);
            }
        }

        store.run_pending();
    }

    Ok(stats)
}
