//! Show command - session summary and entries.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use console::{Style, style};
use playground_context::{ContextSummary, EntryKind, format_timestamp};

use super::Context;

/// Arguments for the show command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Maximum entries to show (most recent last)
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Only show the summary
    #[arg(short, long)]
    pub summary: bool,
}

/// Run the show command.
pub async fn run(args: ShowArgs, ctx: &Context) -> Result<()> {
    let state = ctx.store().snapshot();

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    let summary = ContextSummary::from_state(&state, Utc::now().timestamp_millis());
    let dim = Style::new().dim();

    println!();
    println!("{}", style("Context Summary").bold());
    println!("{}", dim.apply_to("─".repeat(50)));
    println!("  {} {}", dim.apply_to("Session ID:"), summary.session_id);
    println!("  {} {}", dim.apply_to("Session Duration:"), summary.duration);
    println!("  {} {}", dim.apply_to("Total Entries:"), summary.total_entries);
    for (kind, count) in &summary.counts {
        println!("    {} {}", kind_style(*kind).apply_to(format!("{kind:<13}")), count);
    }
    println!();

    if args.summary {
        return Ok(());
    }

    if state.entries.is_empty() {
        println!(
            "{}",
            dim.apply_to("No context entries yet. Start interacting with the app!")
        );
        println!();
        return Ok(());
    }

    let skip = state.entries.len().saturating_sub(args.limit);
    if skip > 0 {
        println!("{}", dim.apply_to(format!("... {skip} earlier entries")));
    }
    for entry in &state.entries[skip..] {
        println!(
            "{} {} {}",
            dim.apply_to(format_timestamp(entry.timestamp)),
            kind_style(entry.kind).apply_to(format!("[{}]", entry.kind)),
            entry.description
        );
        if ctx.verbose && !entry.data.is_empty() {
            println!(
                "    {}",
                dim.apply_to(serde_json::to_string(&entry.data)?)
            );
        }
    }
    println!();

    Ok(())
}

fn kind_style(kind: EntryKind) -> Style {
    match kind {
        EntryKind::Interaction => Style::new().green(),
        EntryKind::StateChange => Style::new().blue(),
        EntryKind::SessionInfo => Style::new().magenta(),
    }
}
