//! Record command - append an event to the session.

use anyhow::Result;
use clap::Args;
use console::Style;
use playground_context::EntryKind;

use super::{Context, parse_data};

/// Arguments for the record command.
#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Entry type: interaction, state_change or session_info
    pub kind: EntryKind,

    /// Human-readable description of the event
    pub description: String,

    /// Event payload as a JSON object
    #[arg(short, long)]
    pub data: Option<String>,

    /// Extra payload fields as key=value (repeatable)
    #[arg(short, long = "field")]
    pub fields: Vec<String>,
}

/// Run the record command.
pub async fn run(args: RecordArgs, ctx: &Context) -> Result<()> {
    let data = parse_data(args.data.as_deref(), &args.fields)?;
    let entry = ctx.store().add_entry(args.kind, args.description, data);

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        let green = Style::new().green();
        let dim = Style::new().dim();
        println!(
            "{} Recorded {} {}",
            green.apply_to("✓"),
            entry.kind,
            dim.apply_to(&entry.id)
        );
    }

    Ok(())
}
