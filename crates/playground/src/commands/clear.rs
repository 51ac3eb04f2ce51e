//! Clear command - discard the session and start a new one.

use anyhow::{Result, bail};
use clap::Args;
use console::Style;
use serde::Serialize;

use super::Context;

/// Arguments for the clear command.
#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Confirm clearing all context data
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClearOutput {
    previous_session_id: String,
    session_id: String,
}

/// Run the clear command.
pub async fn run(args: ClearArgs, ctx: &Context) -> Result<()> {
    if !args.yes {
        bail!("refusing to clear all context data without --yes");
    }

    let store = ctx.store();
    let previous_session_id = store.session_id();
    store.clear_context();

    let output = ClearOutput {
        previous_session_id,
        session_id: store.session_id(),
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let green = Style::new().green();
        let dim = Style::new().dim();
        println!(
            "{} Context cleared, new session {}",
            green.apply_to("✓"),
            dim.apply_to(&output.session_id)
        );
    }

    Ok(())
}
