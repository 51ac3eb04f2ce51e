//! Export command - write the session to `context-export-<sessionId>.json`.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use console::Style;
use playground_context::DirectorySink;

use super::Context;

/// Arguments for the export command.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Directory to write the export to (default: configured export dir)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Print the export to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

/// Run the export command.
pub async fn run(args: ExportArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store();

    if args.stdout {
        let export = store.export_context().context("failed to export context")?;
        println!("{}", export.contents);
        return Ok(());
    }

    let dir = args
        .dir
        .unwrap_or_else(|| ctx.config.config.effective_export_dir());
    let path = store
        .export_to(&DirectorySink::new(dir))
        .context("failed to export context")?;

    if ctx.json_output {
        println!("{}", serde_json::json!({ "path": path }));
    } else {
        let green = Style::new().green();
        println!("{} Exported to {}", green.apply_to("✓"), path.display());
    }

    Ok(())
}
