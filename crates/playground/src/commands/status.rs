//! Status command - configuration sources and storage location.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use serde::Serialize;

use super::Context;

/// Arguments for the status command.
#[derive(Args, Debug)]
pub struct StatusArgs {}

/// Status response for JSON output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusOutput {
    session_id: String,
    entries: usize,
    pending_tasks: usize,
    storage_key: String,
    storage_path: Option<PathBuf>,
    max_entries: Option<usize>,
    config_files: Vec<PathBuf>,
    warnings: Vec<String>,
}

/// Run the status command.
pub async fn run(_args: StatusArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store();
    let store_config = store.config();

    let output = StatusOutput {
        session_id: store.session_id(),
        entries: store.len(),
        pending_tasks: store.pending_tasks(),
        storage_key: store_config.storage_key.clone(),
        storage_path: ctx.storage.path_for(&store_config.storage_key).ok(),
        max_entries: store_config.max_entries,
        config_files: ctx
            .config
            .loaded_from()
            .into_iter()
            .map(|p| p.to_path_buf())
            .collect(),
        warnings: ctx.config.warnings.clone(),
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    let yellow = Style::new().yellow();

    println!();
    println!("{}", style("Playground Status").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();
    println!("  {} {}", dim.apply_to("Session:"), output.session_id);
    println!("  {} {}", dim.apply_to("Entries:"), output.entries);
    println!(
        "  {} {}",
        dim.apply_to("Retention:"),
        output
            .max_entries
            .map(|n| format!("{n} entries"))
            .unwrap_or_else(|| "unbounded".to_string())
    );
    println!("  {} {}", dim.apply_to("Storage key:"), output.storage_key);
    if let Some(path) = &output.storage_path {
        println!("  {} {}", dim.apply_to("Storage file:"), path.display());
    }
    println!("  {} {}", dim.apply_to("Data dir:"), ctx.data_dir.display());

    if output.config_files.is_empty() {
        println!("  {} {}", dim.apply_to("Config:"), dim.apply_to("defaults"));
    } else {
        for path in &output.config_files {
            println!("  {} {}", dim.apply_to("Config:"), path.display());
        }
    }
    for warning in &output.warnings {
        println!("  {} {}", yellow.apply_to("Warning:"), warning);
    }
    println!();

    Ok(())
}
