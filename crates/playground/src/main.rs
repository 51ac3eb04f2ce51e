//! Playground - session context recorder
//!
//! Main entry point for the playground CLI. Every invocation is one
//! application instance: it rehydrates the session, handles one command and
//! lets queued follow-up work run before exiting.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

mod commands;
mod terminal;

use commands::{clear, export, record, replay, show, status};
use playground_context::{ContextConfig, ContextScope, ContextStore, FileStore};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Playground - record, inspect and export interaction sessions
#[derive(Parser)]
#[command(name = "playground")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding session state and logs
    #[arg(long, global = true, env = "PLAYGROUND_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record an event in the current session
    Record(record::RecordArgs),

    /// Show the session summary and its entries
    Show(show::ShowArgs),

    /// Clear the session and start a new one
    Clear(clear::ClearArgs),

    /// Export the session as a JSON file
    Export(export::ExportArgs),

    /// Replay newline-delimited events from a file or stdin
    Replay(replay::ReplayArgs),

    /// Show configuration and storage status
    Status(status::StatusArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = playground_config::load_config(None).context("failed to load configuration")?;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| loaded.config.effective_data_dir());

    // Initialize tracing: console (human-readable, stderr) + rotating JSON file
    let filter = if cli.verbose {
        "playground=debug,playground_context=debug,info"
    } else {
        "playground=warn,playground_context=warn,warn"
    };

    let file_appender = tracing_appender::rolling::daily(data_dir.join("logs"), "playground.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "playground=trace,playground_context=trace,info",
                )),
        )
        .init();

    for warning in &loaded.warnings {
        warn!("{}", warning);
    }

    // Open the session store and install it for the command handlers
    let mut store_config = ContextConfig::new();
    if let Some(key) = loaded.config.storage_key() {
        store_config = store_config.with_storage_key(key);
    }
    if let Some(max) = loaded.config.max_entries() {
        store_config = store_config.with_max_entries(max);
    }

    let storage = FileStore::new(data_dir.join("state"));
    let store = ContextStore::builder(storage.clone())
        .config(store_config)
        .environment(terminal::TerminalEnvironment::detect())
        .build_shared();

    let scope = ContextScope::new();
    scope.install(Arc::clone(&store))?;

    let ctx = commands::Context {
        scope,
        storage,
        config: loaded,
        data_dir,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    // Dispatch to command handlers
    let result = match cli.command {
        Commands::Record(args) => record::run(args, &ctx).await,
        Commands::Show(args) => show::run(args, &ctx).await,
        Commands::Clear(args) => clear::run(args, &ctx).await,
        Commands::Export(args) => export::run(args, &ctx).await,
        Commands::Replay(args) => replay::run(args, &ctx).await,
        Commands::Status(args) => status::run(args, &ctx).await,
    };

    // Next tick: let deferred work (e.g. the post-clear bootstrap) land before exit
    let ran = store.run_pending();
    if ran > 0 {
        debug!(tasks = ran, "Ran pending follow-up tasks");
    }

    result
}
