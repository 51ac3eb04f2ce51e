//! CLI command handlers.

use std::path::PathBuf;

use anyhow::{Result, bail};
use playground_config::LoadedConfig;
use playground_context::{ContextHandle, ContextScope, EntryData, FileStore};
use serde_json::Value;

pub mod clear;
pub mod export;
pub mod record;
pub mod replay;
pub mod show;
pub mod status;

/// Shared context for all commands.
#[derive(Debug)]
pub struct Context {
    /// Holds the session store for this invocation.
    pub scope: ContextScope,
    /// Backend the store persists to.
    pub storage: FileStore,
    /// Merged configuration and where it came from.
    pub config: LoadedConfig,
    /// Root of state and logs.
    pub data_dir: PathBuf,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// The session store installed for this invocation.
    pub fn store(&self) -> &ContextHandle {
        self.scope.current()
    }
}

/// Build an entry payload from an optional JSON object and `key=value` fields.
///
/// Field values are parsed as JSON when they parse, else taken as strings.
pub(crate) fn parse_data(json: Option<&str>, fields: &[String]) -> Result<EntryData> {
    let mut data = match json {
        Some(raw) => match serde_json::from_str::<Value>(raw)? {
            Value::Object(map) => map,
            other => bail!("--data must be a JSON object, got: {other}"),
        },
        None => EntryData::new(),
    };

    for field in fields {
        let Some((key, value)) = field.split_once('=') else {
            bail!("invalid field '{field}', expected key=value");
        };
        if key.is_empty() {
            bail!("invalid field '{field}', key is empty");
        }
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        data.insert(key.to_string(), value);
    }

    Ok(data)
}
