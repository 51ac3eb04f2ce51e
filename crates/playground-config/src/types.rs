//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [context]
//! storage_key = "react-visual-playground-context"
//! max_entries = 5000       # omit for unbounded
//!
//! [storage]
//! data_dir = "~/.local/share/playground"
//!
//! [export]
//! dir = "./exports"
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use crate::{ConfigError, Result};

/// Environment variable overriding the storage data directory.
pub const DATA_DIR_ENV: &str = "PLAYGROUND_DATA_DIR";

/// Application name for platform directory resolution.
pub(crate) const APP_NAME: &str = "playground";

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g., project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    /// Session context store settings.
    pub context: Option<ContextSection>,

    /// Durable storage settings.
    pub storage: Option<StorageSection>,

    /// Export settings.
    pub export: Option<ExportSection>,
}

impl PlaygroundConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: PlaygroundConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Merge another config on top of this one (other takes priority, field by field).
    pub fn merge(&mut self, other: PlaygroundConfig) {
        if let Some(other) = other.context {
            let ctx = self.context.get_or_insert_with(Default::default);
            if other.storage_key.is_some() {
                ctx.storage_key = other.storage_key;
            }
            if other.max_entries.is_some() {
                ctx.max_entries = other.max_entries;
            }
        }

        if let Some(other) = other.storage
            && other.data_dir.is_some()
        {
            self.storage.get_or_insert_with(Default::default).data_dir = other.data_dir;
        }

        if let Some(other) = other.export
            && other.dir.is_some()
        {
            self.export.get_or_insert_with(Default::default).dir = other.dir;
        }
    }

    /// Reject values the store cannot work with.
    pub fn validate(&self) -> Result<()> {
        if let Some(ctx) = &self.context {
            if let Some(key) = &ctx.storage_key
                && key.trim().is_empty()
            {
                return Err(ConfigError::Invalid {
                    field: "context.storage_key".into(),
                    reason: "must not be empty".into(),
                });
            }
            if ctx.max_entries == Some(0) {
                return Err(ConfigError::Invalid {
                    field: "context.max_entries".into(),
                    reason: "must be at least 1 (omit for unbounded)".into(),
                });
            }
        }
        Ok(())
    }

    /// Configured storage key, if any.
    pub fn storage_key(&self) -> Option<&str> {
        self.context.as_ref()?.storage_key.as_deref()
    }

    /// Configured retention cap, if any.
    pub fn max_entries(&self) -> Option<usize> {
        self.context.as_ref()?.max_entries
    }

    /// Effective data directory.
    ///
    /// Resolution order:
    /// 1. `PLAYGROUND_DATA_DIR` environment variable
    /// 2. Configured `storage.data_dir`
    /// 3. Platform data dir (`~/.local/share/playground` on Linux)
    pub fn effective_data_dir(&self) -> PathBuf {
        let env = std::env::var(DATA_DIR_ENV).ok();
        self.resolve_data_dir(env.as_deref())
    }

    pub(crate) fn resolve_data_dir(&self, env_value: Option<&str>) -> PathBuf {
        if let Some(dir) = env_value
            && !dir.is_empty()
        {
            return PathBuf::from(dir);
        }

        if let Some(dir) = self.storage.as_ref().and_then(|s| s.data_dir.as_ref()) {
            return expand_home(dir);
        }

        dirs::data_dir()
            .map(|d| d.join(APP_NAME))
            .unwrap_or_else(|| PathBuf::from(".playground"))
    }

    /// Effective export directory (configured `export.dir`, else the working directory).
    pub fn effective_export_dir(&self) -> PathBuf {
        self.export
            .as_ref()
            .and_then(|e| e.dir.as_ref())
            .map(|d| expand_home(d))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// `[context]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContextSection {
    /// Key of the durable slot holding the session.
    pub storage_key: Option<String>,

    /// Cap on entries per session. Unbounded when absent.
    pub max_entries: Option<usize>,
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Directory holding the durable slot files. `~` expands to the home directory.
    pub data_dir: Option<PathBuf>,
}

/// `[export]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Directory export files are written to.
    pub dir: Option<PathBuf>,
}

fn expand_home(path: &std::path::Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}
