//! Export artifacts and their delivery.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::types::SessionState;

/// Filename an export of `session_id` is offered under.
pub fn export_filename(session_id: &str) -> String {
    format!("context-export-{session_id}.json")
}

/// A serialized session ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextExport {
    /// Suggested filename, `context-export-<sessionId>.json`.
    pub filename: String,
    /// Pretty-printed JSON of the full session state.
    pub contents: String,
}

impl ContextExport {
    /// Serialize `state`. Fails rather than producing a partial document.
    pub fn from_state(state: &SessionState) -> Result<Self> {
        let contents = serde_json::to_string_pretty(state)?;
        Ok(Self {
            filename: export_filename(&state.session_id),
            contents,
        })
    }
}

/// Destination for export artifacts.
pub trait ExportSink {
    /// Deliver the artifact, returning where it ended up.
    fn deliver(&self, export: &ContextExport) -> Result<PathBuf>;
}

/// Writes exports as files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&self, export: &ContextExport) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|source| Error::Export {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(&export.filename);
        fs::write(&path, export.contents.as_bytes()).map_err(|source| Error::Export {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), bytes = export.contents.len(), "Context exported");
        Ok(path)
    }
}
