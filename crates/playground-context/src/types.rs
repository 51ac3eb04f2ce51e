//! Session and entry types.
//!
//! The JSON shape of these types is the persisted format and the export
//! format, so field names are fixed: `sessionId`, `sessionStartTime`,
//! `entries[].type`, and so on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form payload attached to an entry.
pub type EntryData = Map<String, Value>;

/// Category of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A user interaction (click, hover, input).
    Interaction,
    /// A change of component state.
    StateChange,
    /// Session lifecycle information.
    SessionInfo,
}

impl EntryKind {
    /// All kinds, in display order.
    pub const ALL: [EntryKind; 3] = [
        EntryKind::Interaction,
        EntryKind::StateChange,
        EntryKind::SessionInfo,
    ];

    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Interaction => "interaction",
            EntryKind::StateChange => "state_change",
            EntryKind::SessionInfo => "session_info",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interaction" => Ok(EntryKind::Interaction),
            "state_change" => Ok(EntryKind::StateChange),
            "session_info" => Ok(EntryKind::SessionInfo),
            other => Err(format!(
                "unknown entry type '{other}' (expected interaction, state_change or session_info)"
            )),
        }
    }
}

/// A single recorded event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub description: String,
    #[serde(default)]
    pub data: EntryData,
}

/// The live session: identity plus the ordered entry log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub entries: Vec<ContextEntry>,
    pub session_id: String,
    /// Milliseconds since the Unix epoch.
    pub session_start_time: i64,
}

impl SessionState {
    /// A session with no entries.
    pub fn new(session_id: impl Into<String>, session_start_time: i64) -> Self {
        Self {
            entries: Vec::new(),
            session_id: session_id.into(),
            session_start_time,
        }
    }

    /// Number of entries of the given kind.
    pub fn count_of(&self, kind: EntryKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Timestamp of the most recent entry, if any.
    pub fn last_timestamp(&self) -> Option<i64> {
        self.entries.last().map(|e| e.timestamp)
    }
}
