//! Read-only session summaries for display.

use chrono::{Local, TimeZone};

use crate::types::{EntryKind, SessionState};

/// Aggregate view of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSummary {
    pub session_id: String,
    pub session_start_time: i64,
    pub total_entries: usize,
    /// Entry counts in [`EntryKind::ALL`] order.
    pub counts: Vec<(EntryKind, usize)>,
    /// Human-readable time since the session started.
    pub duration: String,
}

impl ContextSummary {
    /// Summarize `state` as of `now_millis`.
    pub fn from_state(state: &SessionState, now_millis: i64) -> Self {
        Self {
            session_id: state.session_id.clone(),
            session_start_time: state.session_start_time,
            total_entries: state.entries.len(),
            counts: EntryKind::ALL
                .iter()
                .map(|kind| (*kind, state.count_of(*kind)))
                .collect(),
            duration: format_duration(state.session_start_time, now_millis),
        }
    }
}

/// Format the span between two epoch-millisecond instants.
///
/// `1h 5m`, `3m 12s` or `42s`; spans that go backwards read `0s`.
pub fn format_duration(start_millis: i64, end_millis: i64) -> String {
    let seconds = end_millis.saturating_sub(start_millis).max(0) / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{seconds}s")
    }
}

/// Format an epoch-millisecond timestamp in local time.
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => millis.to_string(),
    }
}
