//! Identifier generation and time source.

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

const SUFFIX_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Source of entry and session identifiers.
pub trait IdGenerator: Send + Sync {
    /// A fresh, globally unique entry id.
    fn entry_id(&self) -> String;

    /// A fresh session id. `now_millis` is the session start time.
    fn session_id(&self, now_millis: i64) -> String;
}

/// Default generator: UUID v4 entry ids, `session-<millis>-<suffix>` session ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn entry_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn session_id(&self, now_millis: i64) -> String {
        format!("session-{}-{}", now_millis, random_suffix())
    }
}

fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.random_range(0..SUFFIX_CHARSET.len())] as char)
        .collect()
}

/// Wall-clock source in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// System time via chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
