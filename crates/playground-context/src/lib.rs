//! Persisted session event log for the visual playground.
//!
//! This crate provides the session context store:
//! - Append-only event log with session identity
//! - Durable mirror of the session through a pluggable key-value backend
//! - Clear (start a new session) and JSON export
//!
//! # Example
//!
//! ```rust,ignore
//! use playground_context::{ContextStore, EntryKind, FileStore};
//!
//! let store = ContextStore::builder(FileStore::new("/tmp/playground")).build_shared();
//! store.add_entry(EntryKind::Interaction, "click", Default::default());
//!
//! store.clear_context();
//! store.run_pending();
//! ```

mod config;
mod environment;
mod error;
mod export;
mod identity;
mod scope;
mod storage;
mod store;
mod summary;
mod types;

pub use config::{ContextConfig, DEFAULT_STORAGE_KEY};
pub use environment::{Environment, StaticEnvironment};
pub use error::{Error, Result};
pub use export::{ContextExport, DirectorySink, ExportSink, export_filename};
pub use identity::{Clock, IdGenerator, RandomIds, SystemClock};
pub use scope::ContextScope;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{
    ContextHandle, ContextStore, ContextStoreBuilder, SESSION_STARTED,
    SESSION_STARTED_AFTER_CLEAR,
};
pub use summary::{ContextSummary, format_duration, format_timestamp};
pub use types::{ContextEntry, EntryData, EntryKind, SessionState};
