//! The session context store.
//!
//! One [`ContextStore`] owns one live [`SessionState`]. Every mutation is
//! mirrored to a durable slot through a [`KeyValueStore`]; the slot is read
//! back once when the store is built.
//!
//! Work that must happen "after the current operation" (the bootstrap entry
//! that follows a clear) is queued on the store and runs when the host calls
//! [`ContextStore::run_pending`], the equivalent of the next tick of a
//! single-threaded event loop.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ContextConfig;
use crate::environment::{Environment, StaticEnvironment};
use crate::error::Result;
use crate::export::{ContextExport, ExportSink};
use crate::identity::{Clock, IdGenerator, RandomIds, SystemClock};
use crate::storage::KeyValueStore;
use crate::types::{ContextEntry, EntryData, EntryKind, SessionState};

/// Description of the entry that opens a new session.
pub const SESSION_STARTED: &str = "Session started";

/// Description of the entry that opens a session created by a clear.
pub const SESSION_STARTED_AFTER_CLEAR: &str = "Session started (after clear)";

/// Shared handle to a store. Clones refer to the same session.
pub type ContextHandle = Arc<ContextStore>;

/// Deferred work, run by [`ContextStore::run_pending`].
#[derive(Debug)]
enum FollowUp {
    /// Open the session `session_id` with a `session_info` entry.
    /// Skipped if another clear replaced that session in the meantime.
    Bootstrap { session_id: String, data: EntryData },
}

struct StoreInner {
    state: SessionState,
    pending: VecDeque<FollowUp>,
}

/// Persisted session event log.
pub struct ContextStore {
    inner: Mutex<StoreInner>,
    storage: Box<dyn KeyValueStore>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    environment: Box<dyn Environment>,
    config: ContextConfig,
}

impl std::fmt::Debug for ContextStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("ContextStore");
        if let Some(inner) = self.inner.try_lock() {
            s.field("session_id", &inner.state.session_id)
                .field("entries", &inner.state.entries.len())
                .field("pending", &inner.pending.len());
        }
        s.field("config", &self.config).finish()
    }
}

/// Builder for [`ContextStore`]. Only the storage backend is required.
pub struct ContextStoreBuilder {
    storage: Box<dyn KeyValueStore>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    environment: Box<dyn Environment>,
    config: ContextConfig,
}

impl ContextStoreBuilder {
    pub fn config(mut self, config: ContextConfig) -> Self {
        self.config = config;
        self
    }

    pub fn ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn environment(mut self, environment: impl Environment + 'static) -> Self {
        self.environment = Box::new(environment);
        self
    }

    /// Rehydrate or create the session and return the store.
    ///
    /// Never fails: an unreadable or unparseable slot is logged and replaced
    /// by a fresh session. A session with no entries gets a bootstrap
    /// `session_info` entry before this returns.
    pub fn build(self) -> ContextStore {
        let (state, rehydrated) = match rehydrate(self.storage.as_ref(), &self.config.storage_key)
        {
            Some(state) => (state, true),
            None => {
                let now = self.clock.now_millis();
                (SessionState::new(self.ids.session_id(now), now), false)
            }
        };

        let store = ContextStore {
            inner: Mutex::new(StoreInner {
                state,
                pending: VecDeque::new(),
            }),
            storage: self.storage,
            ids: self.ids,
            clock: self.clock,
            environment: self.environment,
            config: self.config,
        };

        {
            let mut inner = store.inner.lock();
            if inner.state.entries.is_empty() {
                let data = store.bootstrap_data(&inner.state.session_id, true);
                store.append(&mut inner, EntryKind::SessionInfo, SESSION_STARTED, data);
            }

            info!(
                session_id = %inner.state.session_id,
                rehydrated,
                entries = inner.state.entries.len(),
                "Context store initialized"
            );
        }

        store
    }

    /// Build and wrap in a shared handle.
    pub fn build_shared(self) -> ContextHandle {
        Arc::new(self.build())
    }
}

fn rehydrate(storage: &dyn KeyValueStore, key: &str) -> Option<SessionState> {
    match storage.get(key) {
        Ok(Some(raw)) => match serde_json::from_str::<SessionState>(&raw) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to parse stored context, starting fresh session");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to read stored context, starting fresh session");
            None
        }
    }
}

impl ContextStore {
    /// Start building a store over `storage`.
    pub fn builder(storage: impl KeyValueStore + 'static) -> ContextStoreBuilder {
        ContextStoreBuilder {
            storage: Box::new(storage),
            ids: Box::new(RandomIds),
            clock: Box::new(SystemClock),
            environment: Box::new(StaticEnvironment::default()),
            config: ContextConfig::default(),
        }
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Append an entry and persist the session.
    ///
    /// The entry is visible to every reader as soon as this returns.
    /// Persistence failures are logged, never returned.
    pub fn add_entry(
        &self,
        kind: EntryKind,
        description: impl Into<String>,
        data: EntryData,
    ) -> ContextEntry {
        let mut inner = self.inner.lock();
        self.append(&mut inner, kind, description.into(), data)
    }

    /// Replace the session with a new, empty one and remove the durable slot.
    ///
    /// The new session's bootstrap entry is queued, not appended: it lands on
    /// the next [`run_pending`](Self::run_pending). Until then the session has
    /// no entries.
    pub fn clear_context(&self) {
        let mut inner = self.inner.lock();

        let now = self
            .clock
            .now_millis()
            .max(inner.state.session_start_time);
        let previous = std::mem::replace(
            &mut inner.state,
            SessionState::new(self.ids.session_id(now), now),
        );

        if let Err(e) = self.storage.remove(&self.config.storage_key) {
            warn!(key = %self.config.storage_key, error = %e, "Failed to remove stored context");
        }

        let session_id = inner.state.session_id.clone();
        let data = self.bootstrap_data(&session_id, false);
        inner
            .pending
            .push_back(FollowUp::Bootstrap { session_id, data });

        info!(
            previous_session = %previous.session_id,
            session_id = %inner.state.session_id,
            dropped_entries = previous.entries.len(),
            "Context cleared"
        );
    }

    /// Run queued follow-up work in FIFO order. Returns the number of tasks run.
    pub fn run_pending(&self) -> usize {
        let mut inner = self.inner.lock();
        let mut ran = 0;
        while let Some(task) = inner.pending.pop_front() {
            ran += 1;
            match task {
                FollowUp::Bootstrap { session_id, data } => {
                    if inner.state.session_id != session_id {
                        debug!(session_id = %session_id, "Skipping bootstrap for replaced session");
                        continue;
                    }
                    self.append(
                        &mut inner,
                        EntryKind::SessionInfo,
                        SESSION_STARTED_AFTER_CLEAR,
                        data,
                    );
                }
            }
        }
        ran
    }

    /// Number of queued follow-up tasks.
    pub fn pending_tasks(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// Serialize the session for download.
    pub fn export_context(&self) -> Result<ContextExport> {
        let inner = self.inner.lock();
        ContextExport::from_state(&inner.state)
    }

    /// Serialize the session and deliver it through `sink`.
    pub fn export_to(&self, sink: &dyn ExportSink) -> Result<PathBuf> {
        let export = self.export_context()?;
        sink.deliver(&export)
    }

    /// An immutable copy of the current session.
    pub fn snapshot(&self) -> SessionState {
        self.inner.lock().state.clone()
    }

    pub fn session_id(&self) -> String {
        self.inner.lock().state.session_id.clone()
    }

    pub fn session_start_time(&self) -> i64 {
        self.inner.lock().state.session_start_time
    }

    pub fn len(&self) -> usize {
        self.inner.lock().state.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().state.entries.is_empty()
    }

    fn append(
        &self,
        inner: &mut StoreInner,
        kind: EntryKind,
        description: impl Into<String>,
        data: EntryData,
    ) -> ContextEntry {
        let state = &mut inner.state;
        let floor = state
            .last_timestamp()
            .unwrap_or(state.session_start_time);
        let entry = ContextEntry {
            id: self.ids.entry_id(),
            timestamp: self.clock.now_millis().max(floor),
            kind,
            description: description.into(),
            data,
        };
        state.entries.push(entry.clone());

        if let Some(cap) = self.config.max_entries {
            let cap = cap.max(1);
            if state.entries.len() > cap {
                let excess = state.entries.len() - cap;
                state.entries.drain(..excess);
                debug!(dropped = excess, cap, "Dropped oldest context entries");
            }
        }

        debug!(
            session_id = %state.session_id,
            kind = %entry.kind,
            entries = state.entries.len(),
            "Context entry added"
        );

        self.persist(state);
        entry
    }

    fn persist(&self, state: &SessionState) {
        let key = &self.config.storage_key;
        let raw = match serde_json::to_string(state) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize context, not persisted");
                return;
            }
        };
        if let Err(e) = self.storage.set(key, &raw) {
            warn!(key = %key, error = %e, "Failed to persist context");
        }
    }

    fn bootstrap_data(&self, session_id: &str, with_resolution: bool) -> EntryData {
        let mut data = EntryData::new();
        data.insert("sessionId".into(), Value::String(session_id.to_string()));
        data.insert(
            "userAgent".into(),
            Value::String(self.environment.user_agent()),
        );
        if with_resolution {
            if let Some(resolution) = self.environment.screen_resolution() {
                data.insert("screenResolution".into(), Value::String(resolution));
            }
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

    const KEY: &str = crate::config::DEFAULT_STORAGE_KEY;

    /// Clock that advances by one millisecond per reading.
    #[derive(Clone)]
    struct StepClock(Arc<AtomicI64>);

    impl StepClock {
        fn starting_at(ms: i64) -> Self {
            Self(Arc::new(AtomicI64::new(ms)))
        }
        fn set(&self, ms: i64) {
            self.0.store(ms, Ordering::SeqCst);
        }
    }

    impl Clock for StepClock {
        fn now_millis(&self) -> i64 {
            self.0.fetch_add(1, Ordering::SeqCst)
        }
    }

    /// Predictable ids: `e-1`, `e-2`, ... and `session-<n>`.
    #[derive(Default)]
    struct SequentialIds(AtomicU64);

    impl IdGenerator for SequentialIds {
        fn entry_id(&self) -> String {
            format!("e-{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
        }
        fn session_id(&self, _now: i64) -> String {
            format!("session-{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    /// Backend whose writes always fail.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("quota exceeded".into()))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(Error::Storage("quota exceeded".into()))
        }
    }

    fn test_env() -> StaticEnvironment {
        StaticEnvironment::new("test-agent/1.0").with_resolution(1280, 720)
    }

    fn new_store(backend: &MemoryStore) -> ContextStore {
        ContextStore::builder(backend.clone())
            .environment(test_env())
            .build()
    }

    fn data(value: Value) -> EntryData {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn stored_state(backend: &MemoryStore) -> Option<SessionState> {
        backend
            .get(KEY)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    #[test]
    fn test_fresh_store_bootstraps_once() {
        let backend = MemoryStore::new();
        let store = new_store(&backend);

        let state = store.snapshot();
        assert_eq!(state.entries.len(), 1);
        let entry = &state.entries[0];
        assert_eq!(entry.kind, EntryKind::SessionInfo);
        assert_eq!(entry.description, SESSION_STARTED);
        assert_eq!(entry.data["sessionId"], json!(state.session_id));
        assert_eq!(entry.data["userAgent"], json!("test-agent/1.0"));
        assert_eq!(entry.data["screenResolution"], json!("1280x720"));

        // The bootstrap write reached the slot.
        assert_eq!(stored_state(&backend), Some(state));
    }

    #[test]
    fn test_rehydrates_existing_session_without_bootstrap() {
        let backend = MemoryStore::new();
        let first = new_store(&backend);
        first.add_entry(EntryKind::Interaction, "click", data(json!({"x": 1})));
        let before = first.snapshot();
        drop(first);

        let second = new_store(&backend);
        assert_eq!(second.snapshot(), before);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_float_payloads_survive_rehydrate() {
        let backend = MemoryStore::new();
        let first = new_store(&backend);
        for v in [1.0715660391465826e-75, -1.81996730402717e-179, -1.603964615428183e143] {
            first.add_entry(EntryKind::StateChange, "slider", data(json!({"v": v})));
        }
        let before = first.snapshot();
        drop(first);

        let second = new_store(&backend);
        assert_eq!(second.snapshot(), before);
        assert_eq!(second.snapshot().entries[1].data["v"], json!(1.0715660391465826e-75));
    }

    #[test]
    fn test_rehydrated_empty_session_gets_bootstrap() {
        let stored = SessionState::new("session-kept", 5);
        let backend = MemoryStore::with_value(KEY, serde_json::to_string(&stored).unwrap());

        let store = new_store(&backend);
        let state = store.snapshot();
        assert_eq!(state.session_id, "session-kept");
        assert_eq!(state.session_start_time, 5);
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.entries[0].kind, EntryKind::SessionInfo);
    }

    #[test]
    fn test_corrupt_slot_recovers_to_fresh_session() {
        let backend = MemoryStore::with_value(KEY, "{not json");
        let store = new_store(&backend);

        let state = store.snapshot();
        assert!(state.session_id.starts_with("session-"));
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.entries[0].kind, EntryKind::SessionInfo);
        // The corrupt value was overwritten by the bootstrap write.
        assert_eq!(stored_state(&backend), Some(state));
    }

    #[test]
    fn test_append_preserves_call_order() {
        let backend = MemoryStore::new();
        let store = new_store(&backend);
        let kinds = [
            EntryKind::StateChange,
            EntryKind::Interaction,
            EntryKind::SessionInfo,
            EntryKind::Interaction,
        ];
        for (i, kind) in kinds.iter().enumerate() {
            store.add_entry(*kind, format!("event {i}"), data(json!({"i": i})));
        }

        let state = store.snapshot();
        let descriptions: Vec<_> = state.entries[1..]
            .iter()
            .map(|e| e.description.as_str())
            .collect();
        assert_eq!(descriptions, ["event 0", "event 1", "event 2", "event 3"]);
        let recorded: Vec<_> = state.entries[1..].iter().map(|e| e.kind).collect();
        assert_eq!(recorded, kinds);
    }

    #[test]
    fn test_add_entry_returns_and_persists_entry() {
        let backend = MemoryStore::new();
        let store = new_store(&backend);

        let entry = store.add_entry(EntryKind::Interaction, "click", data(json!({"x": 1})));
        assert_eq!(entry.kind, EntryKind::Interaction);
        assert_eq!(entry.data, data(json!({"x": 1})));

        let persisted = stored_state(&backend).unwrap();
        assert_eq!(persisted.entries.last(), Some(&entry));
    }

    #[test]
    fn test_entry_ids_unique_under_load() {
        let store = new_store(&MemoryStore::new());
        for i in 0..1_000 {
            store.add_entry(EntryKind::Interaction, "tick", data(json!({"i": i})));
        }

        let state = store.snapshot();
        let ids: HashSet<_> = state.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), 1_001);
    }

    #[test]
    fn test_timestamps_never_decrease() {
        let clock = StepClock::starting_at(10_000);
        let store = ContextStore::builder(MemoryStore::new())
            .clock(clock.clone())
            .environment(test_env())
            .build();

        store.add_entry(EntryKind::Interaction, "a", EntryData::new());
        // Wall clock jumps backwards.
        clock.set(1_000);
        store.add_entry(EntryKind::Interaction, "b", EntryData::new());

        let state = store.snapshot();
        let stamps: Vec<_> = state.entries.iter().map(|e| e.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]), "{stamps:?}");
        assert!(stamps[0] >= state.session_start_time);
    }

    #[test]
    fn test_clear_resets_identity_and_defers_bootstrap() {
        let backend = MemoryStore::new();
        let store = new_store(&backend);
        store.add_entry(EntryKind::Interaction, "click", EntryData::new());
        let before = store.snapshot();

        store.clear_context();

        assert_ne!(store.session_id(), before.session_id);
        assert!(store.session_start_time() >= before.session_start_time);
        assert!(store.is_empty());
        assert_eq!(store.pending_tasks(), 1);
        assert!(!backend.contains(KEY));

        assert_eq!(store.run_pending(), 1);

        let after = store.snapshot();
        assert_eq!(after.entries.len(), 1);
        let entry = &after.entries[0];
        assert_eq!(entry.kind, EntryKind::SessionInfo);
        assert_eq!(entry.description, SESSION_STARTED_AFTER_CLEAR);
        assert_eq!(entry.data["sessionId"], json!(after.session_id));
        assert!(!entry.data.contains_key("screenResolution"));
        assert_eq!(stored_state(&backend), Some(after));
        assert_eq!(store.pending_tasks(), 0);
    }

    #[test]
    fn test_clear_start_time_not_before_previous() {
        let clock = StepClock::starting_at(50_000);
        let store = ContextStore::builder(MemoryStore::new())
            .clock(clock.clone())
            .build();
        let before = store.session_start_time();

        clock.set(10);
        store.clear_context();
        assert!(store.session_start_time() >= before);
    }

    #[test]
    fn test_double_clear_yields_single_bootstrap() {
        let store = new_store(&MemoryStore::new());
        store.clear_context();
        store.clear_context();

        assert_eq!(store.pending_tasks(), 2);
        assert_eq!(store.run_pending(), 2);

        let state = store.snapshot();
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.entries[0].data["sessionId"], json!(state.session_id));
    }

    #[test]
    fn test_entries_added_before_pending_run_stay_in_order() {
        let store = new_store(&MemoryStore::new());
        store.clear_context();
        store.add_entry(EntryKind::Interaction, "early click", EntryData::new());
        store.run_pending();

        let state = store.snapshot();
        let descriptions: Vec<_> = state.entries.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descriptions, ["early click", SESSION_STARTED_AFTER_CLEAR]);
    }

    #[test]
    fn test_persistence_failure_does_not_block_mutation() {
        let store = ContextStore::builder(ReadOnlyStore(MemoryStore::new()))
            .environment(test_env())
            .build();
        assert_eq!(store.len(), 1);

        store.add_entry(EntryKind::StateChange, "toggle", EntryData::new());
        assert_eq!(store.len(), 2);

        store.clear_context();
        store.run_pending();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_export_uses_session_id() {
        let store = ContextStore::builder(MemoryStore::new())
            .ids(SequentialIds::default())
            .build();
        let export = store.export_context().unwrap();

        assert_eq!(export.filename, "context-export-session-1.json");
        let parsed: SessionState = serde_json::from_str(&export.contents).unwrap();
        assert_eq!(parsed, store.snapshot());
    }

    #[test]
    fn test_export_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = new_store(&MemoryStore::new());
        let path = store
            .export_to(&crate::export::DirectorySink::new(dir.path()))
            .unwrap();

        let expected = format!("context-export-{}.json", store.session_id());
        assert_eq!(path.file_name().unwrap().to_string_lossy(), expected);
    }

    #[test]
    fn test_retention_cap_drops_oldest() {
        let store = ContextStore::builder(MemoryStore::new())
            .config(ContextConfig::new().with_max_entries(3))
            .build();
        for i in 0..5 {
            store.add_entry(EntryKind::Interaction, format!("e{i}"), EntryData::new());
        }

        let state = store.snapshot();
        let descriptions: Vec<_> = state.entries.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descriptions, ["e2", "e3", "e4"]);
    }

    #[test]
    fn test_custom_storage_key() {
        let backend = MemoryStore::new();
        let _store = ContextStore::builder(backend.clone())
            .config(ContextConfig::new().with_storage_key("demo-context"))
            .build();

        assert!(backend.contains("demo-context"));
        assert!(!backend.contains(KEY));
    }

    #[test]
    fn test_shared_handle_sees_all_writers() {
        let handle = ContextStore::builder(MemoryStore::new()).build_shared();
        let button = Arc::clone(&handle);
        let slider = Arc::clone(&handle);

        button.add_entry(EntryKind::Interaction, "button", EntryData::new());
        slider.add_entry(EntryKind::StateChange, "slider", EntryData::new());

        let state = handle.snapshot();
        assert_eq!(state.entries.len(), 3);
        assert_eq!(state.entries[1].description, "button");
        assert_eq!(state.entries[2].description, "slider");
    }

    #[test]
    fn test_end_to_end_scenario() {
        let backend = MemoryStore::new();
        let store = new_store(&backend);
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot().entries[0].kind, EntryKind::SessionInfo);

        store.add_entry(EntryKind::Interaction, "click", data(json!({"x": 1})));
        let state = store.snapshot();
        assert_eq!(state.entries.len(), 2);
        assert_eq!(state.entries[1].kind, EntryKind::Interaction);
        assert_eq!(state.entries[1].data, data(json!({"x": 1})));

        let old_id = state.session_id;
        store.clear_context();
        assert_ne!(store.session_id(), old_id);
        store.run_pending();
        assert_eq!(store.len(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::storage::MemoryStore;
    use proptest::prelude::*;

    fn kind_strategy() -> impl Strategy<Value = EntryKind> {
        prop_oneof![
            Just(EntryKind::Interaction),
            Just(EntryKind::StateChange),
            Just(EntryKind::SessionInfo),
        ]
    }

    fn event_strategy() -> impl Strategy<Value = (EntryKind, String, i64)> {
        (kind_strategy(), "[a-zA-Z0-9 ]{0,20}", any::<i64>())
    }

    fn finite_f64() -> impl Strategy<Value = f64> {
        any::<f64>().prop_filter("finite", |v| v.is_finite())
    }

    proptest! {
        /// Property: entries come back in the order they were added, whatever their kind.
        #[test]
        fn append_order_preserved(events in prop::collection::vec(event_strategy(), 0..40)) {
            let store = ContextStore::builder(MemoryStore::new()).build();
            for (kind, description, n) in &events {
                let mut data = EntryData::new();
                data.insert("n".into(), serde_json::json!(n));
                store.add_entry(*kind, description.clone(), data);
            }

            let state = store.snapshot();
            prop_assert_eq!(state.entries.len(), events.len() + 1);
            for (entry, (kind, description, n)) in state.entries[1..].iter().zip(&events) {
                prop_assert_eq!(entry.kind, *kind);
                prop_assert_eq!(&entry.description, description);
                prop_assert_eq!(&entry.data["n"], &serde_json::json!(n));
            }
        }

        /// Property: the persisted form of any reachable state parses back to the same state.
        #[test]
        fn persisted_state_round_trips(
            events in prop::collection::vec((event_strategy(), finite_f64()), 0..20),
            clear_at in prop::option::of(0usize..20),
        ) {
            let backend = MemoryStore::new();
            let store = ContextStore::builder(backend.clone()).build();
            for (i, ((kind, description, n), f)) in events.iter().enumerate() {
                if clear_at == Some(i) {
                    store.clear_context();
                    store.run_pending();
                }
                let mut data = EntryData::new();
                data.insert("n".into(), serde_json::json!(n));
                data.insert("f".into(), serde_json::json!(f));
                data.insert("nested".into(), serde_json::json!({"list": [n, description]}));
                store.add_entry(*kind, description.clone(), data);
            }

            let state = store.snapshot();
            let raw = serde_json::to_string(&state).unwrap();
            let parsed: SessionState = serde_json::from_str(&raw).unwrap();
            prop_assert_eq!(&parsed, &state);

            let rehydrated = ContextStore::builder(backend).build();
            prop_assert_eq!(rehydrated.snapshot(), state);
        }
    }
}
