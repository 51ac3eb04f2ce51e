//! Configuration for the context store.

/// Storage key the store persists its state under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "react-visual-playground-context";

/// Configuration for the context store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    /// Key of the durable slot holding the serialized session.
    pub storage_key: String,

    /// Optional cap on the number of entries kept per session.
    /// When the cap is exceeded the oldest entries are dropped.
    pub max_entries: Option<usize>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            max_entries: None,
        }
    }
}

impl ContextConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the durable slot key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Cap the number of entries kept per session.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }
}
