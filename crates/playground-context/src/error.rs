//! Error types for context store operations.

use std::path::PathBuf;

/// Error type for context store operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The key-value backend failed to read, write or remove a slot.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A storage key cannot be mapped onto the backend.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Session state could not be converted to or from JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An export artifact could not be delivered.
    #[error("Failed to write export '{path}': {source}")]
    Export {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The store was accessed through a scope that has no store installed.
    #[error("Context store accessed before it was installed")]
    Uninitialized,

    /// A scope already holds a store.
    #[error("Context store already installed in this scope")]
    AlreadyInstalled,
}

/// Result type for context store operations.
pub type Result<T> = std::result::Result<T, Error>;
