//! Explicit provider for the shared store.
//!
//! A host installs one [`ContextHandle`] into a [`ContextScope`] at startup
//! and passes the scope to whatever needs to record events. Reaching for the
//! store before it has been installed is an integration bug, so
//! [`ContextScope::current`] panics instead of handing back a default.

use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::store::ContextHandle;

#[derive(Debug, Default)]
pub struct ContextScope {
    slot: OnceLock<ContextHandle>,
}

impl ContextScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the store for this scope. A scope holds at most one store.
    pub fn install(&self, handle: ContextHandle) -> Result<()> {
        self.slot.set(handle).map_err(|_| Error::AlreadyInstalled)
    }

    /// The installed store, or [`Error::Uninitialized`].
    pub fn try_current(&self) -> Result<&ContextHandle> {
        self.slot.get().ok_or(Error::Uninitialized)
    }

    /// The installed store.
    ///
    /// # Panics
    ///
    /// Panics if no store has been installed.
    pub fn current(&self) -> &ContextHandle {
        match self.slot.get() {
            Some(handle) => handle,
            None => panic!("context store used outside an installed ContextScope"),
        }
    }
}
