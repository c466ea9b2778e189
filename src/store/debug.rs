//! Debug inspection point for the store.
//!
//! In development builds bring-up publishes the store under [`DEBUG_STORE_NAME`]
//! so external inspection tooling can look at the raw container. Nothing in
//! the crate reads it back; it is a diagnostic aid only.

use crate::store::backend::GlobalStoreHandle;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Well-known name the store is exposed under.
pub const DEBUG_STORE_NAME: &str = "DEBUGStore";

/// Named store handles exposed for debug tooling.
///
/// # Example
///
/// ```rust
/// use native_lifecycle::store::{DebugRegistry, DEBUG_STORE_NAME};
///
/// let registry = DebugRegistry::new();
/// assert!(registry.lookup(DEBUG_STORE_NAME).is_none());
/// ```
#[derive(Debug, Default)]
pub struct DebugRegistry {
    entries: Mutex<BTreeMap<String, GlobalStoreHandle>>,
}

impl DebugRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `store` under `name`, replacing any earlier entry.
    pub fn expose(&self, name: &str, store: GlobalStoreHandle) {
        tracing::debug!(name = %name, "exposing store for debug inspection");
        self.lock().insert(name.to_string(), store);
    }

    /// Returns the handle published under `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<GlobalStoreHandle> {
        self.lock().get(name).cloned()
    }

    /// Snapshot of every exposed store, keyed by name.
    #[must_use]
    pub fn snapshot(&self) -> serde_json::Value {
        let entries = self.lock();
        let map = entries
            .iter()
            .map(|(name, store)| (name.clone(), store.debug_snapshot()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, GlobalStoreHandle>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
