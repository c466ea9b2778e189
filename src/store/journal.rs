//! In-memory journal store.
//!
//! A reference [`AppStore`] that records every dispatched action. Actions that
//! arrive before the background processors start are held back and drained, in
//! dispatch order, the moment [`AppStore::run_background_tasks`] runs. After
//! that, actions reach the processors (the optional sink) immediately.
//!
//! # Snapshot Format
//!
//! ```json
//! {
//!   "running": true,
//!   "pending": [],
//!   "processed": [{"type": "config:installerRan"}]
//! }
//! ```

use crate::app::Action;
use crate::store::backend::AppStore;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Callback run for each processed action.
pub type ActionSink = Box<dyn Fn(&Action) + Send + Sync>;

#[derive(Debug, Default)]
struct Journal {
    running: bool,
    pending: Vec<Action>,
    processed: Vec<Action>,
}

/// Store that journals actions and hands them to an optional sink.
///
/// # Thread Safety
///
/// The journal is mutex-guarded. The sink is always invoked with the lock
/// released, so it may dispatch back into the store.
///
/// # Example
///
/// ```rust
/// use native_lifecycle::app::Action;
/// use native_lifecycle::store::{AppStore, JournalStore};
///
/// let store = JournalStore::new();
/// store.dispatch(Action::installer_ran());
/// assert_eq!(store.pending().len(), 1);
///
/// store.run_background_tasks();
/// assert_eq!(store.processed(), vec![Action::installer_ran()]);
/// ```
#[derive(Default)]
pub struct JournalStore {
    journal: Mutex<Journal>,
    sink: Option<ActionSink>,
}

impl JournalStore {
    /// Creates an empty journal with no sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a sink that observes every processed action.
    #[must_use]
    pub fn with_sink<F>(mut self, sink: F) -> Self
    where
        F: Fn(&Action) + Send + Sync + 'static,
    {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Whether the background processors have been started.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Actions waiting for the processors to start.
    #[must_use]
    pub fn pending(&self) -> Vec<Action> {
        self.lock().pending.clone()
    }

    /// Actions handed to the processors so far, in order.
    #[must_use]
    pub fn processed(&self) -> Vec<Action> {
        self.lock().processed.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Journal> {
        self.journal.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn deliver(&self, actions: &[Action]) {
        if let Some(sink) = &self.sink {
            for action in actions {
                sink(action);
            }
        }
    }
}

impl AppStore for JournalStore {
    fn dispatch(&self, action: Action) {
        {
            let mut journal = self.lock();
            if !journal.running {
                tracing::debug!(action = action.type_name(), "queued before processors started");
                journal.pending.push(action);
                return;
            }
            journal.processed.push(action.clone());
        }
        self.deliver(std::slice::from_ref(&action));
    }

    fn run_background_tasks(&self) {
        let drained = {
            let mut journal = self.lock();
            if journal.running {
                tracing::debug!("background tasks already running");
                return;
            }
            journal.running = true;
            let drained = std::mem::take(&mut journal.pending);
            journal.processed.extend(drained.iter().cloned());
            drained
        };
        tracing::debug!(drained = drained.len(), "background tasks started");
        self.deliver(&drained);
    }

    fn debug_snapshot(&self) -> serde_json::Value {
        let journal = self.lock();
        serde_json::json!({
            "running": journal.running,
            "pending": journal.pending,
            "processed": journal.processed,
        })
    }
}

impl std::fmt::Debug for JournalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournalStore")
            .field("journal", &self.journal)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AppStatus;
    use std::sync::{Arc, Mutex};

    #[test]
    fn holds_actions_until_processors_start() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let store = JournalStore::new().with_sink(move |a| sink_seen.lock().unwrap().push(a.clone()));

        store.dispatch(Action::set_system_dark_mode(true));
        store.dispatch(Action::installer_ran());
        assert!(seen.lock().unwrap().is_empty());
        assert!(!store.is_running());

        store.run_background_tasks();
        store.dispatch(Action::mobile_app_state_changed(AppStatus::Active));

        let expected = vec![
            Action::set_system_dark_mode(true),
            Action::installer_ran(),
            Action::mobile_app_state_changed(AppStatus::Active),
        ];
        assert_eq!(*seen.lock().unwrap(), expected);
        assert_eq!(store.processed(), expected);
        assert!(store.pending().is_empty());
    }

    #[test]
    fn starting_twice_is_harmless() {
        let count = Arc::new(Mutex::new(0));
        let sink_count = Arc::clone(&count);
        let store = JournalStore::new().with_sink(move |_| *sink_count.lock().unwrap() += 1);

        store.dispatch(Action::installer_ran());
        store.run_background_tasks();
        store.run_background_tasks();

        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(store.processed().len(), 1);
    }

    #[test]
    fn snapshot_reflects_journal() {
        let store = JournalStore::new();
        store.dispatch(Action::link_received("x://y"));

        let snapshot = store.debug_snapshot();
        assert_eq!(snapshot["running"], false);
        assert_eq!(snapshot["pending"][0]["type"], "deeplinks:link");
        assert_eq!(snapshot["processed"].as_array().map(Vec::len), Some(0));
    }
}
