//! Engine that holds its outgoing actions until the store is ready.
//!
//! Anything the engine wants to dispatch before `sagas_are_ready` (server push
//! arriving during startup, say) is buffered and flushed in order when the
//! signal arrives. After that, actions dispatch straight through.

use crate::app::Action;
use crate::engine::Engine;
use crate::store::Dispatcher;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Gate {
    ready: bool,
    buffered: Vec<Action>,
}

/// Engine whose dispatches are gated on the readiness signal.
///
/// # Example
///
/// ```rust
/// use native_lifecycle::app::Action;
/// use native_lifecycle::engine::{Engine, GatedEngine};
/// use native_lifecycle::store::GlobalStoreHandle;
///
/// # fn run(store: GlobalStoreHandle) {
/// let engine = GatedEngine::new(store.dispatcher());
/// engine.emit(Action::link_received("x://y")); // buffered
/// engine.sagas_are_ready(); // flushed
/// # }
/// ```
#[derive(Debug)]
pub struct GatedEngine {
    dispatcher: Dispatcher,
    gate: Mutex<Gate>,
}

impl GatedEngine {
    /// Creates an engine bound to `dispatcher`, not yet ready.
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            gate: Mutex::new(Gate::default()),
        }
    }

    /// Dispatches `action`, or buffers it if readiness has not been signaled.
    pub fn emit(&self, action: Action) {
        {
            let mut gate = self.lock();
            if !gate.ready {
                tracing::debug!(action = action.type_name(), "engine buffering until ready");
                gate.buffered.push(action);
                return;
            }
        }
        self.dispatcher.dispatch(action);
    }

    /// Whether `sagas_are_ready` has been called.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.lock().ready
    }

    fn lock(&self) -> MutexGuard<'_, Gate> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Engine for GatedEngine {
    fn sagas_are_ready(&self) {
        let buffered = {
            let mut gate = self.lock();
            if gate.ready {
                tracing::debug!("engine readiness already signaled");
                return;
            }
            gate.ready = true;
            std::mem::take(&mut gate.buffered)
        };
        tracing::debug!(flushed = buffered.len(), "engine ready");
        for action in buffered {
            self.dispatcher.dispatch(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AppStatus;
    use crate::store::{AppStore, GlobalStoreHandle, JournalStore};
    use std::sync::Arc;

    fn running_store() -> (Arc<JournalStore>, GlobalStoreHandle) {
        let store = Arc::new(JournalStore::new());
        store.run_background_tasks();
        let handle = GlobalStoreHandle::new(Arc::clone(&store) as Arc<dyn AppStore>);
        (store, handle)
    }

    #[test]
    fn buffers_until_ready_then_flushes_in_order() {
        let (store, handle) = running_store();
        let engine = GatedEngine::new(handle.dispatcher());

        engine.emit(Action::link_received("a://1"));
        engine.emit(Action::link_received("a://2"));
        assert!(store.processed().is_empty());

        engine.sagas_are_ready();
        engine.emit(Action::mobile_app_state_changed(AppStatus::Active));

        assert_eq!(
            store.processed(),
            vec![
                Action::link_received("a://1"),
                Action::link_received("a://2"),
                Action::mobile_app_state_changed(AppStatus::Active),
            ]
        );
    }

    #[test]
    fn readiness_is_signaled_once() {
        let (store, handle) = running_store();
        let engine = GatedEngine::new(handle.dispatcher());
        engine.emit(Action::installer_ran());

        engine.sagas_are_ready();
        engine.sagas_are_ready();

        assert!(engine.is_ready());
        assert_eq!(store.processed(), vec![Action::installer_ran()]);
    }
}
