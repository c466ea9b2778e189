//! Store abstraction consumed by bring-up.
//!
//! This module defines the [`AppStore`] trait behind which the real state
//! container lives, and the handles the rest of the crate passes around. The
//! trait is deliberately minimal: bring-up only needs to dispatch, start the
//! background task processors, and expose a debug view.

use crate::app::Action;
use crate::domain::error::Result;
use std::fmt;
use std::sync::Arc;

/// A state container with a synchronous dispatch queue.
///
/// Implementations must tolerate `dispatch` before `run_background_tasks`:
/// bring-up never dispatches earlier, but nothing prevents a collaborator from
/// doing so.
///
/// # Implementations
///
/// - [`JournalStore`](crate::store::JournalStore): in-memory journal with an optional sink
pub trait AppStore: Send + Sync {
    /// Enqueues an action. Must not block.
    fn dispatch(&self, action: Action);

    /// Starts the long-lived processors that react to dispatched actions.
    ///
    /// Bring-up calls this exactly once.
    fn run_background_tasks(&self);

    /// Returns a JSON view of the raw container for debug tooling.
    ///
    /// Has no functional effect and is only reached through the debug registry.
    fn debug_snapshot(&self) -> serde_json::Value;
}

/// Constructs a fresh store. Called at most once per [`BringupSequencer`].
///
/// Closures returning `Result<Arc<dyn AppStore>>` implement this trait.
///
/// [`BringupSequencer`]: crate::lifecycle::BringupSequencer
///
/// # Errors
///
/// Failures are fatal to bring-up.
pub trait StoreFactory: Send + Sync {
    /// Creates the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be built.
    fn create(&self) -> Result<Arc<dyn AppStore>>;
}

impl<F> StoreFactory for F
where
    F: Fn() -> Result<Arc<dyn AppStore>> + Send + Sync,
{
    fn create(&self) -> Result<Arc<dyn AppStore>> {
        self()
    }
}

/// Handle to the single process-wide store.
///
/// Cheap to clone; every clone points at the same container. Bring-up hands one
/// out, and consumers receive it by explicit passing.
#[derive(Clone)]
pub struct GlobalStoreHandle {
    store: Arc<dyn AppStore>,
}

impl GlobalStoreHandle {
    pub(crate) fn new(store: Arc<dyn AppStore>) -> Self {
        Self { store }
    }

    /// Enqueues an action into the store.
    pub fn dispatch(&self, action: Action) {
        tracing::trace!(action = action.type_name(), "dispatch");
        self.store.dispatch(action);
    }

    /// Returns the dispatch-only view of this store.
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher {
            store: Arc::clone(&self.store),
        }
    }

    /// Raw container view, for debug inspection.
    #[must_use]
    pub fn debug_snapshot(&self) -> serde_json::Value {
        self.store.debug_snapshot()
    }

    pub(crate) fn run_background_tasks(&self) {
        self.store.run_background_tasks();
    }

    /// Whether two handles refer to the same container.
    #[must_use]
    pub fn same_store(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }
}

impl fmt::Debug for GlobalStoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalStoreHandle").finish_non_exhaustive()
    }
}

/// The store's dispatch function, without access to anything else.
///
/// This is what the engine and the lifecycle bridge are bound to.
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn AppStore>,
}

impl Dispatcher {
    /// Enqueues an action into the store.
    pub fn dispatch(&self, action: Action) {
        tracing::trace!(action = action.type_name(), "dispatch");
        self.store.dispatch(action);
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}
