//! One-time bring-up of the store and engine.
//!
//! [`BringupSequencer::ensure_app_ready`] is called on every root mount and
//! performs the full sequence the first time only:
//!
//! ```text
//! 1. already ready?            → return the handle
//! 2. StoreFactory::create      → store parked in the slot
//! 3. debug exposure (dev only) → DebugRegistry["DEBUGStore"]
//! 4. EngineFactory::create     → engine bound to store.dispatcher()
//! 5. store.run_background_tasks()
//! 6. engine.sagas_are_ready()
//! 7. dispatch(InstallerRan)
//! ```
//!
//! # Concurrency
//!
//! The slot is a mutex plus condvar. The first caller claims it and runs the
//! steps with the lock released. A re-entrant call from the same thread during
//! steps 3-7 gets the parked store back immediately; a caller on another thread
//! waits for the sequence to settle and receives the same handle. Two stores
//! are never created.
//!
//! # Failure
//!
//! A failing factory (or a panic during the sequence) marks the slot failed.
//! The first caller gets the original error; every later caller gets
//! [`LifecycleError::BringupFailed`]. There is no retry.

use crate::app::Action;
use crate::domain::error::{LifecycleError, Result};
use crate::engine::{Engine, EngineFactory};
use crate::store::{DebugRegistry, GlobalStoreHandle, StoreFactory, DEBUG_STORE_NAME};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

enum Slot {
    Empty,
    CreatingStore {
        owner: ThreadId,
    },
    Wiring {
        owner: ThreadId,
        store: GlobalStoreHandle,
    },
    Ready {
        store: GlobalStoreHandle,
        _engine: Box<dyn Engine>,
    },
    Failed(String),
}

/// Creates the single store/engine pair, once.
///
/// Owned by the composition root and shared by `Arc`; consumers get the store
/// handle it returns rather than reaching for it themselves.
///
/// # Example
///
/// ```rust
/// use native_lifecycle::engine::{Engine, GatedEngine};
/// use native_lifecycle::lifecycle::BringupSequencer;
/// use native_lifecycle::store::{AppStore, Dispatcher, JournalStore};
/// use std::sync::Arc;
///
/// let sequencer = BringupSequencer::new(
///     || -> native_lifecycle::Result<Arc<dyn AppStore>> { Ok(Arc::new(JournalStore::new())) },
///     |dispatcher: Dispatcher| -> native_lifecycle::Result<Box<dyn Engine>> {
///         Ok(Box::new(GatedEngine::new(dispatcher)))
///     },
/// );
///
/// let first = sequencer.ensure_app_ready()?;
/// let again = sequencer.ensure_app_ready()?;
/// assert!(first.same_store(&again));
/// assert!(sequencer.is_ready());
/// # Ok::<(), native_lifecycle::LifecycleError>(())
/// ```
pub struct BringupSequencer {
    store_factory: Box<dyn StoreFactory>,
    engine_factory: Box<dyn EngineFactory>,
    debug_registry: Option<Arc<DebugRegistry>>,
    slot: Mutex<Slot>,
    settled: Condvar,
}

impl BringupSequencer {
    /// Creates a sequencer that has not run yet.
    pub fn new<S, E>(store_factory: S, engine_factory: E) -> Self
    where
        S: StoreFactory + 'static,
        E: EngineFactory + 'static,
    {
        Self {
            store_factory: Box::new(store_factory),
            engine_factory: Box::new(engine_factory),
            debug_registry: None,
            slot: Mutex::new(Slot::Empty),
            settled: Condvar::new(),
        }
    }

    /// Publishes the store to `registry` during bring-up.
    ///
    /// Only attach a registry in development builds.
    #[must_use]
    pub fn with_debug_registry(mut self, registry: Arc<DebugRegistry>) -> Self {
        self.debug_registry = Some(registry);
        self
    }

    /// The registry the store is published to, if any.
    #[must_use]
    pub const fn debug_registry(&self) -> Option<&Arc<DebugRegistry>> {
        self.debug_registry.as_ref()
    }

    /// Runs bring-up if it has not run yet and returns the store handle.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::StoreCreation`] / [`LifecycleError::EngineCreation`]
    ///   (or whatever the factory returned) on the attempt that failed
    /// - [`LifecycleError::BringupFailed`] on any call after a failure
    /// - [`LifecycleError::ReentrantBringup`] if called from inside the store factory
    pub fn ensure_app_ready(&self) -> Result<GlobalStoreHandle> {
        let me = thread::current().id();
        let mut slot = self.lock();
        loop {
            let in_progress = match &*slot {
                Slot::Ready { store, .. } => return Ok(store.clone()),
                Slot::Failed(reason) => return Err(LifecycleError::BringupFailed(reason.clone())),
                Slot::Wiring { owner, store } if *owner == me => {
                    tracing::debug!("re-entrant bring-up call, returning parked store");
                    return Ok(store.clone());
                }
                Slot::CreatingStore { owner } if *owner == me => {
                    return Err(LifecycleError::ReentrantBringup);
                }
                Slot::CreatingStore { .. } | Slot::Wiring { .. } => true,
                Slot::Empty => false,
            };
            if !in_progress {
                break;
            }
            tracing::debug!("bring-up in progress on another thread, waiting");
            slot = self
                .settled
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *slot = Slot::CreatingStore { owner: me };
        drop(slot);

        let mut in_flight = InFlight {
            sequencer: self,
            settled: false,
        };
        let result = self.bring_up(me);
        in_flight.settled = true;
        result
    }

    /// Whether bring-up completed successfully.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(&*self.lock(), Slot::Ready { .. })
    }

    /// Whether bring-up failed.
    #[must_use]
    pub fn has_failed(&self) -> bool {
        matches!(&*self.lock(), Slot::Failed(_))
    }

    /// The store handle, once bring-up has completed.
    #[must_use]
    pub fn store(&self) -> Option<GlobalStoreHandle> {
        match &*self.lock() {
            Slot::Ready { store, .. } => Some(store.clone()),
            _ => None,
        }
    }

    fn bring_up(&self, me: ThreadId) -> Result<GlobalStoreHandle> {
        let _span = tracing::debug_span!("bringup").entered();

        tracing::debug!("creating store");
        let store = match self.store_factory.create() {
            Ok(store) => GlobalStoreHandle::new(store),
            Err(e) => return Err(self.fail(e)),
        };
        self.settle(Slot::Wiring {
            owner: me,
            store: store.clone(),
        });

        if let Some(registry) = &self.debug_registry {
            registry.expose(DEBUG_STORE_NAME, store.clone());
        }

        tracing::debug!("creating engine");
        let engine = match self.engine_factory.create(store.dispatcher()) {
            Ok(engine) => engine,
            Err(e) => return Err(self.fail(e)),
        };

        tracing::debug!("starting background tasks");
        store.run_background_tasks();

        tracing::debug!("signaling engine readiness");
        engine.sagas_are_ready();

        // No installer on mobile.
        store.dispatch(Action::installer_ran());

        self.settle(Slot::Ready {
            store: store.clone(),
            _engine: engine,
        });
        tracing::info!("bring-up complete");
        Ok(store)
    }

    fn fail(&self, error: LifecycleError) -> LifecycleError {
        tracing::error!(error = %error, "bring-up failed");
        self.settle(Slot::Failed(error.to_string()));
        error
    }

    fn settle(&self, next: Slot) {
        *self.lock() = next;
        self.settled.notify_all();
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for BringupSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.lock() {
            Slot::Empty => "empty",
            Slot::CreatingStore { .. } => "creating_store",
            Slot::Wiring { .. } => "wiring",
            Slot::Ready { .. } => "ready",
            Slot::Failed(_) => "failed",
        };
        f.debug_struct("BringupSequencer")
            .field("state", &state)
            .field("debug_exposure", &self.debug_registry.is_some())
            .finish_non_exhaustive()
    }
}

/// Marks the slot failed if bring-up unwinds before settling.
struct InFlight<'a> {
    sequencer: &'a BringupSequencer,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::error!("bring-up panicked");
            self.sequencer
                .settle(Slot::Failed("bring-up panicked".to_string()));
        }
    }
}
