//! Composition root: bring-up first, then the store context and one bridge.
//!
//! The UI tree itself lives outside this crate. What it needs from here is a
//! [`StoreContext`] to hand to descendants, obtained only after bring-up has
//! completed, and exactly one [`LifecycleBridge`] mounted alongside it.
//!
//! Hosts may tear the root down and recreate it many times (Android does
//! this on configuration changes). The store and engine live in the
//! [`BringupSequencer`] and outlast every mount.

use crate::domain::error::Result;
use crate::host::NativeHost;
use crate::lifecycle::{BringupSequencer, LifecycleBridge};
use crate::store::{Dispatcher, GlobalStoreHandle};
use std::sync::Arc;

/// Store handle shared with every descendant of the root.
#[derive(Debug, Clone)]
pub struct StoreContext {
    store: GlobalStoreHandle,
}

impl StoreContext {
    /// The store provided to the tree.
    #[must_use]
    pub const fn store(&self) -> &GlobalStoreHandle {
        &self.store
    }

    /// Dispatch function for components that only send actions.
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher {
        self.store.dispatcher()
    }
}

/// Process-level composition root.
///
/// # Example
///
/// ```rust
/// use native_lifecycle::engine::{Engine, GatedEngine};
/// use native_lifecycle::host::SimulatedHost;
/// use native_lifecycle::lifecycle::{BringupSequencer, RootComposition};
/// use native_lifecycle::store::{AppStore, Dispatcher, JournalStore};
/// use std::sync::Arc;
///
/// let sequencer = Arc::new(BringupSequencer::new(
///     || -> native_lifecycle::Result<Arc<dyn AppStore>> { Ok(Arc::new(JournalStore::new())) },
///     |d: Dispatcher| -> native_lifecycle::Result<Box<dyn Engine>> {
///         Ok(Box::new(GatedEngine::new(d)))
///     },
/// ));
/// let root = RootComposition::new(sequencer, Arc::new(SimulatedHost::new()));
///
/// let mounted = root.mount()?;
/// mounted.unmount();
/// let remounted = root.mount()?; // same store, fresh bridge
/// # drop(remounted);
/// # Ok::<(), native_lifecycle::LifecycleError>(())
/// ```
#[derive(Clone)]
pub struct RootComposition {
    sequencer: Arc<BringupSequencer>,
    host: Arc<dyn NativeHost>,
}

impl RootComposition {
    /// Creates a root over a sequencer and a host.
    #[must_use]
    pub fn new(sequencer: Arc<BringupSequencer>, host: Arc<dyn NativeHost>) -> Self {
        Self { sequencer, host }
    }

    /// The sequencer this root brings up through.
    #[must_use]
    pub const fn sequencer(&self) -> &Arc<BringupSequencer> {
        &self.sequencer
    }

    /// Mounts the root: ensures bring-up, builds the context, mounts the bridge.
    ///
    /// # Errors
    ///
    /// Propagates bring-up failures and bridge registration failures unchanged.
    pub fn mount(&self) -> Result<MountedRoot> {
        let _span = tracing::debug_span!("root_mount").entered();

        let store = self.sequencer.ensure_app_ready()?;
        let context = StoreContext { store };
        let bridge = LifecycleBridge::mount(Arc::clone(&self.host), context.dispatcher())?;

        tracing::debug!("root mounted");
        Ok(MountedRoot { context, bridge })
    }
}

impl std::fmt::Debug for RootComposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootComposition")
            .field("sequencer", &self.sequencer)
            .finish_non_exhaustive()
    }
}

/// A mounted root: the store context plus its single bridge.
///
/// Dropping it unmounts the bridge; the store is untouched.
#[derive(Debug)]
pub struct MountedRoot {
    context: StoreContext,
    bridge: LifecycleBridge,
}

impl MountedRoot {
    /// Context to provide to the UI tree.
    #[must_use]
    pub const fn context(&self) -> &StoreContext {
        &self.context
    }

    /// The bridge mounted next to the tree.
    #[must_use]
    pub const fn bridge(&self) -> &LifecycleBridge {
        &self.bridge
    }

    /// Unmounts the bridge.
    pub fn unmount(self) {
        tracing::debug!("root unmounting");
        self.bridge.unmount();
    }
}
