//! Native Lifecycle: startup and lifecycle bridge for a mobile app shell.
//!
//! The crate sits between the native platform and the application store:
//! - Idempotent, strictly ordered bring-up of the store and its side-effect engine
//! - Translation of OS app-state, appearance and deep-link events into store actions
//! - A composition root that gates the UI tree on bring-up and owns one bridge per mount

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Demo Shell (main.rs)                               │  ← Script replay
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Lifecycle Layer (lifecycle/)                       │
//! │  - Bring-up sequencing                              │
//! │  - Lifecycle bridge + subscriptions                 │
//! │  - Composition root                                 │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ App Layer     │   │ Store Layer   │   │ Host Layer    │
//! │ (app/)        │   │ (store/)      │   │ (host/)       │
//! │ - Actions     │   │ - Store trait │   │ - Native API  │
//! │ - Event rules │   │ - Journal     │   │ - Simulator   │
//! │ - State ref   │   │ - Debug hook  │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Engine (engine/), Domain (domain/),                │
//! │  Infrastructure (infrastructure/)                   │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing                            │
//! │  - Rotating JSON-lines span file                    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Actions, event rules and the app-state reference
//! - [`domain`]: Core domain types (app status, color scheme, errors)
//! - [`engine`]: Side-effect engine seam with a readiness gate
//! - [`host`]: Native platform seam and an in-process simulator
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`lifecycle`]: Bring-up, bridge and composition root
//! - [`store`]: Store seam, journal store and debug registry
//! - [`observability`]: OpenTelemetry tracing
//!
//! # Configuration
//!
//! The host passes a string map (or a TOML file for the demo shell):
//!
//! ```toml
//! trace_level = "debug"
//! trace_dir = "~/Library/Logs/app"
//! trace_max_bytes = 1048576
//! trace_backups = 2
//! expose_debug_store = true
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Process start**: parse [`Config`], initialize tracing
//! 2. **[`initialize`]**: build the [`BringupSequencer`] and [`RootComposition`]
//! 3. **Every root mount**:
//!    - `ensure_app_ready` (first call only: store, engine, background tasks,
//!      readiness signal, installer-ran)
//!    - Provide the [`StoreContext`]
//!    - Mount one [`LifecycleBridge`] (app state, appearance, URL listeners)
//! 4. **Every root unmount**: release all three listeners
//!
//! # Example
//!
//! ```rust
//! use native_lifecycle::engine::{Engine, GatedEngine};
//! use native_lifecycle::host::{NativeHost, SimulatedHost};
//! use native_lifecycle::store::{AppStore, Dispatcher, JournalStore};
//! use native_lifecycle::{initialize, AppStatus, Config};
//! use std::sync::Arc;
//!
//! let host = SimulatedHost::new();
//! let root = initialize(
//!     &Config::default(),
//!     || -> native_lifecycle::Result<Arc<dyn AppStore>> { Ok(Arc::new(JournalStore::new())) },
//!     |d: Dispatcher| -> native_lifecycle::Result<Box<dyn Engine>> {
//!         Ok(Box::new(GatedEngine::new(d)))
//!     },
//!     Arc::new(host.clone()) as Arc<dyn NativeHost>,
//! );
//!
//! let mounted = root.mount()?;
//! host.emit_app_state(AppStatus::Active);
//! assert_eq!(mounted.bridge().app_state(), AppStatus::Active);
//! # Ok::<(), native_lifecycle::LifecycleError>(())
//! ```

pub mod app;
pub mod domain;
pub mod engine;
pub mod host;
pub mod infrastructure;
pub mod lifecycle;
pub mod store;

pub mod observability;

pub use app::{handle_event, Action, AppStateRef, NativeEvent};
pub use domain::{AppStatus, ColorScheme, LifecycleError, Result};
pub use lifecycle::{BringupSequencer, LifecycleBridge, MountedRoot, RootComposition, StoreContext};

use engine::EngineFactory;
use host::NativeHost;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use store::{DebugRegistry, StoreFactory};

const DEFAULT_TRACE_MAX_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_TRACE_BACKUPS: usize = 3;

/// Process configuration.
///
/// Every field has a default, so an empty map or an empty TOML file is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracing level for OpenTelemetry spans.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Directory for the span file. `~` is expanded.
    ///
    /// Default: the platform local data directory (see
    /// [`infrastructure::get_data_dir`]).
    pub trace_dir: Option<PathBuf>,

    /// Size at which the span file is rotated. Default: 10 MiB
    pub trace_max_bytes: u64,

    /// Rotated span files to keep. Default: 3
    pub trace_backups: usize,

    /// Publish the store to a [`DebugRegistry`] during bring-up.
    ///
    /// Default: on in debug builds, off in release builds.
    pub expose_debug_store: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace_level: None,
            trace_dir: None,
            trace_max_bytes: DEFAULT_TRACE_MAX_BYTES,
            trace_backups: DEFAULT_TRACE_BACKUPS,
            expose_debug_store: cfg!(debug_assertions),
        }
    }
}

impl Config {
    /// Parses configuration from the host's string map.
    ///
    /// # Parsing Rules
    ///
    /// - `trace_level`: String → `Option<String>`
    /// - `trace_dir`: String → `Option<PathBuf>` (empty values ignored)
    /// - `trace_max_bytes`: String → `u64` (falls back to 10 MiB on parse error)
    /// - `trace_backups`: String → `usize` (falls back to 3 on parse error)
    /// - `expose_debug_store`: `"true"`/`"false"` (falls back to the build default)
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use native_lifecycle::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("trace_level".to_string(), "debug".to_string());
    /// map.insert("trace_backups".to_string(), "5".to_string());
    ///
    /// let config = Config::from_options(&map);
    /// assert_eq!(config.trace_level.as_deref(), Some("debug"));
    /// assert_eq!(config.trace_backups, 5);
    /// ```
    #[must_use]
    pub fn from_options(options: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let trace_dir = options
            .get("trace_dir")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let trace_max_bytes = options
            .get("trace_max_bytes")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(defaults.trace_max_bytes);

        let trace_backups = options
            .get("trace_backups")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(defaults.trace_backups);

        let expose_debug_store = options
            .get("expose_debug_store")
            .and_then(|s| s.trim().parse::<bool>().ok())
            .unwrap_or(defaults.expose_debug_store);

        Self {
            trace_level: options.get("trace_level").cloned(),
            trace_dir,
            trace_max_bytes,
            trace_backups,
            expose_debug_store,
        }
    }

    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Toml`] if the document is malformed or a
    /// value has the wrong type.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Io`] if the file cannot be read, or
    /// [`LifecycleError::Toml`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading config");
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Resolved trace directory.
    #[must_use]
    pub fn trace_dir(&self) -> PathBuf {
        self.trace_dir.as_ref().map_or_else(infrastructure::get_data_dir, |dir| {
            infrastructure::expand_tilde(&dir.to_string_lossy())
        })
    }
}

/// Builds the composition root for this process.
///
/// Call once at process start and keep the result alive for the life of the
/// process; mount and unmount it as often as the host recreates the UI tree.
///
/// # Parameters
///
/// * `config` - Process configuration
/// * `store_factory` - Creates the app store (called at most once)
/// * `engine_factory` - Creates the side-effect engine (called at most once)
/// * `host` - Native platform event source
///
/// # Returns
///
/// A [`RootComposition`] that has not brought anything up yet. Bring-up
/// happens on the first [`RootComposition::mount`].
pub fn initialize<S, E>(
    config: &Config,
    store_factory: S,
    engine_factory: E,
    host: Arc<dyn NativeHost>,
) -> RootComposition
where
    S: StoreFactory + 'static,
    E: EngineFactory + 'static,
{
    tracing::debug!(
        expose_debug_store = config.expose_debug_store,
        "initializing lifecycle root"
    );

    let mut sequencer = BringupSequencer::new(store_factory, engine_factory);
    if config.expose_debug_store {
        sequencer = sequencer.with_debug_registry(Arc::new(DebugRegistry::new()));
    }

    RootComposition::new(Arc::new(sequencer), host)
}
