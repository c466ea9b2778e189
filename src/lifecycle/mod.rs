//! Lifecycle layer: bring-up sequencing and the OS event bridge.
//!
//! ```text
//! RootComposition::mount
//!   ├─▶ BringupSequencer::ensure_app_ready   (once per process)
//!   │     store → debug exposure → engine → background tasks → ready → InstallerRan
//!   ├─▶ StoreContext                         (handed to the UI tree)
//!   └─▶ LifecycleBridge::mount               (one per root mount)
//!         app state / appearance / url listeners → handle_event → dispatch
//! ```
//!
//! # Modules
//!
//! - [`bringup`]: Idempotent, thread-safe store/engine bring-up
//! - [`bridge`]: Host listener set forwarding into the store
//! - [`subscription`]: Scoped listener handles
//! - [`root`]: Composition root boundary

pub mod bridge;
pub mod bringup;
pub mod root;
pub mod subscription;

pub use bridge::LifecycleBridge;
pub use bringup::BringupSequencer;
pub use root::{MountedRoot, RootComposition, StoreContext};
pub use subscription::{LifecycleSubscription, Subscription};
