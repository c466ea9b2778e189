//! Store boundary: the state container bring-up creates and everything dispatches into.
//!
//! # Modules
//!
//! - [`backend`]: [`AppStore`] / [`StoreFactory`] traits and the handles passed around
//! - [`journal`]: [`JournalStore`], an in-memory reference implementation
//! - [`debug`]: [`DebugRegistry`], the development-build inspection point

pub mod backend;
pub mod debug;
pub mod journal;

pub use backend::{AppStore, Dispatcher, GlobalStoreHandle, StoreFactory};
pub use debug::{DebugRegistry, DEBUG_STORE_NAME};
pub use journal::{ActionSink, JournalStore};
