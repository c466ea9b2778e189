//! Application layer: actions and the host-event policy.
//!
//! This module sits between the host shim and the store. Host notifications
//! become [`NativeEvent`]s, [`handle_event`] turns them into [`Action`]s, and
//! the lifecycle bridge dispatches those into the store.
//!
//! ```text
//! OS notification → NativeEvent → handle_event → Vec<Action> → dispatch
//!                                      ↕
//!                                 AppStateRef
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Action values forwarded to the store
//! - [`handler`]: Event translation and filtering policy
//! - [`state`]: The last-observed foreground state cell

pub mod actions;
pub mod handler;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, NativeEvent};
pub use state::AppStateRef;
