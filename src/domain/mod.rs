//! Domain layer for the lifecycle bridge.
//!
//! Holds the value types shared by every other layer, independent of any
//! concrete host, store, or engine.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`status`]: Host-reported foreground state and color scheme
//!
//! # Examples
//!
//! ```
//! use native_lifecycle::domain::{AppStatus, ColorScheme};
//!
//! assert!(AppStatus::from_native("active").is_dispatchable());
//! assert!(ColorScheme::from_native("dark").is_dark());
//! ```

pub mod error;
pub mod status;

pub use error::{LifecycleError, Result};
pub use status::{AppStatus, ColorScheme};
