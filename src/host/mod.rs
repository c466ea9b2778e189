//! Host environment contract: the OS event sources the bridge listens to.
//!
//! A host adapter (platform glue, or [`SimulatedHost`] in tests) implements
//! [`NativeHost`]. Each registration hands back a [`ListenerHandle`]; removing
//! it must take effect synchronously, so no callback fires afterwards.
//!
//! # Modules
//!
//! - [`simulated`]: In-process host with synchronous event emission

pub mod simulated;

pub use simulated::SimulatedHost;

use crate::domain::error::Result;
use crate::domain::{AppStatus, ColorScheme};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Callback for foreground/background changes.
pub type AppStateListener = Box<dyn Fn(AppStatus) + Send + Sync>;

/// Callback for system appearance changes. Carries no payload.
pub type AppearanceListener = Box<dyn Fn() + Send + Sync>;

/// Callback for URLs opened into the app.
pub type UrlListener = Box<dyn Fn(&str) + Send + Sync>;

/// The three OS event sources the bridge subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Foreground/background state changes.
    AppState,
    /// System color scheme changes.
    Appearance,
    /// URL-open (deep link) notifications.
    Url,
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AppState => "app state",
            Self::Appearance => "appearance",
            Self::Url => "url",
        })
    }
}

/// Registration returned by the host; removing it stops the callback.
pub trait ListenerHandle: Send {
    /// Unregisters the listener. Must be synchronous and safe to call twice.
    fn remove(&mut self);
}

/// OS-level event sources and queries provided by the host environment.
pub trait NativeHost: Send + Sync {
    /// Current system color scheme.
    fn color_scheme(&self) -> ColorScheme;

    /// Registers a foreground/background change listener.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Subscription`](crate::LifecycleError::Subscription)
    /// if the host refuses the registration.
    fn add_app_state_listener(&self, listener: AppStateListener) -> Result<Box<dyn ListenerHandle>>;

    /// Registers a system appearance change listener.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Subscription`](crate::LifecycleError::Subscription)
    /// if the host refuses the registration.
    fn add_appearance_listener(&self, listener: AppearanceListener) -> Result<Box<dyn ListenerHandle>>;

    /// Registers a URL-open listener.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Subscription`](crate::LifecycleError::Subscription)
    /// if the host refuses the registration.
    fn add_url_listener(&self, listener: UrlListener) -> Result<Box<dyn ListenerHandle>>;
}
