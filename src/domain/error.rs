//! Error types for the lifecycle bridge.
//!
//! This module defines the centralized error type [`LifecycleError`] and a type alias
//! [`Result`] used throughout the crate. Bring-up failures are fatal by contract:
//! nothing in this crate retries them or turns them into user-facing messages.

use crate::host::EventSource;
use thiserror::Error;

/// The main error type for bring-up and lifecycle operations.
///
/// # Examples
///
/// ```
/// use native_lifecycle::LifecycleError;
///
/// fn make_store() -> Result<(), LifecycleError> {
///     Err(LifecycleError::StoreCreation("reducer table missing".to_string()))
/// }
///
/// assert!(make_store().is_err());
/// ```
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The store factory failed.
    ///
    /// Treated as fatal: the process is expected to fail to start.
    #[error("Store creation failed: {0}")]
    StoreCreation(String),

    /// The engine factory failed after the store was created.
    #[error("Engine creation failed: {0}")]
    EngineCreation(String),

    /// A previous bring-up attempt failed.
    ///
    /// A half-initialized store/engine pair is never reused, and bring-up is
    /// never retried, so every call after the first failure reports this.
    #[error("Bring-up previously failed: {0}")]
    BringupFailed(String),

    /// `ensure_app_ready` was re-entered from inside the store factory, before
    /// any store existed to hand back.
    #[error("Bring-up re-entered before the store was created")]
    ReentrantBringup,

    /// Registering a listener with the host failed.
    #[error("Failed to subscribe to {event_source} events: {reason}")]
    Subscription {
        /// Event source whose registration failed.
        event_source: EventSource,
        /// Host-provided failure description.
        reason: String,
    },

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A TOML configuration file could not be parsed.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A specialized `Result` type for lifecycle operations.
pub type Result<T> = std::result::Result<T, LifecycleError>;
