//! Engine boundary: the networking/session subsystem brought up after the store.
//!
//! The engine's protocol logic lives elsewhere. Bring-up only needs to build
//! it from the store's [`Dispatcher`] and tell it when the store's background
//! processors are live.
//!
//! # Modules
//!
//! - [`gated`]: [`GatedEngine`], which buffers outgoing actions until ready

pub mod gated;

pub use gated::GatedEngine;

use crate::domain::error::Result;
use crate::store::Dispatcher;

/// A networking/session engine bound to the store's dispatch function.
pub trait Engine: Send + Sync {
    /// Informs the engine the store's background processors are running, so
    /// actions it dispatches from now on will be drained.
    ///
    /// Bring-up calls this exactly once.
    fn sagas_are_ready(&self);
}

/// Constructs the engine. Called at most once per bring-up, right after the store.
///
/// Closures taking a [`Dispatcher`] implement this trait.
pub trait EngineFactory: Send + Sync {
    /// Creates the engine bound to `dispatcher`.
    ///
    /// # Errors
    ///
    /// Failures are fatal to bring-up.
    fn create(&self, dispatcher: Dispatcher) -> Result<Box<dyn Engine>>;
}

impl<F> EngineFactory for F
where
    F: Fn(Dispatcher) -> Result<Box<dyn Engine>> + Send + Sync,
{
    fn create(&self, dispatcher: Dispatcher) -> Result<Box<dyn Engine>> {
        self(dispatcher)
    }
}

impl<E> Engine for std::sync::Arc<E>
where
    E: Engine + ?Sized,
{
    fn sagas_are_ready(&self) {
        (**self).sagas_are_ready();
    }
}
