//! Last observed foreground state, shared between event handlers.
//!
//! [`AppStateRef`] is a plain memory cell, not reactive state: writing it never
//! triggers anything. The foreground/background handler writes it, the theme
//! handler reads it. Clones share the same cell.

use crate::domain::AppStatus;
use std::sync::{Arc, Mutex, PoisonError};

/// Shared cell holding the most recent [`AppStatus`].
///
/// Starts as [`AppStatus::Unknown`]. Guarded by a mutex so hosts that deliver
/// callbacks on different threads still read a consistent value.
///
/// # Example
///
/// ```rust
/// use native_lifecycle::app::AppStateRef;
/// use native_lifecycle::domain::AppStatus;
///
/// let cell = AppStateRef::new();
/// let reader = cell.clone();
/// cell.set(AppStatus::Active);
/// assert_eq!(reader.get(), AppStatus::Active);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AppStateRef {
    current: Arc<Mutex<AppStatus>>,
}

impl AppStateRef {
    /// Creates a cell holding `Unknown`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the last observed state.
    #[must_use]
    pub fn get(&self) -> AppStatus {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a newly observed state.
    pub fn set(&self, status: AppStatus) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }

    /// Whether the last observed state is `Active`.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.get() == AppStatus::Active
    }
}
