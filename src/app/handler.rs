//! Translation of host lifecycle events into store actions.
//!
//! This module implements the policy between OS notifications and the store:
//! which notifications are forwarded, which are filtered, and which also
//! re-read the system color scheme. It is pure apart from the write into
//! [`AppStateRef`], so the bridge and the tests drive it the same way.
//!
//! # Policy
//!
//! | Event                  | Actions                                              |
//! |------------------------|------------------------------------------------------|
//! | `AppStateChanged(s)`   | `MobileAppState(s)` unless `s` is unknown/extension  |
//! |                        | plus `SetSystemDarkMode` when `s` is active          |
//! | `AppearanceChanged`    | `SetSystemDarkMode` only while the app is active     |
//! | `UrlOpened(url)`       | `Link(url)`, always                                  |
//!
//! The OS fires appearance notifications while backgrounded (iOS does so to
//! take app-switcher snapshots); those are dropped.
//!
//! # Example
//!
//! ```rust
//! use native_lifecycle::app::{handle_event, Action, AppStateRef, NativeEvent};
//! use native_lifecycle::domain::{AppStatus, ColorScheme};
//!
//! let state = AppStateRef::new();
//! let actions = handle_event(&state, &NativeEvent::AppStateChanged(AppStatus::Active), || {
//!     ColorScheme::Dark
//! });
//! assert_eq!(
//!     actions,
//!     vec![
//!         Action::mobile_app_state_changed(AppStatus::Active),
//!         Action::set_system_dark_mode(true),
//!     ]
//! );
//! ```

use crate::app::{Action, AppStateRef};
use crate::domain::{AppStatus, ColorScheme};

/// Notifications delivered by the host environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeEvent {
    /// Foreground/background change carrying the next state.
    AppStateChanged(AppStatus),
    /// The system color scheme changed. Carries no payload; the current
    /// scheme must be queried.
    AppearanceChanged,
    /// A URL was opened into the app.
    UrlOpened(String),
}

/// Processes one host notification and returns the actions to dispatch, in order.
///
/// `color_scheme` is only invoked when a dark-mode action is produced.
pub fn handle_event<F>(app_state: &AppStateRef, event: &NativeEvent, color_scheme: F) -> Vec<Action>
where
    F: FnOnce() -> ColorScheme,
{
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        NativeEvent::AppStateChanged(next) => {
            app_state.set(*next);

            let mut actions = Vec::with_capacity(2);
            if next.is_dispatchable() {
                actions.push(Action::mobile_app_state_changed(*next));
            } else {
                tracing::debug!(next_app_state = %next, "filtered app state");
            }
            if *next == AppStatus::Active {
                actions.push(Action::set_system_dark_mode(color_scheme().is_dark()));
            }
            actions
        }
        NativeEvent::AppearanceChanged => {
            if app_state.is_active() {
                vec![Action::set_system_dark_mode(color_scheme().is_dark())]
            } else {
                tracing::debug!(
                    app_state = %app_state.get(),
                    "ignoring appearance change while not active"
                );
                vec![]
            }
        }
        NativeEvent::UrlOpened(url) => vec![Action::link_received(url.clone())],
    }
}
