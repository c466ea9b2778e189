//! Bridge from OS lifecycle notifications to store dispatch.
//!
//! A mounted [`LifecycleBridge`] holds three host subscriptions (app state,
//! appearance, URL) and forwards each notification through
//! [`handle_event`](crate::app::handle_event) into the store. It owns the
//! [`AppStateRef`] its handlers share, so every mount starts fresh from
//! `unknown`.
//!
//! # States
//!
//! ```text
//! unmounted ──mount()──▶ mounted ──unmount() / drop──▶ unmounted
//! ```
//!
//! Teardown releases all three subscriptions exactly once and flips a liveness
//! flag first, so a notification already in flight when the host removes the
//! listener is dropped rather than dispatched.

use crate::app::{handle_event, AppStateRef, NativeEvent};
use crate::domain::error::Result;
use crate::domain::{AppStatus, ColorScheme};
use crate::host::{EventSource, NativeHost};
use crate::lifecycle::subscription::{LifecycleSubscription, Subscription};
use crate::store::Dispatcher;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// State shared by the three listener closures.
#[derive(Clone)]
struct Forwarder {
    app_state: AppStateRef,
    dispatcher: Dispatcher,
    live: Arc<AtomicBool>,
    host: Weak<dyn NativeHost>,
}

impl Forwarder {
    fn forward(&self, event: &NativeEvent) {
        if !self.live.load(Ordering::Acquire) {
            tracing::debug!(event = ?event, "dropping event delivered after unmount");
            return;
        }
        for action in handle_event(&self.app_state, event, || self.color_scheme()) {
            self.dispatcher.dispatch(action);
        }
    }

    fn color_scheme(&self) -> ColorScheme {
        self.host
            .upgrade()
            .map_or(ColorScheme::Unspecified, |host| host.color_scheme())
    }
}

/// Mounted bridge between a host and the store.
///
/// # Example
///
/// ```rust,no_run
/// use native_lifecycle::host::{NativeHost, SimulatedHost};
/// use native_lifecycle::lifecycle::LifecycleBridge;
/// use native_lifecycle::store::Dispatcher;
/// use std::sync::Arc;
///
/// # fn run(dispatcher: Dispatcher) -> native_lifecycle::Result<()> {
/// let host: Arc<dyn NativeHost> = Arc::new(SimulatedHost::new());
/// let bridge = LifecycleBridge::mount(host, dispatcher)?;
/// // ... host delivers events ...
/// bridge.unmount();
/// # Ok(())
/// # }
/// ```
pub struct LifecycleBridge {
    subscriptions: LifecycleSubscription,
    app_state: AppStateRef,
    live: Arc<AtomicBool>,
    _host: Arc<dyn NativeHost>,
}

impl LifecycleBridge {
    /// Registers the three listeners and starts forwarding.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Subscription`](crate::LifecycleError::Subscription)
    /// if the host refuses a registration. Listeners registered before the
    /// failure are released before returning.
    pub fn mount(host: Arc<dyn NativeHost>, dispatcher: Dispatcher) -> Result<Self> {
        let _span = tracing::debug_span!("bridge_mount").entered();

        let app_state = AppStateRef::new();
        let live = Arc::new(AtomicBool::new(true));
        let forwarder = Forwarder {
            app_state: app_state.clone(),
            dispatcher,
            live: Arc::clone(&live),
            host: Arc::downgrade(&host),
        };

        let on_app_state = forwarder.clone();
        let app_state_sub = Subscription::new(
            EventSource::AppState,
            host.add_app_state_listener(Box::new(move |next: AppStatus| {
                on_app_state.forward(&NativeEvent::AppStateChanged(next));
            }))?,
        );

        let on_appearance = forwarder.clone();
        let appearance_sub = Subscription::new(
            EventSource::Appearance,
            host.add_appearance_listener(Box::new(move || {
                on_appearance.forward(&NativeEvent::AppearanceChanged);
            }))?,
        );

        let on_url = forwarder;
        let url_sub = Subscription::new(
            EventSource::Url,
            host.add_url_listener(Box::new(move |url: &str| {
                on_url.forward(&NativeEvent::UrlOpened(url.to_string()));
            }))?,
        );

        tracing::debug!("bridge mounted");
        Ok(Self {
            subscriptions: LifecycleSubscription::new(app_state_sub, appearance_sub, url_sub),
            app_state,
            live,
            _host: host,
        })
    }

    /// Last foreground state this mount observed.
    #[must_use]
    pub fn app_state(&self) -> AppStatus {
        self.app_state.get()
    }

    /// Whether the bridge is still forwarding.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.live.load(Ordering::Acquire) && self.subscriptions.is_active()
    }

    /// Stops forwarding and releases every subscription.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.live.swap(false, Ordering::AcqRel) {
            tracing::debug!("bridge unmounting");
        }
        self.subscriptions.release();
    }
}

impl Drop for LifecycleBridge {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for LifecycleBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleBridge")
            .field("subscriptions", &self.subscriptions)
            .field("app_state", &self.app_state.get())
            .field("live", &self.live.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}
