//! Scoped host subscriptions.
//!
//! A [`Subscription`] owns one host registration and removes it when released
//! or dropped, whichever comes first. [`LifecycleSubscription`] groups the
//! three the bridge holds while mounted.

use crate::host::{EventSource, ListenerHandle};

/// One live host registration.
///
/// Releasing is idempotent; dropping an unreleased subscription releases it.
pub struct Subscription {
    source: EventSource,
    handle: Option<Box<dyn ListenerHandle>>,
}

impl Subscription {
    /// Wraps a handle returned by the host.
    #[must_use]
    pub fn new(source: EventSource, handle: Box<dyn ListenerHandle>) -> Self {
        tracing::debug!(source = %source, "subscribed");
        Self {
            source,
            handle: Some(handle),
        }
    }

    /// Event source this subscription listens to.
    #[must_use]
    pub const fn source(&self) -> EventSource {
        self.source
    }

    /// Whether the registration is still held.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Removes the registration from the host. Later calls do nothing.
    pub fn release(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.remove();
            tracing::debug!(source = %self.source, "unsubscribed");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("source", &self.source)
            .field("active", &self.is_active())
            .finish()
    }
}

/// The bridge's three subscriptions, released together.
#[derive(Debug)]
pub struct LifecycleSubscription {
    app_state: Subscription,
    appearance: Subscription,
    url: Subscription,
}

impl LifecycleSubscription {
    /// Groups the three subscriptions.
    #[must_use]
    pub fn new(app_state: Subscription, appearance: Subscription, url: Subscription) -> Self {
        Self {
            app_state,
            appearance,
            url,
        }
    }

    /// Whether any of the three is still held.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.app_state.is_active() || self.appearance.is_active() || self.url.is_active()
    }

    /// Releases all three. Later calls do nothing.
    pub fn release(&mut self) {
        self.app_state.release();
        self.appearance.release();
        self.url.release();
    }
}
