//! In-process host environment.
//!
//! [`SimulatedHost`] keeps listener registries in memory and delivers events
//! synchronously on the caller's thread, in registration order, which is
//! exactly the delivery model the bridge assumes. The binary replays scripts
//! through it and the tests use it to observe subscription lifetimes.

use crate::domain::error::{LifecycleError, Result};
use crate::domain::{AppStatus, ColorScheme};
use crate::host::{
    AppStateListener, AppearanceListener, EventSource, ListenerHandle, NativeHost, UrlListener,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type SharedAppState = Arc<dyn Fn(AppStatus) + Send + Sync>;
type SharedAppearance = Arc<dyn Fn() + Send + Sync>;
type SharedUrl = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct Registry {
    app_state: BTreeMap<u64, SharedAppState>,
    appearance: BTreeMap<u64, SharedAppearance>,
    url: BTreeMap<u64, SharedUrl>,
    refused: BTreeSet<EventSource>,
}

impl Registry {
    fn remove(&mut self, source: EventSource, id: u64) {
        match source {
            EventSource::AppState => {
                self.app_state.remove(&id);
            }
            EventSource::Appearance => {
                self.appearance.remove(&id);
            }
            EventSource::Url => {
                self.url.remove(&id);
            }
        }
    }

    fn count(&self, source: EventSource) -> usize {
        match source {
            EventSource::AppState => self.app_state.len(),
            EventSource::Appearance => self.appearance.len(),
            EventSource::Url => self.url.len(),
        }
    }
}

#[derive(Default)]
struct Inner {
    registry: Mutex<Registry>,
    color_scheme: Mutex<ColorScheme>,
    next_id: AtomicU64,
}

impl Inner {
    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Host that delivers simulated OS events synchronously.
///
/// Clones share the same registries.
///
/// # Example
///
/// ```rust
/// use native_lifecycle::domain::AppStatus;
/// use native_lifecycle::host::{EventSource, NativeHost, SimulatedHost};
///
/// let host = SimulatedHost::new();
/// let mut handle = host
///     .add_app_state_listener(Box::new(|status| println!("now {status}")))
///     .unwrap();
/// assert_eq!(host.listener_count(EventSource::AppState), 1);
///
/// host.emit_app_state(AppStatus::Active);
/// handle.remove();
/// assert_eq!(host.listener_count(EventSource::AppState), 0);
/// ```
#[derive(Clone, Default)]
pub struct SimulatedHost {
    inner: Arc<Inner>,
}

impl SimulatedHost {
    /// Creates a host with no listeners and an unspecified color scheme.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets what the color-scheme query answers from now on.
    pub fn set_color_scheme(&self, scheme: ColorScheme) {
        *self
            .inner
            .color_scheme
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = scheme;
    }

    /// Makes every further registration for `source` fail until re-allowed.
    pub fn refuse_registrations(&self, source: EventSource) {
        self.inner.registry().refused.insert(source);
    }

    /// Lets registrations for `source` succeed again.
    pub fn allow_registrations(&self, source: EventSource) {
        self.inner.registry().refused.remove(&source);
    }

    /// Number of live listeners for `source`.
    #[must_use]
    pub fn listener_count(&self, source: EventSource) -> usize {
        self.inner.registry().count(source)
    }

    /// Delivers a foreground/background change to every listener.
    pub fn emit_app_state(&self, status: AppStatus) {
        let listeners: Vec<SharedAppState> = self.inner.registry().app_state.values().cloned().collect();
        tracing::debug!(status = %status, listeners = listeners.len(), "emitting app state");
        for listener in listeners {
            listener(status);
        }
    }

    /// Delivers a system appearance change to every listener.
    pub fn emit_appearance_change(&self) {
        let listeners: Vec<SharedAppearance> =
            self.inner.registry().appearance.values().cloned().collect();
        tracing::debug!(listeners = listeners.len(), "emitting appearance change");
        for listener in listeners {
            listener();
        }
    }

    /// Delivers a URL-open notification to every listener.
    pub fn emit_url(&self, url: &str) {
        let listeners: Vec<SharedUrl> = self.inner.registry().url.values().cloned().collect();
        tracing::debug!(url = %url, listeners = listeners.len(), "emitting url");
        for listener in listeners {
            listener(url);
        }
    }

    fn register<F>(&self, source: EventSource, insert: F) -> Result<Box<dyn ListenerHandle>>
    where
        F: FnOnce(&mut Registry, u64),
    {
        let mut registry = self.inner.registry();
        if registry.refused.contains(&source) {
            return Err(LifecycleError::Subscription {
                event_source: source,
                reason: "registration refused by host".to_string(),
            });
        }
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        insert(&mut registry, id);
        drop(registry);

        Ok(Box::new(SimulatedHandle {
            inner: Arc::downgrade(&self.inner),
            source,
            id,
            removed: false,
        }))
    }
}

impl NativeHost for SimulatedHost {
    fn color_scheme(&self) -> ColorScheme {
        *self
            .inner
            .color_scheme
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn add_app_state_listener(&self, listener: AppStateListener) -> Result<Box<dyn ListenerHandle>> {
        self.register(EventSource::AppState, |registry, id| {
            registry.app_state.insert(id, Arc::from(listener));
        })
    }

    fn add_appearance_listener(&self, listener: AppearanceListener) -> Result<Box<dyn ListenerHandle>> {
        self.register(EventSource::Appearance, |registry, id| {
            registry.appearance.insert(id, Arc::from(listener));
        })
    }

    fn add_url_listener(&self, listener: UrlListener) -> Result<Box<dyn ListenerHandle>> {
        self.register(EventSource::Url, |registry, id| {
            registry.url.insert(id, Arc::from(listener));
        })
    }
}

impl std::fmt::Debug for SimulatedHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.inner.registry();
        f.debug_struct("SimulatedHost")
            .field("app_state_listeners", &registry.app_state.len())
            .field("appearance_listeners", &registry.appearance.len())
            .field("url_listeners", &registry.url.len())
            .finish_non_exhaustive()
    }
}

struct SimulatedHandle {
    inner: Weak<Inner>,
    source: EventSource,
    id: u64,
    removed: bool,
}

impl ListenerHandle for SimulatedHandle {
    fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;
        if let Some(inner) = self.inner.upgrade() {
            inner.registry().remove(self.source, self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_in_registration_order() {
        let host = SimulatedHost::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            handles.push(
                host.add_url_listener(Box::new(move |url| {
                    seen.lock().unwrap().push(format!("{tag}:{url}"));
                }))
                .unwrap(),
            );
        }

        host.emit_url("x://y");
        assert_eq!(*seen.lock().unwrap(), vec!["first:x://y", "second:x://y"]);
    }

    #[test]
    fn removed_listener_no_longer_fires() {
        let host = SimulatedHost::new();
        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);
        let mut handle = host
            .add_appearance_listener(Box::new(move || *counter.lock().unwrap() += 1))
            .unwrap();

        host.emit_appearance_change();
        handle.remove();
        handle.remove();
        host.emit_appearance_change();

        assert_eq!(*hits.lock().unwrap(), 1);
        assert_eq!(host.listener_count(EventSource::Appearance), 0);
    }

    #[test]
    fn refused_registration_reports_source() {
        let host = SimulatedHost::new();
        host.refuse_registrations(EventSource::Url);

        let err = host.add_url_listener(Box::new(|_| {})).err().unwrap();
        assert!(matches!(
            err,
            LifecycleError::Subscription {
                event_source: EventSource::Url,
                ..
            }
        ));

        host.allow_registrations(EventSource::Url);
        assert!(host.add_url_listener(Box::new(|_| {})).is_ok());
    }

    #[test]
    fn color_scheme_query_follows_setter() {
        let host = SimulatedHost::new();
        assert_eq!(host.color_scheme(), ColorScheme::Unspecified);
        host.set_color_scheme(ColorScheme::Dark);
        assert_eq!(host.color_scheme(), ColorScheme::Dark);
    }
}
