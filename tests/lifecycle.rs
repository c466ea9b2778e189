//! End-to-end behavior of bring-up, the bridge and the composition root,
//! observed through instrumented store and engine fakes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex, OnceLock};
use std::thread;

use native_lifecycle::engine::Engine;
use native_lifecycle::host::{EventSource, SimulatedHost};
use native_lifecycle::store::{AppStore, Dispatcher};
use native_lifecycle::{
    Action, AppStatus, BringupSequencer, ColorScheme, LifecycleError, Result, RootComposition,
};

type Log = Arc<Mutex<Vec<&'static str>>>;

/// Store that records lifecycle calls and every dispatched action.
struct RecordingStore {
    log: Log,
    dispatched: Mutex<Vec<Action>>,
}

impl AppStore for RecordingStore {
    fn dispatch(&self, action: Action) {
        if action == Action::installer_ran() {
            self.log.lock().unwrap().push("installer-ran-dispatch");
        }
        self.dispatched.lock().unwrap().push(action);
    }

    fn run_background_tasks(&self) {
        self.log.lock().unwrap().push("runBackgroundTasks");
    }

    fn debug_snapshot(&self) -> serde_json::Value {
        serde_json::json!({ "dispatched": self.dispatched.lock().unwrap().len() })
    }
}

struct RecordingEngine {
    log: Log,
}

impl Engine for RecordingEngine {
    fn sagas_are_ready(&self) {
        self.log.lock().unwrap().push("readiness-signal");
    }
}

/// Sequencer over recording fakes, plus the shared observation points.
struct Harness {
    log: Log,
    store: Arc<OnceLock<Arc<RecordingStore>>>,
    store_creations: Arc<AtomicUsize>,
    engine_creations: Arc<AtomicUsize>,
    sequencer: Arc<BringupSequencer>,
}

impl Harness {
    fn new() -> Self {
        let log: Log = Arc::default();
        let store: Arc<OnceLock<Arc<RecordingStore>>> = Arc::default();
        let store_creations = Arc::new(AtomicUsize::new(0));
        let engine_creations = Arc::new(AtomicUsize::new(0));

        let sequencer = {
            let (log_s, store_s, count_s) = (Arc::clone(&log), Arc::clone(&store), Arc::clone(&store_creations));
            let (log_e, count_e) = (Arc::clone(&log), Arc::clone(&engine_creations));
            BringupSequencer::new(
                move || -> Result<Arc<dyn AppStore>> {
                    count_s.fetch_add(1, Ordering::SeqCst);
                    log_s.lock().unwrap().push("store-create");
                    let created = Arc::new(RecordingStore {
                        log: Arc::clone(&log_s),
                        dispatched: Mutex::default(),
                    });
                    let _ = store_s.set(Arc::clone(&created));
                    Ok(created)
                },
                move |_: Dispatcher| -> Result<Box<dyn Engine>> {
                    count_e.fetch_add(1, Ordering::SeqCst);
                    log_e.lock().unwrap().push("engine-create");
                    Ok(Box::new(RecordingEngine {
                        log: Arc::clone(&log_e),
                    }))
                },
            )
        };

        Self {
            log,
            store,
            store_creations,
            engine_creations,
            sequencer: Arc::new(sequencer),
        }
    }

    fn log(&self) -> Vec<&'static str> {
        self.log.lock().unwrap().clone()
    }

    fn dispatched(&self) -> Vec<Action> {
        self.store
            .get()
            .map(|s| s.dispatched.lock().unwrap().clone())
            .unwrap_or_default()
    }

    fn dispatched_after_bringup(&self) -> Vec<Action> {
        self.dispatched()
            .into_iter()
            .filter(|a| *a != Action::installer_ran())
            .collect()
    }
}

const BRINGUP_ORDER: [&str; 5] = [
    "store-create",
    "engine-create",
    "runBackgroundTasks",
    "readiness-signal",
    "installer-ran-dispatch",
];

#[test]
fn repeated_mounts_bring_up_once() {
    let harness = Harness::new();
    let host = SimulatedHost::new();
    let root = RootComposition::new(Arc::clone(&harness.sequencer), Arc::new(host.clone()));

    let first = root.mount().unwrap();
    let first_store = first.context().store().clone();
    first.unmount();

    for _ in 0..5 {
        let mounted = root.mount().unwrap();
        assert!(mounted.context().store().same_store(&first_store));
        mounted.unmount();
    }
    harness.sequencer.ensure_app_ready().unwrap();

    assert_eq!(harness.store_creations.load(Ordering::SeqCst), 1);
    assert_eq!(harness.engine_creations.load(Ordering::SeqCst), 1);
    assert_eq!(harness.log(), BRINGUP_ORDER);
    assert_eq!(host.listener_count(EventSource::AppState), 0);
}

#[test]
fn concrete_scenario() {
    let harness = Harness::new();
    let host = SimulatedHost::new();
    host.set_color_scheme(ColorScheme::Dark);
    let root = RootComposition::new(Arc::clone(&harness.sequencer), Arc::new(host.clone()));

    let mounted = root.mount().unwrap();
    assert_eq!(harness.log(), BRINGUP_ORDER);
    assert_eq!(harness.dispatched(), vec![Action::installer_ran()]);

    host.emit_app_state(AppStatus::from_native("active"));
    host.emit_appearance_change();
    host.emit_url("x://y");

    assert_eq!(
        harness.dispatched_after_bringup(),
        vec![
            Action::mobile_app_state_changed(AppStatus::Active),
            Action::set_system_dark_mode(true),
            Action::set_system_dark_mode(true),
            Action::link_received("x://y"),
        ]
    );

    mounted.unmount();
    host.emit_appearance_change();
    host.emit_app_state(AppStatus::Background);
    host.emit_url("x://z");

    assert_eq!(harness.dispatched_after_bringup().len(), 4);
}

#[test]
fn app_state_sequence_is_filtered() {
    let harness = Harness::new();
    let host = SimulatedHost::new();
    host.set_color_scheme(ColorScheme::Light);
    let root = RootComposition::new(Arc::clone(&harness.sequencer), Arc::new(host.clone()));
    let _mounted = root.mount().unwrap();

    for state in ["unknown", "active", "background", "extension", "active"] {
        host.emit_app_state(AppStatus::from_native(state));
    }

    assert_eq!(
        harness.dispatched_after_bringup(),
        vec![
            Action::mobile_app_state_changed(AppStatus::Active),
            Action::set_system_dark_mode(false),
            Action::mobile_app_state_changed(AppStatus::Background),
            Action::mobile_app_state_changed(AppStatus::Active),
            Action::set_system_dark_mode(false),
        ]
    );
}

#[test]
fn theme_change_is_gated_on_active() {
    let harness = Harness::new();
    let host = SimulatedHost::new();
    host.set_color_scheme(ColorScheme::Dark);
    let root = RootComposition::new(Arc::clone(&harness.sequencer), Arc::new(host.clone()));
    let _mounted = root.mount().unwrap();

    host.emit_app_state(AppStatus::Background);
    host.emit_appearance_change();
    assert_eq!(
        harness.dispatched_after_bringup(),
        vec![Action::mobile_app_state_changed(AppStatus::Background)]
    );

    host.emit_app_state(AppStatus::Active);
    let before = harness.dispatched_after_bringup().len();
    host.emit_appearance_change();
    let after = harness.dispatched_after_bringup();
    assert_eq!(after.len(), before + 1);
    assert_eq!(after.last(), Some(&Action::set_system_dark_mode(true)));
}

#[test]
fn deep_link_forwarded_in_any_state() {
    for state in [None, Some(AppStatus::Background), Some(AppStatus::Active)] {
        let harness = Harness::new();
        let host = SimulatedHost::new();
        let root = RootComposition::new(Arc::clone(&harness.sequencer), Arc::new(host.clone()));
        let _mounted = root.mount().unwrap();
        if let Some(state) = state {
            host.emit_app_state(state);
        }

        host.emit_url("keybase://user/alice");

        let links: Vec<Action> = harness
            .dispatched()
            .into_iter()
            .filter(|a| matches!(a, Action::Link { .. }))
            .collect();
        assert_eq!(links, vec![Action::link_received("keybase://user/alice")]);
    }
}

#[test]
fn remount_starts_from_unknown() {
    let harness = Harness::new();
    let host = SimulatedHost::new();
    host.set_color_scheme(ColorScheme::Dark);
    let root = RootComposition::new(Arc::clone(&harness.sequencer), Arc::new(host.clone()));

    let mounted = root.mount().unwrap();
    host.emit_app_state(AppStatus::Active);
    mounted.unmount();

    let remounted = root.mount().unwrap();
    assert_eq!(remounted.bridge().app_state(), AppStatus::Unknown);
    let before = harness.dispatched().len();
    host.emit_appearance_change();
    assert_eq!(harness.dispatched().len(), before);
}

#[test]
fn concurrent_first_mounts_share_one_store() {
    let harness = Harness::new();
    let host = SimulatedHost::new();
    let root = RootComposition::new(Arc::clone(&harness.sequencer), Arc::new(host.clone()));
    let barrier = Arc::new(Barrier::new(8));

    let stores: Vec<_> = (0..8)
        .map(|_| {
            let root = root.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mounted = root.mount().unwrap();
                let store = mounted.context().store().clone();
                mounted.unmount();
                store
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();

    assert!(stores.iter().all(|s| s.same_store(&stores[0])));
    assert_eq!(harness.store_creations.load(Ordering::SeqCst), 1);
    assert_eq!(harness.log(), BRINGUP_ORDER);
    assert_eq!(host.listener_count(EventSource::Url), 0);
}

#[test]
fn store_failure_blocks_every_mount() {
    let sequencer = Arc::new(BringupSequencer::new(
        || -> Result<Arc<dyn AppStore>> { Err(LifecycleError::StoreCreation("disk full".into())) },
        |_: Dispatcher| -> Result<Box<dyn Engine>> { unreachable!("engine must not be built") },
    ));
    let host = SimulatedHost::new();
    let root = RootComposition::new(sequencer, Arc::new(host.clone()));

    assert!(matches!(root.mount(), Err(LifecycleError::StoreCreation(_))));
    assert!(matches!(root.mount(), Err(LifecycleError::BringupFailed(_))));
    assert_eq!(host.listener_count(EventSource::AppState), 0);
}

#[test]
fn refused_registration_fails_mount_but_keeps_store() {
    let harness = Harness::new();
    let host = SimulatedHost::new();
    host.refuse_registrations(EventSource::Appearance);
    let root = RootComposition::new(Arc::clone(&harness.sequencer), Arc::new(host.clone()));

    let err = root.mount().unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::Subscription {
            event_source: EventSource::Appearance,
            ..
        }
    ));
    assert!(harness.sequencer.is_ready());
    assert_eq!(host.listener_count(EventSource::AppState), 0);

    host.allow_registrations(EventSource::Appearance);
    let mounted = root.mount().unwrap();
    assert!(mounted.bridge().is_mounted());
    assert_eq!(harness.store_creations.load(Ordering::SeqCst), 1);
}

#[test]
fn engine_factory_may_reenter_bringup() {
    let seen: Arc<Mutex<Option<native_lifecycle::store::GlobalStoreHandle>>> = Arc::default();
    let sequencer: Arc<OnceLock<Arc<BringupSequencer>>> = Arc::default();

    let (seen_e, seq_e) = (Arc::clone(&seen), Arc::clone(&sequencer));
    let built = Arc::new(BringupSequencer::new(
        || -> Result<Arc<dyn AppStore>> {
            Ok(Arc::new(native_lifecycle::store::JournalStore::new()))
        },
        move |d: Dispatcher| -> Result<Box<dyn Engine>> {
            if let Some(seq) = seq_e.get() {
                *seen_e.lock().unwrap() = Some(seq.ensure_app_ready()?);
            }
            Ok(Box::new(native_lifecycle::engine::GatedEngine::new(d)))
        },
    ));
    let _ = sequencer.set(Arc::clone(&built));

    let store = built.ensure_app_ready().unwrap();
    let inner = seen.lock().unwrap().clone().expect("engine factory re-entered");
    assert!(inner.same_store(&store));
}
