//! Demo shell: replays a native event script against the lifecycle root.
//!
//! Stands in for the platform glue. It builds a [`JournalStore`] whose sink
//! prints every processed action as a JSON line, a [`GatedEngine`], and a
//! [`SimulatedHost`], mounts the root once, then reads commands from stdin.
//!
//! # Usage
//!
//! ```text
//! native-lifecycle [config.toml] < script.txt
//! ```
//!
//! # Script Commands
//!
//! One command per line. Blank lines and lines starting with `#` are ignored.
//!
//! - `state <active|background|inactive|unknown|extension>`: app state change
//! - `theme`: system appearance change
//! - `scheme <dark|light>`: change what the color-scheme query answers
//! - `url <link>`: URL opened into the app
//! - `unmount`: unmount the root (listeners released)
//! - `mount`: mount the root again (no second bring-up)
//! - `snapshot`: print the debug registry contents
//!
//! # Output
//!
//! ```text
//! {"type":"config:installerRan"}
//! {"type":"config:mobileAppState","payload":{"nextAppState":"active"}}
//! {"type":"deeplinks:link","payload":{"link":"keybase://user/alice"}}
//! ```

#![allow(clippy::multiple_crate_versions)]

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use native_lifecycle::engine::{Engine, GatedEngine};
use native_lifecycle::host::{NativeHost, SimulatedHost};
use native_lifecycle::store::{AppStore, Dispatcher, JournalStore};
use native_lifecycle::{
    initialize, Action, AppStatus, ColorScheme, Config, LifecycleError, MountedRoot,
    RootComposition,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("native-lifecycle: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> native_lifecycle::Result<()> {
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    native_lifecycle::observability::init_tracing(&config);

    let span = tracing::info_span!("demo_shell");
    let _guard = span.entered();

    let host = SimulatedHost::new();
    let root = initialize(
        &config,
        || -> native_lifecycle::Result<Arc<dyn AppStore>> {
            Ok(Arc::new(JournalStore::new().with_sink(print_action)))
        },
        |dispatcher: Dispatcher| -> native_lifecycle::Result<Box<dyn Engine>> {
            Ok(Box::new(GatedEngine::new(dispatcher)))
        },
        Arc::new(host.clone()) as Arc<dyn NativeHost>,
    );

    let mut mounted = Some(root.mount()?);

    let stdin = io::stdin();
    for (index, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Err(e) = apply(line, &host, &root, &mut mounted) {
            tracing::warn!(line = index + 1, error = %e, "script command failed");
            eprintln!("line {}: {e}", index + 1);
        }
    }

    if let Some(mounted) = mounted.take() {
        mounted.unmount();
    }
    tracing::info!("script finished");
    Ok(())
}

fn apply(
    line: &str,
    host: &SimulatedHost,
    root: &RootComposition,
    mounted: &mut Option<MountedRoot>,
) -> native_lifecycle::Result<()> {
    let (command, argument) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(c, a)| (c, a.trim()));

    match command {
        "state" => host.emit_app_state(AppStatus::from_native(argument)),
        "theme" => host.emit_appearance_change(),
        "scheme" => host.set_color_scheme(ColorScheme::from_native(argument)),
        "url" if !argument.is_empty() => host.emit_url(argument),
        "unmount" => match mounted.take() {
            Some(root) => root.unmount(),
            None => return Err(LifecycleError::Config("root is not mounted".to_string())),
        },
        "mount" => {
            if mounted.is_some() {
                return Err(LifecycleError::Config("root is already mounted".to_string()));
            }
            *mounted = Some(root.mount()?);
        }
        "snapshot" => {
            let snapshot = root
                .sequencer()
                .debug_registry()
                .map_or(serde_json::Value::Null, |registry| registry.snapshot());
            write_line(&snapshot.to_string());
        }
        _ => {
            return Err(LifecycleError::Config(format!(
                "unrecognized script command: {line}"
            )))
        }
    }
    Ok(())
}

fn print_action(action: &Action) {
    match serde_json::to_string(action) {
        Ok(json) => write_line(&json),
        Err(e) => tracing::warn!(error = %e, "failed to serialize action"),
    }
}

fn write_line(line: &str) {
    let mut stdout = io::stdout().lock();
    if writeln!(stdout, "{line}").is_err() {
        tracing::debug!("stdout closed");
    }
}
