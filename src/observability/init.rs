//! Tracing initialization and subscriber setup.
//!
//! Wires `tracing` macros through `tracing-opentelemetry` into the file
//! exporter, filtered by the configured level.

use super::file_writer::RotationPolicy;
use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name recorded on every span.
pub const SERVICE_NAME: &str = "native-lifecycle";

/// File name of the span log inside the trace directory.
pub const TRACE_FILE_NAME: &str = "native-lifecycle-spans.jsonl";

/// Installs the global tracing subscriber.
///
/// # Level Resolution
///
/// 1. `RUST_LOG`, if set and valid
/// 2. `config.trace_level`
/// 3. `"info"`
///
/// # Initialization Behavior
///
/// - Creates the trace directory if missing
/// - Silently does nothing if that fails (tracing is optional)
/// - Only the first call in a process takes effect
///
/// # Example
///
/// ```rust,no_run
/// use native_lifecycle::observability::init_tracing;
/// use native_lifecycle::Config;
///
/// init_tracing(&Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// });
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let trace_dir = config.trace_dir();
    if std::fs::create_dir_all(&trace_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new(
        "service.name",
        SERVICE_NAME,
    )]);
    let policy = RotationPolicy {
        max_bytes: config.trace_max_bytes,
        backups: config.trace_backups,
    };
    let provider = tracer::create_tracer_provider(
        trace_dir.join(TRACE_FILE_NAME),
        policy,
        SERVICE_NAME,
        resource,
    );

    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init();
}
