//! OpenTelemetry tracer provider exporting to a rotating local file.
//!
//! Mobile builds have no collector to talk to, so spans are written as JSON
//! lines next to the app's data and pulled off the device when needed.

use super::file_writer::{FileWriter, RotationPolicy};
use super::span_record::SpanRecord;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Span exporter writing one [`SpanRecord`] line per span.
struct FileSpanExporter {
    writer: FileWriter,
    service: String,
    is_shutdown: AtomicBool,
}

impl FileSpanExporter {
    fn new(file_path: PathBuf, policy: RotationPolicy, service: String) -> Self {
        Self {
            writer: FileWriter::new(file_path, policy),
            service,
            is_shutdown: AtomicBool::new(false),
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> Result<(), TraceError> {
        for span in batch {
            let line = SpanRecord::new(&self.service, span)
                .to_line()
                .map_err(|e| TraceError::from(e.to_string()))?;
            self.writer
                .write_line(&line)
                .map_err(|e| TraceError::from(e.to_string()))?;
        }
        Ok(())
    }
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        if self.is_shutdown.load(Ordering::SeqCst) {
            return Box::pin(std::future::ready(Err(TraceError::from(
                "exporter is shut down",
            ))));
        }
        let result = self.write_batch(&batch);
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }

    fn set_resource(&mut self, res: &Resource) {
        let _ = res;
    }
}

impl std::fmt::Debug for FileSpanExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSpanExporter")
            .field("writer", &self.writer)
            .field("service", &self.service)
            .field("is_shutdown", &self.is_shutdown)
            .finish()
    }
}

/// Creates a tracer provider that exports every span to `file_path`.
///
/// Uses the simple (immediate, unbatched) export strategy so nothing is lost
/// if the process is killed by the OS while backgrounded.
pub fn create_tracer_provider(
    file_path: PathBuf,
    policy: RotationPolicy,
    service: &str,
    resource: Resource,
) -> TracerProvider {
    let exporter = FileSpanExporter::new(file_path, policy, service.to_string());

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
