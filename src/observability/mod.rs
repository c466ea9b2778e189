//! OpenTelemetry-based observability with file-based span export.
//!
//! ```text
//! tracing → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → JSON lines
//! ```
//!
//! - **File-Based Export**: spans land in `<trace_dir>/native-lifecycle-spans.jsonl`
//! - **Rotation**: size-based, with a bounded number of timestamped backups
//! - **Format**: one flat JSON object per span ([`span_record`])
//!
//! # Configuration
//!
//! Level comes from `RUST_LOG`, then `trace_level`, then `"info"`. Directory
//! and rotation limits come from [`Config`](crate::Config).
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`tracer`]: Tracer provider with the file exporter
//! - [`span_record`]: Span serialization
//! - [`file_writer`]: Rotating line writer

pub mod file_writer;
pub mod init;
pub mod span_record;
mod tracer;

pub use file_writer::{FileWriter, RotationPolicy};
pub use init::{init_tracing, SERVICE_NAME, TRACE_FILE_NAME};
