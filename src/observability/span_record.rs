//! JSON-lines span records.
//!
//! Each exported span becomes one flat JSON object. Flat lines are easy to
//! `grep` and `jq` on a device dump, which is what the trace file is for.
//!
//! ```json
//! {"service":"native-lifecycle","trace_id":"…","span_id":"…","name":"bringup",
//!  "started_at":"2026-01-01T00:00:00.000000Z","duration_us":412,
//!  "attributes":{"event_type":"UrlOpened(\"x://y\")"},"status":"ok"}
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use opentelemetry::trace::{SpanId, Status};
use opentelemetry_sdk::export::trace::SpanData;
use serde::Serialize;
use std::collections::BTreeMap;

/// One exported span.
#[derive(Debug, Serialize)]
pub struct SpanRecord<'a> {
    service: &'a str,
    trace_id: String,
    span_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_span_id: Option<String>,
    name: &'a str,
    started_at: String,
    duration_us: u64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> SpanRecord<'a> {
    /// Builds the record for `span`.
    pub fn new(service: &'a str, span: &'a SpanData) -> Self {
        let (status, error) = match &span.status {
            Status::Unset => ("unset", None),
            Status::Ok => ("ok", None),
            Status::Error { description } => ("error", Some(description.to_string())),
        };
        let duration = span
            .end_time
            .duration_since(span.start_time)
            .unwrap_or_default();

        Self {
            service,
            trace_id: format!("{:032x}", span.span_context.trace_id()),
            span_id: format!("{:016x}", span.span_context.span_id()),
            parent_span_id: (span.parent_span_id != SpanId::INVALID)
                .then(|| format!("{:016x}", span.parent_span_id)),
            name: &span.name,
            started_at: DateTime::<Utc>::from(span.start_time)
                .to_rfc3339_opts(SecondsFormat::Micros, true),
            duration_us: u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
            attributes: span
                .attributes
                .iter()
                .map(|kv| (kv.key.to_string(), kv.value.as_str().into_owned()))
                .collect(),
            status,
            error,
        }
    }

    /// Serializes to a single JSON line.
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
