//! Structured progress events and sinks.
//!
//! The ingestion pipeline reports cache hits and fetches as
//! [`TelemetryEvent`]s. The CLI either drops them or writes them to stderr
//! as JSON lines, keeping stdout free for the reports.

use std::io;

use serde::Serialize;

use crate::cache::ResourceKind;

/// A structured telemetry event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// No token was configured; requests go out unauthenticated.
    Unauthenticated,
    /// A cached blob satisfied the request.
    CacheHit {
        /// Resource kind of the blob.
        kind: ResourceKind,
        /// Repository name, commit SHA or login.
        identifier: String,
    },
    /// A resource was fetched from GitHub and written to the cache.
    Fetched {
        /// Resource kind of the blob.
        kind: ResourceKind,
        /// Repository name, commit SHA or login.
        identifier: String,
        /// Number of records for collections, 1 for single records.
        records: usize,
    },
    /// A pipeline stage finished.
    StageCompleted {
        /// Resource kind the stage handled.
        kind: ResourceKind,
        /// Cache hits during the stage.
        hits: usize,
        /// Fetches during the stage.
        fetched: usize,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Sink that keeps events in memory, for assertions in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    events: std::sync::Mutex<Vec<TelemetryEvent>>,
}

#[cfg(test)]
impl RecordingSink {
    pub(crate) fn take(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .expect("events mutex should be available")
            .drain(..)
            .collect()
    }
}

#[cfg(test)]
impl TelemetrySink for RecordingSink {
    fn record(&self, event: TelemetryEvent) {
        self.events
            .lock()
            .expect("events mutex should be available")
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordingSink, TelemetryEvent, TelemetrySink};
    use crate::cache::ResourceKind;

    #[test]
    fn recording_sink_captures_events() {
        let sink = RecordingSink::default();
        sink.record(TelemetryEvent::Unauthenticated);

        assert_eq!(sink.take(), vec![TelemetryEvent::Unauthenticated]);
        assert!(sink.take().is_empty(), "take should drain events");
    }

    #[test]
    fn events_serialise_with_type_tag() {
        let event = TelemetryEvent::Fetched {
            kind: ResourceKind::CommitDetail,
            identifier: "abc123".to_owned(),
            records: 1,
        };

        let serialised = serde_json::to_string(&event).expect("event should serialise");
        assert_eq!(
            serialised,
            r#"{"type":"fetched","kind":"commit_detail","identifier":"abc123","records":1}"#
        );
    }
}
