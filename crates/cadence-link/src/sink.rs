//! Logging sinks accepting `(timestamp_ms, message)` records.
//!
//! Sinks are invoked by callers such as [`LoggingHandler`](crate::LoggingHandler)
//! or a command loop, never by the scheduler itself.

use tracing::info;

/// Destination for timestamped log records.
pub trait LogSink {
    /// Record `message` observed at `timestamp_ms` (Unix milliseconds).
    fn record(&mut self, timestamp_ms: i64, message: &str);
}

/// Emits each record as a `tracing` info event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn record(&mut self, timestamp_ms: i64, message: &str) {
        info!(timestamp_ms, "{message} at {timestamp_ms} ms");
    }
}

/// Collects records in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<(i64, String)>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in arrival order.
    pub fn records(&self) -> &[(i64, String)] {
        &self.records
    }

    /// Consume the sink, returning its records.
    pub fn into_records(self) -> Vec<(i64, String)> {
        self.records
    }
}

impl LogSink for MemorySink {
    fn record(&mut self, timestamp_ms: i64, message: &str) {
        self.records.push((timestamp_ms, message.to_owned()));
    }
}

impl<S: LogSink + ?Sized> LogSink for &mut S {
    fn record(&mut self, timestamp_ms: i64, message: &str) {
        (**self).record(timestamp_ms, message);
    }
}
