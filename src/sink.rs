// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The logging seam.
//!
//! The interceptor emits [`LogRecord`]s through a [`LogSink`] and never
//! touches a logging backend directly. [`TracingSink`] is the production
//! implementation; [`CaptureSink`] buffers records in memory for tests and
//! for hosts that want to inspect the stream programmatically.

use std::sync::Mutex;

use crate::policy::LogLevel;
use crate::record::LogRecord;

/// Destination for instrumentation records.
///
/// Writes are fire-and-forget from the interceptor's perspective; a sink
/// must not fail the call it is observing.
pub trait LogSink: Send + Sync {
    /// Emit one record.
    fn emit(&self, record: &LogRecord);
}

/// Sink that forwards records to the `tracing` macros at the record's
/// level, with the correlation id, method, and event kind as fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for TracingSink {
    fn emit(&self, record: &LogRecord) {
        // The tracing macros need a const level, hence the match.
        match record.level {
            LogLevel::Trace => tracing::trace!(
                correlation = %record.correlation,
                method = %record.method,
                event = record.event.kind(),
                "{record}"
            ),
            LogLevel::Debug => tracing::debug!(
                correlation = %record.correlation,
                method = %record.method,
                event = record.event.kind(),
                "{record}"
            ),
            LogLevel::Info => tracing::info!(
                correlation = %record.correlation,
                method = %record.method,
                event = record.event.kind(),
                "{record}"
            ),
            LogLevel::Warn => tracing::warn!(
                correlation = %record.correlation,
                method = %record.method,
                event = record.event.kind(),
                "{record}"
            ),
            LogLevel::Error => tracing::error!(
                correlation = %record.correlation,
                method = %record.method,
                event = record.event.kind(),
                "{record}"
            ),
        }
    }
}

/// In-memory sink that keeps every record it receives.
#[derive(Debug, Default)]
pub struct CaptureSink {
    records: Mutex<Vec<LogRecord>>,
}

impl CaptureSink {
    /// Create an empty capture sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records emitted so far, in order.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Number of records emitted so far.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// True if nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard all buffered records.
    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }
}

impl LogSink for CaptureSink {
    fn emit(&self, record: &LogRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}
