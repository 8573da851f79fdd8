//! Log sinks behind the facade.

use std::sync::{Mutex, MutexGuard};
use tracing::Level;

/// Tracing target under which recorded messages are emitted.
pub const LOG_TARGET: &str = "log_endpoint::log_service";

/// Destination for log lines written by [`LogService`](super::LogService).
///
/// Implementations must be safe to call from many request tasks at once.
pub trait LogSink: Send + Sync {
    /// Append a single line at the given severity.
    fn write_line(&self, level: Level, text: &str);
}

/// Sink that forwards every line to the process-wide `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&self, level: Level, text: &str) {
        // Callsite metadata is static, so each level needs its own macro arm.
        match level {
            Level::ERROR => tracing::error!(target: LOG_TARGET, "{}", text),
            Level::WARN => tracing::warn!(target: LOG_TARGET, "{}", text),
            Level::INFO => tracing::info!(target: LOG_TARGET, "{}", text),
            Level::DEBUG => tracing::debug!(target: LOG_TARGET, "{}", text),
            _ => tracing::trace!(target: LOG_TARGET, "{}", text),
        }
    }
}

/// A single line captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,
    pub text: String,
}

/// Append-only in-memory sink.
///
/// Useful for embedding the service in tests, where recorded
/// entries need to be inspected after requests complete.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far, in write order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Number of entries written so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        // A panicking writer cannot leave a half-pushed entry behind.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, level: Level, text: &str) {
        self.lock().push(LogEntry {
            level,
            text: text.to_string(),
        });
    }
}
