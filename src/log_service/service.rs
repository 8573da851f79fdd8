//! The logging facade used by request handlers.

use std::fmt;
use std::sync::Arc;
use tracing::Level;

use crate::log_service::sink::{LogSink, TracingSink};
use crate::observability::metrics;

/// Single point of indirection over the application log sink.
///
/// Every call to [`record`](Self::record) appends exactly one
/// informational line; nothing is deduplicated or buffered here.
#[derive(Clone)]
pub struct LogService {
    sink: Arc<dyn LogSink>,
}

impl LogService {
    /// Create a facade writing to the given sink.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Write `message` at informational severity.
    pub fn record(&self, message: &str) {
        self.sink.write_line(Level::INFO, message);
        metrics::record_message();
    }
}

impl Default for LogService {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl fmt::Debug for LogService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_service::sink::{LogEntry, MemorySink};

    #[test]
    fn test_record_writes_one_info_entry() {
        let sink = Arc::new(MemorySink::new());
        let service = LogService::new(sink.clone());

        service.record("Hello");

        assert_eq!(
            sink.entries(),
            vec![LogEntry { level: Level::INFO, text: "Hello".into() }]
        );
    }

    #[test]
    fn test_record_is_not_deduplicated() {
        let sink = Arc::new(MemorySink::new());
        let service = LogService::new(sink.clone());

        service.record("X");
        service.record("X");
        service.record("");

        let texts: Vec<_> = sink.entries().into_iter().map(|e| e.text).collect();
        assert_eq!(texts, vec!["X", "X", ""]);
    }

    #[test]
    fn test_clones_share_the_sink() {
        let sink = Arc::new(MemorySink::new());
        let service = LogService::new(sink.clone());
        let other = service.clone();

        service.record("a");
        other.record("b");

        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_concurrent_writers_lose_nothing() {
        let sink = Arc::new(MemorySink::new());
        let service = LogService::new(sink.clone());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let service = service.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        service.record(&format!("{t}-{i}"));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(sink.len(), 800);
    }
}
