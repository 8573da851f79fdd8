//! Logging facade subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → service.rs (LogService::record, informational severity)
//!     → sink.rs (LogSink: tracing subscriber or in-memory buffer)
//! ```
//!
//! # Design Decisions
//! - The sink is injected at construction; there is no global logger handle
//! - `record` never fails from the caller's point of view
//! - Ordering across concurrent writers is whatever the sink provides

pub mod service;
pub mod sink;

pub use service::LogService;
pub use sink::{LogEntry, LogSink, MemorySink, TracingSink, LOG_TARGET};
