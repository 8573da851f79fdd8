//! Log endpoint library.
//!
//! An HTTP service that records the `message` query parameter to the
//! application log and echoes a confirmation back to the caller.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod log_service;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use log_service::{LogService, LogSink, MemorySink, TracingSink};
