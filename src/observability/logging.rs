//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level at runtime
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - Log level configurable via config and environment (`RUST_LOG` wins at startup)

use tracing_subscriber::{
    filter::ParseError, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
    util::TryInitError, EnvFilter, Registry,
};

use crate::config::{LogFormat, ObservabilityConfig};

/// Error type for logging setup.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    #[error("failed to install log subscriber: {0}")]
    Init(#[from] TryInitError),
    #[error("failed to reload log filter: {0}")]
    Reload(#[from] reload::Error),
}

/// Handle to the installed filter, used to change the level without restarting.
#[derive(Debug, Clone)]
pub struct LogLevelHandle {
    handle: reload::Handle<EnvFilter, Registry>,
}

impl LogLevelHandle {
    pub fn new(handle: reload::Handle<EnvFilter, Registry>) -> Self {
        Self { handle }
    }

    /// Directives of the filter currently in effect.
    pub fn current(&self) -> Result<String, LoggingError> {
        Ok(self.handle.with_current(|filter| filter.to_string())?)
    }

    /// Replace the active filter with the given directives.
    pub fn set_level(&self, directives: &str) -> Result<(), LoggingError> {
        let filter = EnvFilter::try_new(directives)?;
        self.handle.reload(filter)?;
        Ok(())
    }
}

/// Install the global subscriber described by `config`.
pub fn init(config: &ObservabilityConfig) -> Result<LogLevelHandle, LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)?,
    };
    let (filter, handle) = reload::Layer::new(filter);

    let (json, pretty) = match config.log_format {
        LogFormat::Json => (Some(fmt::layer().json()), None),
        LogFormat::Pretty => (None, Some(fmt::layer())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .try_init()?;

    Ok(LogLevelHandle { handle })
}
