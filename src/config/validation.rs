//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect conflicting routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), ValidationErrors>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use tokio::sync::Semaphore;
use tracing_subscriber::EnvFilter;

use crate::config::schema::AppConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },
    #[error("{field}: must be greater than zero")]
    Zero { field: &'static str },
    #[error("{field}: must be at most {max}")]
    TooLarge { field: &'static str, max: usize },
    #[error("{field}: route path {value:?} must start with '/' and contain no wildcards")]
    InvalidPath { field: &'static str, value: String },
    #[error("http.log_path and http.health_path are both {0:?}")]
    PathConflict(String),
    #[error("observability.log_level: {0}")]
    InvalidLogLevel(String),
}

/// Every problem found in one configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &AppConfig) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    let max_requests = config.listener.max_concurrent_requests;
    if max_requests == 0 {
        errors.push(ValidationError::Zero { field: "listener.max_concurrent_requests" });
    } else if max_requests > Semaphore::MAX_PERMITS {
        errors.push(ValidationError::TooLarge {
            field: "listener.max_concurrent_requests",
            max: Semaphore::MAX_PERMITS,
        });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.request_secs" });
    }

    check_path(&mut errors, "http.log_path", &config.http.log_path);
    check_path(&mut errors, "http.health_path", &config.http.health_path);
    if config.http.log_path == config.http.health_path {
        errors.push(ValidationError::PathConflict(config.http.log_path.clone()));
    }

    if let Err(e) = EnvFilter::try_new(&config.observability.log_level) {
        errors.push(ValidationError::InvalidLogLevel(e.to_string()));
    }
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress { field, value: value.to_string() });
    }
}

fn check_path(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    // axum treats `{..}` segments as captures; a fixed route must not contain them.
    let valid = value.starts_with('/') && !value.contains('{') && !value.contains('}');
    if !valid {
        errors.push(ValidationError::InvalidPath { field, value: value.to_string() });
    }
}
