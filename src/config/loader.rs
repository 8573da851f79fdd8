//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationErrors};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = parse_config(
            r#"
            [http]
            log_path = "/api/log"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.http.log_path, "/api/log");
        assert_eq!(config.http.health_path, "/health");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_syntax_error_is_parse_error() {
        let err = parse_config("[listener\nbind_address = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_log_format_is_parse_error() {
        let err = parse_config("[observability]\nlog_format = \"xml\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_semantic_error_is_validation_error() {
        let err = parse_config("[timeouts]\nrequest_secs = 0").unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.0.len(), 1),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_oversized_concurrency_limit_is_rejected() {
        let err = parse_config("[listener]\nmax_concurrent_requests = 9223372036854775807")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/log-endpoint.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
