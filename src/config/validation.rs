//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port, body limit)
//! - Check addresses parse before anything binds
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MockServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::MockServerConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("port must be between 1 and 65535")]
    InvalidPort,
    #[error("mock_dir must not be empty")]
    EmptyMockDir,
    #[error("host must not be empty")]
    EmptyHost,
    #[error("max_body_size must be greater than zero")]
    ZeroBodyLimit,
    #[error("metrics_address is not a socket address: {0}")]
    InvalidMetricsAddress(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &MockServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }
    if config.mock_dir.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyMockDir);
    }
    if config.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }
    if config.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidMetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&MockServerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = MockServerConfig::default();
        config.port = 0;
        config.mock_dir = PathBuf::new();
        config.max_body_size = 0;
        config.observability.metrics_address = Some("nowhere".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidPort,
                ValidationError::EmptyMockDir,
                ValidationError::ZeroBodyLimit,
                ValidationError::InvalidMetricsAddress("nowhere".to_string()),
            ]
        );
    }
}
