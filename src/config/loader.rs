//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::MockServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<MockServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: MockServerConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn scratch_toml(content: &str) -> NamedTempFile {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        fs::write(file.path(), content).unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = scratch_toml("port = 4000\nprefix = \"/api\"\ncache = true\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.prefix, "/api");
        assert!(config.cache);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let file = scratch_toml("port = 0\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e == &vec![ValidationError::InvalidPort]));
        assert_eq!(err.to_string(), "Validation failed: port must be between 1 and 65535");
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let file = scratch_toml("port = \"not a number\"\n");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }
}
