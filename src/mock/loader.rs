//! Mock file loading.
//!
//! A mock file is plain JSON. When its top level is an object holding the
//! reserved `$config` key, that key carries response metadata and the rest
//! of the object is the body template:
//!
//! ```json
//! { "$config": { "status": 201, "delay": 100 }, "ok": true }
//! ```
//!
//! Any other document is the body template verbatim.

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{Map, Value};

/// Top-level key holding response metadata.
pub const RESERVED_CONFIG_KEY: &str = "$config";

/// Error type for mock loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid $config in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigFieldError,
    },
    #[error("loading {} did not complete: {source}", path.display())]
    Interrupted {
        path: PathBuf,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// A recognized `$config` field holding an unusable value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigFieldError {
    #[error("status must be an integer between 100 and 999, got {0}")]
    Status(Value),
    #[error("delay must be a number of milliseconds, got {0}")]
    Delay(Value),
}

/// Response metadata from `$config`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockConfig {
    /// HTTP status, 200 when absent.
    pub status: Option<u16>,
    /// Delay in milliseconds, none when absent or not positive.
    pub delay_ms: Option<u64>,
    /// Keys other than `status` and `delay`, kept as written.
    pub extra: Map<String, Value>,
}

impl MockConfig {
    /// Parse a `$config` value. Non-object values count as an empty config.
    pub fn from_value(value: Value) -> Result<Self, ConfigFieldError> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                tracing::warn!(value = %other, "Ignoring non-object {}", RESERVED_CONFIG_KEY);
                return Ok(Self::default());
            }
        };

        let status = match map.shift_remove("status") {
            None | Some(Value::Null) => None,
            Some(v) => match v.as_u64() {
                // Zero falls back to the default like an absent status.
                Some(0) => None,
                Some(code @ 100..=999) => Some(code as u16),
                _ => return Err(ConfigFieldError::Status(v)),
            },
        };

        let delay_ms = match map.shift_remove("delay") {
            None | Some(Value::Null) => None,
            Some(v) => match v.as_f64() {
                Some(ms) if ms > 0.0 => Some(ms.ceil() as u64),
                Some(_) => None,
                None => return Err(ConfigFieldError::Delay(v)),
            },
        };

        Ok(Self {
            status,
            delay_ms,
            extra: map,
        })
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::OK)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms.unwrap_or(0))
    }
}

/// A loaded mock: unrendered body template plus metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct MockSpec {
    pub body: Value,
    pub config: MockConfig,
}

impl MockSpec {
    /// Separate the reserved config key from the body template.
    pub fn from_value(value: Value) -> Result<Self, ConfigFieldError> {
        match value {
            Value::Object(mut map) if map.contains_key(RESERVED_CONFIG_KEY) => {
                let raw = map.shift_remove(RESERVED_CONFIG_KEY).unwrap_or(Value::Null);
                Ok(Self {
                    body: Value::Object(map),
                    config: MockConfig::from_value(raw)?,
                })
            }
            body => Ok(Self {
                body,
                config: MockConfig::default(),
            }),
        }
    }
}

/// Read and parse one mock file.
pub fn load_mock_spec(path: &Path) -> Result<MockSpec, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    MockSpec::from_value(value).map_err(|source| LoadError::Config {
        path: path.to_path_buf(),
        source,
    })
}
