//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::routing::naming::normalize_prefix;

/// Root configuration for the mock server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MockServerConfig {
    /// Root directory scanned for `.json` mocks.
    pub mock_dir: PathBuf,

    /// URL prefix prepended to every route (e.g. "/api").
    pub prefix: String,

    /// Middleware gate, read once when the middleware is built.
    pub enable: bool,

    /// Rebuild routes when mock files change.
    pub watch: bool,

    /// Standalone server bind host.
    pub host: String,

    /// Standalone server port.
    pub port: u16,

    /// Keep loaded mocks in memory until the next reload.
    pub cache: bool,

    /// Permissive CORS headers on the standalone server.
    pub cors: bool,

    /// Maximum request body size read into the render context, in bytes.
    pub max_body_size: usize,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for MockServerConfig {
    fn default() -> Self {
        Self {
            mock_dir: PathBuf::from("./mocks"),
            prefix: String::new(),
            enable: true,
            watch: false,
            host: "127.0.0.1".to_string(),
            port: 3000,
            cache: false,
            cors: true,
            max_body_size: 2 * 1024 * 1024, // 2MB
            observability: ObservabilityConfig::default(),
        }
    }
}

impl MockServerConfig {
    /// Prefix with a leading `/` and no trailing `/`.
    pub fn normalized_prefix(&self) -> String {
        normalize_prefix(&self.prefix)
    }

    /// `host:port` for display.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Prometheus endpoint bind address; metrics are not exported when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}
