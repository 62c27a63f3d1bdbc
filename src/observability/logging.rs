//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config, overridable by `RUST_LOG`
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - One access log line per served mock (method, path, status, elapsed)

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for a level, e.g. `api_mocker=info,tower_http=info`.
pub fn default_directive(level: &str) -> String {
    format!("api_mocker={level},tower_http={level}")
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Calling this twice is harmless;
/// the second installation is ignored.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive(level).into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive("debug"), "api_mocker=debug,tower_http=debug");
    }

    #[test]
    fn test_init_twice() {
        init_logging("warn");
        init_logging("warn");
    }
}
