//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional) + CLI flags
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → MockServerConfig (validated, immutable)
//!
//! While running with `watch`:
//!     watcher.rs detects a .json create/modify/remove under mock_dir
//!     → dispatcher rebuilds the RouteIndex
//!     → atomic swap of Arc<RouteIndex>
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{MockServerConfig, ObservabilityConfig};
pub use validation::{validate_config, ValidationError};
pub use watcher::MockDirWatcher;
