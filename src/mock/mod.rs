//! Mock data subsystem.
//!
//! # Data Flow
//! ```text
//! matched RouteDescriptor.source_file
//!     → cache.rs (shared spec, or fresh read when caching is off)
//!     → loader.rs (read, parse JSON, split `$config` from body)
//!     → MockSpec { body template, status, delay }
//! ```
//!
//! # Design Decisions
//! - Load failures are per request; they never touch the route index
//! - Specs are immutable after loading

pub mod cache;
pub mod loader;

pub use cache::MockCache;
pub use loader::{load_mock_spec, LoadError, MockConfig, MockSpec, RESERVED_CONFIG_KEY};
