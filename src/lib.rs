//! File-based API mock server.
//!
//! Every `.json` file under a mock directory becomes a route; its content is
//! the response body template, optionally carrying a `$config` block with
//! status and delay.

// Core subsystems
pub mod config;
pub mod http;
pub mod mock;
pub mod routing;
pub mod template;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::MockServerConfig;
pub use http::{mock_middleware, MockLayerState, MockServer, RequestDispatcher};
pub use lifecycle::Shutdown;
pub use routing::RouteIndex;
