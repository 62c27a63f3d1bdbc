//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → dispatcher.rs (match against the active RouteIndex snapshot)
//!     → no match: server.rs answers 404 / middleware.rs calls next
//!     → match: request.rs (query, body) → MockDataLoader → TemplateEngine
//!     → delay, then response.rs (status + JSON body)
//! ```

pub mod dispatcher;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use dispatcher::{Dispatch, RequestDispatcher, ResolvedRoute};
pub use middleware::{mock_middleware, MockLayerState};
pub use request::{parse_query, MockRequest};
pub use response::MockResponse;
pub use server::{build_router, MockServer, ServerError};
