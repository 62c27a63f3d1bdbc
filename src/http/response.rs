//! Response construction.
//!
//! # Responsibilities
//! - Carry a rendered mock (status + JSON body) to the HTTP layer
//! - Build structured error bodies for load failures and unmatched routes
//!
//! # Design Decisions
//! - Every response body is JSON
//! - Load failures become 500s; they never escape the request

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::mock::LoadError;
use crate::routing::RouteIndex;

/// Outcome of serving one matched mock.
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl MockResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// 500 with `{error, message}` for a mock that failed to load.
    pub fn load_failure(err: &LoadError) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "error": "Failed to load mock data",
                "message": err.to_string(),
            }),
        )
    }
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// 404 listing every available route, used by the standalone server.
pub fn not_found(method: &str, path: &str, routes: &RouteIndex) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": format!("Route {} {} not found", method, path),
            "availableRoutes": routes.labels(),
        })),
    )
        .into_response()
}
