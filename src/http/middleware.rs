//! Embeddable mock middleware.
//!
//! Serves matching requests from the mock directory and passes everything
//! else to the next handler:
//!
//! ```ignore
//! let state = MockLayerState::new(&config)?;
//! let app = Router::new()
//!     .route("/health", get(health))
//!     .layer(axum::middleware::from_fn_with_state(state, mock_middleware));
//! ```

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::MockServerConfig;
use crate::http::dispatcher::{Dispatch, RequestDispatcher};
use crate::routing::BuildError;

/// State for [`mock_middleware`].
///
/// `enable` is read once here; a disabled state never touches the disk.
#[derive(Debug, Clone)]
pub struct MockLayerState {
    dispatcher: Option<Arc<RequestDispatcher>>,
    body_limit: usize,
}

impl MockLayerState {
    pub fn new(config: &MockServerConfig) -> Result<Self, BuildError> {
        if !config.enable {
            tracing::info!("Mock middleware disabled");
            return Ok(Self::disabled());
        }

        let dispatcher = Arc::new(RequestDispatcher::new(config)?);
        Ok(Self::from_dispatcher(dispatcher, config.max_body_size))
    }

    pub fn from_dispatcher(dispatcher: Arc<RequestDispatcher>, body_limit: usize) -> Self {
        Self {
            dispatcher: Some(dispatcher),
            body_limit,
        }
    }

    pub fn disabled() -> Self {
        Self {
            dispatcher: None,
            body_limit: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.dispatcher.is_some()
    }

    pub fn dispatcher(&self) -> Option<&Arc<RequestDispatcher>> {
        self.dispatcher.as_ref()
    }

    /// Start reloading on mock file changes. No-op when disabled.
    pub fn watch(
        &self,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<Option<JoinHandle<()>>, notify::Error> {
        self.dispatcher
            .as_ref()
            .map(|dispatcher| dispatcher.watch(shutdown))
            .transpose()
    }
}

pub async fn mock_middleware(
    State(state): State<MockLayerState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(dispatcher) = state.dispatcher.as_ref() else {
        return next.run(req).await;
    };

    match dispatcher.dispatch(req, state.body_limit).await {
        Dispatch::Served(response) => response,
        Dispatch::Unmatched(req) => next.run(req).await,
    }
}
