//! Standalone mock server.
//!
//! # Responsibilities
//! - Bind the listener (a bind failure is fatal)
//! - Serve every request through the dispatcher via a fallback handler
//! - Answer unmatched requests with 404 and the available routes
//! - Start the mock directory watcher when configured
//! - Stop gracefully on shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::MockServerConfig;
use crate::http::dispatcher::{Dispatch, RequestDispatcher};
use crate::http::response::not_found;
use crate::lifecycle::shutdown::{wait_for, Shutdown};
use crate::routing::{BuildError, RouteIndex};

/// Error type for server startup and serving.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
    #[error("failed to watch mock directory: {0}")]
    Watch(#[from] notify::Error),
    #[error("failed to build routes: {0}")]
    Routes(#[from] BuildError),
}

impl ServerError {
    /// Whether the bind failed because the port is taken.
    pub fn is_addr_in_use(&self) -> bool {
        matches!(
            self,
            ServerError::Bind { source, .. } if source.kind() == std::io::ErrorKind::AddrInUse
        )
    }
}

/// Application state injected into the fallback handler.
#[derive(Clone)]
struct AppState {
    dispatcher: Arc<RequestDispatcher>,
    body_limit: usize,
}

/// HTTP server answering every request from the mock directory.
pub struct MockServer {
    listener: TcpListener,
    config: MockServerConfig,
    dispatcher: Arc<RequestDispatcher>,
}

impl MockServer {
    /// Build the routes and bind `host:port`.
    pub async fn bind(config: MockServerConfig) -> Result<Self, ServerError> {
        let dispatcher = Arc::new(RequestDispatcher::new(&config)?);

        let addr = config.bind_address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Self {
            listener,
            config,
            dispatcher,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn dispatcher(&self) -> Arc<RequestDispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn routes(&self) -> Arc<RouteIndex> {
        self.dispatcher.routes()
    }

    pub fn reload(&self) -> Result<Arc<RouteIndex>, BuildError> {
        self.dispatcher.reload()
    }

    pub fn config(&self) -> &MockServerConfig {
        &self.config
    }

    /// The router the server runs, for driving without a socket.
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.dispatcher), &self.config)
    }

    /// Serve until `shutdown` fires.
    pub async fn run(self, shutdown: Shutdown) -> Result<(), ServerError> {
        let addr = self.listener.local_addr().map_err(ServerError::Serve)?;

        let watch_task = if self.config.watch {
            Some(self.dispatcher.watch(shutdown.subscribe())?)
        } else {
            None
        };

        let app = self.router();
        tracing::info!(address = %addr, routes = self.dispatcher.routes().len(), "Mock server starting");

        axum::serve(self.listener, app)
            .with_graceful_shutdown(wait_for(shutdown.subscribe()))
            .await
            .map_err(ServerError::Serve)?;

        if let Some(task) = watch_task {
            let _ = task.await;
        }

        tracing::info!("Mock server stopped");
        Ok(())
    }
}

/// Build the standalone router around `dispatcher`.
pub fn build_router(dispatcher: Arc<RequestDispatcher>, config: &MockServerConfig) -> Router {
    let state = AppState {
        dispatcher,
        body_limit: config.max_body_size,
    };

    let router = Router::new()
        .fallback(mock_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn mock_handler(State(state): State<AppState>, req: Request<Body>) -> Response {
    match state.dispatcher.dispatch(req, state.body_limit).await {
        Dispatch::Served(response) => response,
        Dispatch::Unmatched(req) => {
            tracing::warn!(method = %req.method(), path = %req.uri().path(), "No mock matched");
            not_found(req.method().as_str(), req.uri().path(), &state.dispatcher.routes())
        }
    }
}
