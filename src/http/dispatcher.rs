//! Request dispatch and route reload.
//!
//! # Responsibilities
//! - Hold the active `RouteIndex` snapshot and swap it on reload
//! - Resolve a request to a route, load its mock, render and delay
//! - Report unmatched requests back to the caller, which owns the policy
//!
//! # Design Decisions
//! - Each request loads the index once and keeps that snapshot to completion
//! - Reload builds a complete index before publishing it; a failed build
//!   leaves the previous index active
//! - The delay only suspends the response it belongs to

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::{MockDirWatcher, MockServerConfig};
use crate::http::request::MockRequest;
use crate::http::response::MockResponse;
use crate::mock::MockCache;
use crate::observability::metrics;
use crate::routing::{BuildError, PathParams, RouteDescriptor, RouteIndex};
use crate::template::{RenderContext, TemplateEngine};

/// A route picked for one request, detached from the index it came from.
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    pub route: RouteDescriptor,
    pub params: PathParams,
}

/// Result of offering a request to the dispatcher.
pub enum Dispatch {
    /// A mock matched and produced this response.
    Served(Response),
    /// Nothing matched; the untouched request is handed back.
    Unmatched(Request<Body>),
}

/// Serves mocks from a directory.
pub struct RequestDispatcher {
    routes: ArcSwap<RouteIndex>,
    mock_dir: PathBuf,
    prefix: String,
    cache: MockCache,
    engine: TemplateEngine,
}

impl RequestDispatcher {
    /// Build the initial index from `config.mock_dir`.
    pub fn new(config: &MockServerConfig) -> Result<Self, BuildError> {
        let prefix = config.normalized_prefix();
        let index = RouteIndex::build(&config.mock_dir, &prefix)?;

        let dispatcher = Self {
            routes: ArcSwap::from_pointee(index),
            mock_dir: config.mock_dir.clone(),
            prefix,
            cache: MockCache::new(config.cache),
            engine: TemplateEngine::new(),
        };
        dispatcher.log_routes();
        metrics::record_reload(true, dispatcher.routes().len());
        Ok(dispatcher)
    }

    pub fn mock_dir(&self) -> &Path {
        &self.mock_dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The active index.
    pub fn routes(&self) -> Arc<RouteIndex> {
        self.routes.load_full()
    }

    /// Rebuild the index from disk and publish it.
    ///
    /// On failure the previous index stays active and the error is returned.
    pub fn reload(&self) -> Result<Arc<RouteIndex>, BuildError> {
        let index = match RouteIndex::build(&self.mock_dir, &self.prefix) {
            Ok(index) => Arc::new(index),
            Err(e) => {
                tracing::error!(error = %e, "Route reload failed, keeping previous routes");
                metrics::record_reload(false, 0);
                return Err(e);
            }
        };

        self.routes.store(Arc::clone(&index));
        self.cache.clear();

        tracing::info!(routes = index.len(), "Routes reloaded");
        self.log_routes();
        metrics::record_reload(true, index.len());
        Ok(index)
    }

    /// Match `method` and `path` against the active index.
    pub fn resolve(&self, method: &str, path: &str) -> Option<ResolvedRoute> {
        let index = self.routes.load();
        index.match_request(method, path).map(|m| ResolvedRoute {
            route: m.route.clone(),
            params: m.params,
        })
    }

    /// Serve a resolved route: load, render, delay.
    pub async fn respond(&self, resolved: &ResolvedRoute, request: MockRequest) -> MockResponse {
        let start = Instant::now();
        let source = &resolved.route.source_file;

        let spec = match self.cache.load(source).await {
            Ok(spec) => spec,
            Err(e) => {
                tracing::error!(error = %e, file = %source.display(), "Failed to load mock");
                let response = MockResponse::load_failure(&e);
                self.log_served(&request, &response, start);
                return response;
            }
        };

        let ctx = RenderContext::new(resolved.params.clone(), request.query.clone(), request.body.clone());
        let body = self.engine.render(&spec.body, &ctx);

        let delay = spec.config.delay();
        if !delay.is_zero() {
            tracing::debug!(delay_ms = delay.as_millis() as u64, path = %request.path, "Delaying response");
            tokio::time::sleep(delay).await;
        }

        let response = MockResponse::new(spec.config.status_code(), body);
        self.log_served(&request, &response, start);
        response
    }

    /// Resolve and serve an already extracted request.
    pub async fn handle(&self, request: MockRequest) -> Option<MockResponse> {
        let Some(resolved) = self.resolve(&request.method, &request.path) else {
            metrics::record_unmatched(&request.method);
            return None;
        };
        Some(self.respond(&resolved, request).await)
    }

    /// Offer an HTTP request to the mocks.
    ///
    /// The body is only read once a route matched.
    pub async fn dispatch(&self, req: Request<Body>, body_limit: usize) -> Dispatch {
        let Some(resolved) = self.resolve(req.method().as_str(), req.uri().path()) else {
            tracing::debug!(method = %req.method(), path = %req.uri().path(), "No mock matched");
            metrics::record_unmatched(req.method().as_str());
            return Dispatch::Unmatched(req);
        };

        let request = MockRequest::from_request(req, body_limit).await;
        Dispatch::Served(self.respond(&resolved, request).await.into_response())
    }

    /// Reload on every mock file change until `shutdown` fires.
    ///
    /// Changes arriving while a reload runs are folded into the next one.
    pub fn watch(
        self: &Arc<Self>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<JoinHandle<()>, notify::Error> {
        let (watcher, mut changes) = MockDirWatcher::new(&self.mock_dir);
        let handle = watcher.run()?;
        let dispatcher = Arc::clone(self);

        Ok(tokio::spawn(async move {
            let _handle = handle;
            loop {
                tokio::select! {
                    _ = shutdown.recv() => break,
                    changed = changes.recv() => {
                        let Some(path) = changed else { break };
                        while changes.try_recv().is_ok() {}

                        tracing::info!(file = %path.display(), "Mock files changed, reloading routes");
                        let target = Arc::clone(&dispatcher);
                        if let Err(e) = tokio::task::spawn_blocking(move || target.reload()).await {
                            tracing::error!(error = %e, "Reload task failed");
                        }
                    }
                }
            }
            tracing::debug!("Mock watcher stopped");
        }))
    }

    fn log_served(&self, request: &MockRequest, response: &MockResponse, start: Instant) {
        tracing::info!(
            method = %request.method,
            path = %request.path,
            status = response.status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Served mock"
        );
        metrics::record_request(&request.method, response.status.as_u16(), start);
    }

    fn log_routes(&self) {
        let index = self.routes.load();
        if index.is_empty() {
            tracing::warn!(mock_dir = %self.mock_dir.display(), "No mock files found");
            return;
        }
        for route in index.iter() {
            tracing::info!(
                method = %route.method,
                path = %route.path(),
                file = %route.source_file.display(),
                "Route"
            );
        }
    }
}

impl std::fmt::Debug for RequestDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDispatcher")
            .field("mock_dir", &self.mock_dir)
            .field("prefix", &self.prefix)
            .field("routes", &self.routes.load().len())
            .field("cache", &self.cache.is_enabled())
            .finish()
    }
}
