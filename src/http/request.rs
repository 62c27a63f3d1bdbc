//! Request context extraction.
//!
//! # Responsibilities
//! - Parse the query string, keeping repeated keys
//! - Read and parse the request body (JSON or urlencoded form)
//!
//! # Design Decisions
//! - Unparsable or oversized bodies are treated as absent, never as errors
//! - Only the method and path are needed to route; the body is read after a match

use std::collections::hash_map::Entry;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request};
use serde_json::{Map, Value};

use crate::template::{QueryParams, QueryValue};

/// The parts of an inbound request the mock engine reads.
#[derive(Debug, Clone, Default)]
pub struct MockRequest {
    pub method: String,
    pub path: String,
    pub query: QueryParams,
    pub body: Option<Value>,
}

impl MockRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Consume an HTTP request, reading at most `body_limit` body bytes.
    pub async fn from_request(req: Request<Body>, body_limit: usize) -> Self {
        let (parts, body) = req.into_parts();
        let body = read_body(&parts.headers, body, body_limit).await;

        Self {
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            query: parse_query(parts.uri.query()),
            body,
        }
    }
}

/// Parse a raw query string. Repeated keys collect into [`QueryValue::Many`].
pub fn parse_query(raw: Option<&str>) -> QueryParams {
    let mut query = QueryParams::new();
    let Some(raw) = raw else {
        return query;
    };

    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        let value = value.into_owned();
        match query.entry(key.into_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(QueryValue::One(value));
            }
            Entry::Occupied(slot) => {
                let existing = slot.into_mut();
                *existing = match std::mem::replace(existing, QueryValue::Many(Vec::new())) {
                    QueryValue::One(first) => QueryValue::Many(vec![first, value]),
                    QueryValue::Many(mut values) => {
                        values.push(value);
                        QueryValue::Many(values)
                    }
                };
            }
        }
    }
    query
}

async fn read_body(headers: &HeaderMap, body: Body, limit: usize) -> Option<Value> {
    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, limit, "Ignoring unreadable request body");
            return None;
        }
    };
    parse_body(headers, &bytes)
}

/// Interpret body bytes according to `Content-Type`.
pub fn parse_body(headers: &HeaderMap, bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())?;

    if content_type == "application/json" || content_type.ends_with("+json") {
        match serde_json::from_slice(bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(error = %e, "Request body is not valid JSON");
                None
            }
        }
    } else if content_type == "application/x-www-form-urlencoded" {
        Some(form_to_json(bytes))
    } else {
        None
    }
}

fn form_to_json(bytes: &[u8]) -> Value {
    let mut map = Map::new();
    for (key, value) in url::form_urlencoded::parse(bytes) {
        let value = Value::String(value.into_owned());
        match map.get_mut(key.as_ref()) {
            None => {
                map.insert(key.into_owned(), value);
            }
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }
    Value::Object(map)
}
