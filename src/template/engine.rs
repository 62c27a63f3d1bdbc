//! Response body rendering.
//!
//! # Responsibilities
//! - Rebuild a JSON template tree, substituting `{{...}}` placeholders in strings
//! - Resolve expressions against the per-request context
//! - Degrade unresolvable expressions to their literal text
//!
//! # Design Decisions
//! - The template is borrowed and a new tree is built; loaded mocks stay untouched
//! - Object key order and array order are preserved
//! - Substituted text is never rescanned
//! - Substitution always yields a string, even for numbers and booleans

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::routing::PathParams;
use crate::template::clock::now_iso8601;
use crate::template::expression::{placeholders, Expression};
use crate::template::generators::RandomGenerator;

/// A query parameter, single or repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

impl QueryValue {
    /// Text used for substitution; repeated values are comma-joined.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            QueryValue::One(value) => Cow::Borrowed(value.as_str()),
            QueryValue::Many(values) => Cow::Owned(values.join(",")),
        }
    }
}

/// Parsed query string.
pub type QueryParams = HashMap<String, QueryValue>;

/// Per-request values visible to templates.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub params: PathParams,
    pub query: QueryParams,
    pub body: Option<Value>,
}

impl RenderContext {
    pub fn new(params: PathParams, query: QueryParams, body: Option<Value>) -> Self {
        Self { params, query, body }
    }

    fn param(&self, key: &str) -> Option<Cow<'_, str>> {
        self.params.get(key).map(|v| Cow::Borrowed(v.as_str()))
    }

    fn query(&self, key: &str) -> Option<Cow<'_, str>> {
        self.query.get(key).map(QueryValue::as_text)
    }

    /// `null` counts as absent. Non-string values substitute as compact JSON.
    fn body(&self, key: &str) -> Option<Cow<'_, str>> {
        let value = match self.body.as_ref()? {
            Value::Object(map) => map.get(key)?,
            Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
        match value {
            Value::Null => None,
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

/// Renders body templates against a [`RenderContext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEngine;

impl TemplateEngine {
    pub fn new() -> Self {
        Self
    }

    /// Render a template tree into a new tree.
    pub fn render(&self, template: &Value, ctx: &RenderContext) -> Value {
        match template {
            Value::String(text) => Value::String(self.render_str(text, ctx)),
            Value::Array(items) => Value::Array(items.iter().map(|item| self.render(item, ctx)).collect()),
            Value::Object(map) => {
                let mut rendered = Map::with_capacity(map.len());
                for (key, value) in map {
                    rendered.insert(key.clone(), self.render(value, ctx));
                }
                Value::Object(rendered)
            }
            scalar => scalar.clone(),
        }
    }

    /// Replace every placeholder in `text`.
    pub fn render_str(&self, text: &str, ctx: &RenderContext) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for placeholder in placeholders(text) {
            out.push_str(&text[last..placeholder.start]);
            match self.resolve(Expression::parse(placeholder.inner), ctx) {
                Some(value) => out.push_str(&value),
                None => out.push_str(&text[placeholder.start..placeholder.end]),
            }
            last = placeholder.end;
        }

        out.push_str(&text[last..]);
        out
    }

    fn resolve<'c>(&self, expr: Expression<'_>, ctx: &'c RenderContext) -> Option<Cow<'c, str>> {
        match expr {
            Expression::Now => Some(Cow::Owned(now_iso8601())),
            Expression::Random(name) => match name.parse::<RandomGenerator>() {
                Ok(generator) => Some(Cow::Owned(generator.generate(&mut rand::thread_rng()))),
                Err(e) => {
                    tracing::warn!(generator = %name, "{}", e);
                    None
                }
            },
            Expression::Param(key) => ctx.param(key),
            Expression::Query(key) => ctx.query(key),
            Expression::Body(key) => ctx.body(key),
            Expression::Unknown(text) => {
                tracing::warn!(expression = %text, "Unknown template expression");
                None
            }
        }
    }
}
