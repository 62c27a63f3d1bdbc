//! Mock file naming grammar.
//!
//! ```text
//! <dir>/<logicalName>[.METHOD].json
//! ```
//!
//! - A trailing dot-segment naming one of the supported methods selects the
//!   route method (case-insensitive), otherwise the method is `GET`.
//! - `<text>-[<name>]` inside a single path segment expands to the literal
//!   `<text>` followed by the parameter `<name>`. A bare `[name]` segment is
//!   a plain literal.

use crate::routing::index::Segment;
use crate::routing::method::HttpMethod;

/// File extension of mock definitions.
pub const MOCK_EXTENSION: &str = ".json";

/// Normalize a URL prefix: leading `/`, no trailing `/`, empty stays empty.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim();
    if trimmed.is_empty() || trimmed == "/" {
        return String::new();
    }

    let mut normalized = String::with_capacity(trimmed.len() + 1);
    if !trimmed.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(trimmed);
    while normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// Split a mock file name into its method and logical name.
///
/// `user-[id].post.json` yields `(Post, "user-[id]")`, `users.json` yields
/// `(Get, "users")`. Returns `None` for names without the `.json` suffix.
pub fn split_method(file_name: &str) -> Option<(HttpMethod, &str)> {
    let stem = file_name.strip_suffix(MOCK_EXTENSION)?;

    match stem.rsplit_once('.') {
        Some((logical, token)) => match token.parse::<HttpMethod>() {
            Ok(method) => Some((method, logical)),
            Err(_) => Some((HttpMethod::Get, stem)),
        },
        // A stem that is only a method token (`post.json`) maps to its directory.
        None => match stem.parse::<HttpMethod>() {
            Ok(method) => Some((method, "")),
            Err(_) => Some((HttpMethod::Get, stem)),
        },
    }
}

/// Expand one raw path segment into route segments, appending to `out`.
///
/// Every `-[name]` occurrence ends the literal text before it and becomes a
/// parameter. Text between or after parameters forms its own literal
/// segment; empty literal pieces are dropped.
pub fn expand_segment(raw: &str, out: &mut Vec<Segment>) {
    let mut literal = String::new();
    let mut rest = raw;

    while let Some(pos) = rest.find("-[") {
        let after = &rest[pos + 2..];
        match after.find(']') {
            Some(end) if end > 0 => {
                literal.push_str(&rest[..pos]);
                flush_literal(&mut literal, out);
                out.push(Segment::Param(after[..end].to_string()));
                rest = &after[end + 1..];
            }
            _ => {
                literal.push_str(&rest[..pos + 2]);
                rest = after;
            }
        }
    }

    literal.push_str(rest);
    flush_literal(&mut literal, out);
}

fn flush_literal(literal: &mut String, out: &mut Vec<Segment>) {
    if !literal.is_empty() {
        out.push(Segment::Literal(std::mem::take(literal)));
    }
}
