//! Route matching logic.
//!
//! # Responsibilities
//! - Match request method (exact, after case normalization)
//! - Match path segment count and literal segments (case-sensitive)
//! - Capture parameter segments
//!
//! # Design Decisions
//! - First match in index order wins
//! - Parameters match any non-empty segment
//! - No regex, matching is a linear segment comparison

use std::collections::HashMap;

use crate::routing::index::{RouteDescriptor, RouteIndex, Segment};
use crate::routing::method::HttpMethod;

/// Captured path parameters, keyed by parameter name.
pub type PathParams = HashMap<String, String>;

/// Trait for matching a request against a route pattern.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns the captured parameters if the request matches.
    fn match_segments(&self, method: HttpMethod, segments: &[&str]) -> Option<PathParams>;
}

impl Matcher for RouteDescriptor {
    fn match_segments(&self, method: HttpMethod, segments: &[&str]) -> Option<PathParams> {
        if self.method != method || self.pattern.len() != segments.len() {
            return None;
        }

        let mut params = PathParams::new();
        for (segment, actual) in self.pattern.iter().zip(segments) {
            match segment {
                Segment::Literal(text) => {
                    if text != actual {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if actual.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), decode_param(actual));
                }
            }
        }
        Some(params)
    }
}

/// A successful lookup.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub route: &'a RouteDescriptor,
    pub params: PathParams,
}

impl RouteIndex {
    /// Find the first route matching `method` and `path`.
    ///
    /// Unsupported methods never match.
    pub fn match_request(&self, method: &str, path: &str) -> Option<RouteMatch<'_>> {
        let method: HttpMethod = method.parse().ok()?;
        let segments = split_path(path);

        self.iter().find_map(|route| {
            route
                .match_segments(method, &segments)
                .map(|params| RouteMatch { route, params })
        })
    }
}

/// Split a request path into segments. `/` and the empty path have none.
pub fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').collect()
}

fn decode_param(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn route(method: HttpMethod, pattern: &[Segment]) -> RouteDescriptor {
        RouteDescriptor {
            method,
            pattern: pattern.to_vec(),
            source_file: PathBuf::from("mock.json"),
        }
    }

    fn lit(s: &str) -> Segment {
        Segment::Literal(s.to_string())
    }

    fn param(s: &str) -> Segment {
        Segment::Param(s.to_string())
    }

    #[test]
    fn test_split_path() {
        assert!(split_path("/").is_empty());
        assert!(split_path("").is_empty());
        assert_eq!(split_path("/user/42"), vec!["user", "42"]);
        assert_eq!(split_path("/user/42/"), vec!["user", "42", ""]);
    }

    #[test]
    fn test_param_capture() {
        let index = RouteIndex::from_routes(vec![route(HttpMethod::Get, &[lit("user"), param("id")])]);

        let m = index.match_request("GET", "/user/42").unwrap();
        assert_eq!(m.params.get("id").map(String::as_str), Some("42"));

        assert!(index.match_request("GET", "/user").is_none());
        assert!(index.match_request("GET", "/user/").is_none());
        assert!(index.match_request("GET", "/User/42").is_none());
    }

    #[test]
    fn test_method_matching() {
        let index = RouteIndex::from_routes(vec![route(HttpMethod::Post, &[lit("users")])]);

        assert!(index.match_request("post", "/users").is_some());
        assert!(index.match_request("GET", "/users").is_none());
        assert!(index.match_request("TRACE", "/users").is_none());
    }

    #[test]
    fn test_static_beats_param_at_same_depth() {
        let index = RouteIndex::from_routes(vec![
            route(HttpMethod::Get, &[param("id")]),
            route(HttpMethod::Get, &[lit("users")]),
        ]);

        let m = index.match_request("GET", "/users").unwrap();
        assert_eq!(m.route.pattern, vec![lit("users")]);
        assert!(m.params.is_empty());

        let m = index.match_request("GET", "/other").unwrap();
        assert_eq!(m.params.get("id").map(String::as_str), Some("other"));
    }

    #[test]
    fn test_param_values_are_decoded() {
        let index = RouteIndex::from_routes(vec![route(HttpMethod::Get, &[lit("user"), param("name")])]);

        let m = index.match_request("GET", "/user/john%20doe").unwrap();
        assert_eq!(m.params.get("name").map(String::as_str), Some("john doe"));
    }

    #[test]
    fn test_root_route() {
        let index = RouteIndex::from_routes(vec![route(HttpMethod::Post, &[])]);
        assert!(index.match_request("POST", "/").is_some());
        assert!(index.match_request("POST", "/x").is_none());
    }
}
