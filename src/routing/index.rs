//! Route index construction.
//!
//! # Responsibilities
//! - Walk the mock directory for `.json` files
//! - Derive one route descriptor per file
//! - Rank descriptors by specificity
//!
//! # Design Decisions
//! - Files are enumerated in lexical order, so equally specific routes keep
//!   a stable order tied to their relative paths
//! - A missing mock directory yields an empty index, not an error
//! - The index is immutable once built; reloads build a new one

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::routing::method::HttpMethod;
use crate::routing::naming::{expand_segment, normalize_prefix, split_method, MOCK_EXTENSION};

/// One component of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Must equal the request segment exactly.
    Literal(String),
    /// Matches any non-empty request segment and binds it to this name.
    Param(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => f.write_str(text),
            Segment::Param(name) => write!(f, ":{}", name),
        }
    }
}

/// A route derived from a single mock file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub method: HttpMethod,
    pub pattern: Vec<Segment>,
    pub source_file: PathBuf,
}

impl RouteDescriptor {
    /// Returns true if any segment is a parameter.
    pub fn has_params(&self) -> bool {
        self.pattern.iter().any(|s| matches!(s, Segment::Param(_)))
    }

    /// Express-style rendering of the pattern, e.g. `/api/user/:id`.
    pub fn path(&self) -> String {
        if self.pattern.is_empty() {
            return "/".to_string();
        }
        self.pattern.iter().fold(String::new(), |mut acc, segment| {
            acc.push('/');
            acc.push_str(&segment.to_string());
            acc
        })
    }
}

impl fmt::Display for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path())
    }
}

/// Error raised while walking the mock directory.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to read mock directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Specificity-ordered set of routes.
#[derive(Debug, Clone, Default)]
pub struct RouteIndex {
    routes: Vec<RouteDescriptor>,
}

impl RouteIndex {
    /// Build an index from every `.json` file under `root`.
    pub fn build(root: &Path, prefix: &str) -> Result<Self, BuildError> {
        if !root.is_dir() {
            tracing::warn!(mock_dir = %root.display(), "Mock directory does not exist");
            return Ok(Self::default());
        }

        let prefix = normalize_prefix(prefix);
        let mut files = Vec::new();
        collect_mock_files(root, &mut files)?;

        let routes = files
            .into_iter()
            .filter_map(|file| describe(root, &prefix, file))
            .collect();

        Ok(Self::from_routes(routes))
    }

    /// Rank pre-built descriptors.
    ///
    /// Longer patterns come first; among equal lengths, fully literal patterns
    /// precede parameterized ones. The sort is stable.
    pub fn from_routes(mut routes: Vec<RouteDescriptor>) -> Self {
        routes.sort_by(|a, b| {
            b.pattern
                .len()
                .cmp(&a.pattern.len())
                .then_with(|| a.has_params().cmp(&b.has_params()))
        });
        Self { routes }
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// `METHOD /path` for every route, in match order.
    pub fn labels(&self) -> Vec<String> {
        self.routes.iter().map(ToString::to_string).collect()
    }
}

fn collect_mock_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), BuildError> {
    let io_err = |source| BuildError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(io_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;
    entries.sort();

    for path in entries {
        // Follows symlinks.
        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if metadata.is_dir() {
            collect_mock_files(&path, files)?;
        } else if metadata.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(MOCK_EXTENSION))
        {
            files.push(path);
        }
    }
    Ok(())
}

fn describe(root: &Path, prefix: &str, file: PathBuf) -> Option<RouteDescriptor> {
    let relative = file.strip_prefix(root).ok()?;
    let file_name = relative.file_name()?.to_str()?;
    let (method, logical_name) = split_method(file_name)?;

    let mut pattern = Vec::new();
    for raw in prefix.split('/').filter(|s| !s.is_empty()) {
        pattern.push(Segment::Literal(raw.to_string()));
    }
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            expand_segment(&component.as_os_str().to_string_lossy(), &mut pattern);
        }
    }
    if !logical_name.is_empty() {
        expand_segment(logical_name, &mut pattern);
    }

    Some(RouteDescriptor {
        method,
        pattern,
        source_file: file,
    })
}
