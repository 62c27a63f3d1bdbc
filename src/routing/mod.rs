//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (startup and every reload):
//!     mock directory
//!     → naming.rs (method token, dash-bracket parameters)
//!     → index.rs (one RouteDescriptor per file, specificity sort)
//!     → Freeze as immutable RouteIndex
//!
//! Incoming Request (method, path)
//!     → matcher.rs (method, segment count, segment-by-segment compare)
//!     → Return: RouteMatch (route + captured params) or NoMatch
//! ```
//!
//! # Design Decisions
//! - Routes compiled off the hot path, immutable at runtime
//! - Deterministic: same directory always yields the same ordered index
//! - First match wins (ordered by specificity)

pub mod index;
pub mod matcher;
pub mod method;
pub mod naming;

pub use index::{BuildError, RouteDescriptor, RouteIndex, Segment};
pub use matcher::{Matcher, PathParams, RouteMatch};
pub use method::HttpMethod;
