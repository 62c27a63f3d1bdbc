//! Template rendering subsystem.
//!
//! # Data Flow
//! ```text
//! MockSpec.body (template) + RenderContext { params, query, body }
//!     → engine.rs (recursive rebuild of the JSON tree)
//!     → expression.rs (left-to-right `{{...}}` scan, expression grammar)
//!     → generators.rs / clock.rs ($random.*, $now)
//!     → rendered JSON value
//! ```
//!
//! # Design Decisions
//! - A failed expression never fails the render; its text passes through
//! - Each placeholder is evaluated independently, random values are never shared

pub mod clock;
pub mod engine;
pub mod expression;
pub mod generators;

pub use engine::{QueryParams, QueryValue, RenderContext, TemplateEngine};
pub use expression::Expression;
pub use generators::RandomGenerator;
