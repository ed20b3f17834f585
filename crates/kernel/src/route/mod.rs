//! Route patterns, the route registry, and dispatch.

mod pattern;
mod router;

pub use pattern::{PatternError, RoutePattern};
pub use router::{DEFAULT_HISTORY_LIMIT, Handler, Phase, RouteParams, Router};
