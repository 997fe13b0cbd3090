//! Path-based request routing.

pub mod pattern;
pub mod router;

pub use pattern::{PatternError, RoutePattern};
pub use router::{Handler, NoRouteMatch, Route, RouteMatch, Router, RouterBuilder};
