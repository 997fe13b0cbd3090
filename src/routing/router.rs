//! Route lookup.
//!
//! Routes are evaluated strictly in registration order and the first whole
//! path match wins. The table is built once and never mutated afterwards,
//! so it is shared across connection tasks behind an `Arc` without locks.
//! Methods play no part in matching.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::http::request::Request;
use crate::http::response::Response;
use crate::routing::pattern::{PatternError, RoutePattern};

/// Application callback invoked for a matched route.
///
/// An `Err` is a handler failure: it is not turned into an HTTP response,
/// the connection is closed instead.
pub type Handler = Arc<dyn Fn(&Request) -> anyhow::Result<Response> + Send + Sync>;

/// No registered pattern matched the path; the caller falls back to
/// static files.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no route matches {0:?}")]
pub struct NoRouteMatch(pub String);

pub struct Route {
    pattern: RoutePattern,
    handler: Handler,
}

impl Route {
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Result of a successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: HashMap<String, String>,
}

impl RouteMatch<'_> {
    pub fn handler(&self) -> Handler {
        Arc::clone(&self.route.handler)
    }
}

/// Ordered, immutable route table.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Finds the first route whose pattern matches the whole of `path`.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch<'_>, NoRouteMatch> {
        self.routes
            .iter()
            .find_map(|route| {
                route
                    .pattern
                    .matches(path)
                    .map(|params| RouteMatch { route, params })
            })
            .ok_or_else(|| NoRouteMatch(path.to_string()))
    }

    /// Resolves `request.path` and stores the captured parameters on the
    /// request.
    pub fn dispatch(&self, request: &mut Request) -> Result<Handler, NoRouteMatch> {
        let matched = self.resolve(&request.path)?;
        let handler = matched.handler();
        request.params = matched.params;
        Ok(handler)
    }
}

/// Collects routes and compiles every pattern in one go.
#[derive(Default)]
pub struct RouterBuilder {
    routes: Vec<(String, Handler)>,
}

impl RouterBuilder {
    pub fn route<F>(mut self, pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request) -> anyhow::Result<Response> + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        self.routes.push((pattern.into(), handler));
        self
    }

    pub fn build(self) -> Result<Router, PatternError> {
        let routes = self
            .routes
            .into_iter()
            .map(|(pattern, handler)| {
                Ok(Route {
                    pattern: RoutePattern::compile(&pattern)?,
                    handler,
                })
            })
            .collect::<Result<Vec<_>, PatternError>>()?;

        Ok(Router { routes })
    }
}
