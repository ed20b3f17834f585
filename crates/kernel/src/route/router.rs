//! Route registry and dispatch.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tracing::{debug, error};

use crate::error::NavError;
use crate::route::pattern::{PatternError, RoutePattern};
use crate::view::{View, ViewHost};

/// Parameters extracted from a dynamic route match. Empty for static
/// routes.
pub type RouteParams = HashMap<String, String>;

/// A route handler: builds the view for a resolved path.
pub type Handler = Arc<dyn Fn(&RouteParams) -> anyhow::Result<View> + Send + Sync>;

/// Where the navigation state machine currently is.
///
/// `Denied` is idle-equivalent: the next dispatch proceeds from it exactly
/// as from `Idle`, it only records that the last attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dispatching,
    Rendered,
    Denied,
}

/// Default bound on the departed-path history.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Registry of static and dynamic routes, plus navigation state.
///
/// One instance per application context. Registration takes `&mut self`
/// and dispatch takes `&mut self`, so the borrow checker enforces that
/// all registration happens before the first dispatch on a shared router.
pub struct Router {
    host: Arc<dyn ViewHost>,
    static_routes: HashMap<String, Handler>,
    dynamic_routes: Vec<(RoutePattern, Handler)>,
    phase: Phase,
    current_path: Option<String>,
    history: VecDeque<String>,
    history_limit: usize,
}

impl Router {
    /// Create an empty router committing views to `host`.
    pub fn new(host: Arc<dyn ViewHost>) -> Self {
        Self {
            host,
            static_routes: HashMap::new(),
            dynamic_routes: Vec::new(),
            phase: Phase::Idle,
            current_path: None,
            history: VecDeque::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Bound the departed-path history to `limit` entries.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Register a handler for one exact path.
    ///
    /// The last registration for the same path wins silently.
    pub fn register(&mut self, path: impl Into<String>, handler: Handler) {
        let path = path.into();
        debug!(%path, "registered static route");
        self.static_routes.insert(path, handler);
    }

    /// Register a handler for a pattern template.
    ///
    /// Patterns are tried in registration order; no collision detection
    /// is performed against earlier patterns or static paths.
    pub fn register_pattern(
        &mut self,
        template: &str,
        handler: Handler,
    ) -> Result<(), PatternError> {
        let pattern = RoutePattern::compile(template)?;
        debug!(template, params = pattern.param_names().len(), "registered dynamic route");
        self.dynamic_routes.push((pattern, handler));
        Ok(())
    }

    /// Dispatch a path: resolve, run the handler, then commit the view.
    ///
    /// Static lookup first, then dynamic patterns in registration order,
    /// first match wins. The handler must produce its view before the
    /// view host is told to switch, so a failed handler leaves the host
    /// untouched and `current_path` unchanged.
    pub fn dispatch(&mut self, path: &str) -> Result<View, NavError> {
        self.dispatch_inner(path, true)
    }

    pub(crate) fn dispatch_inner(
        &mut self,
        path: &str,
        record_history: bool,
    ) -> Result<View, NavError> {
        self.phase = Phase::Dispatching;
        debug!(path, "dispatching");

        match self.render(path) {
            Ok(view) => {
                if record_history && let Some(departed) = self.current_path.take() {
                    self.history.push_back(departed);
                    while self.history.len() > self.history_limit {
                        self.history.pop_front();
                    }
                }
                self.current_path = Some(path.to_string());
                self.phase = Phase::Rendered;
                self.host.replace(view.clone());
                debug!(path, view = %view.name, "rendered");
                Ok(view)
            }
            Err(err) => {
                match &err {
                    NavError::NotFound { .. } => {
                        error!(path, "dispatch to unregistered path");
                    }
                    NavError::Handler { source, .. } => {
                        error!(path, error = %source, "handler failed");
                    }
                    _ => {}
                }
                self.phase = Phase::Denied;
                Err(err)
            }
        }
    }

    /// Resolve `path` and run its handler, without touching any state.
    fn render(&self, path: &str) -> Result<View, NavError> {
        if let Some(handler) = self.static_routes.get(path) {
            let params = RouteParams::new();
            return handler(&params).map_err(|source| NavError::Handler {
                path: path.to_string(),
                source,
            });
        }

        for (pattern, handler) in &self.dynamic_routes {
            if let Some(params) = pattern.matches(path) {
                return handler(&params).map_err(|source| NavError::Handler {
                    path: path.to_string(),
                    source,
                });
            }
        }

        Err(NavError::NotFound {
            path: path.to_string(),
        })
    }

    /// The last successfully dispatched path, `None` before the first.
    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    /// Current state-machine phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// All registered paths: static paths plus dynamic templates.
    pub fn registered_paths(&self) -> impl Iterator<Item = &str> {
        self.static_routes
            .keys()
            .map(String::as_str)
            .chain(self.dynamic_routes.iter().map(|(p, _)| p.template()))
    }

    /// Record a failed attempt that never reached resolution.
    pub(crate) fn note_denied(&mut self) {
        self.phase = Phase::Denied;
    }

    /// Pop the most recently departed path.
    pub(crate) fn pop_history(&mut self) -> Option<String> {
        self.history.pop_back()
    }

    #[cfg(test)]
    fn history_len(&self) -> usize {
        self.history.len()
    }
}

// Most router unit tests live in `tests/router_test.rs`: they use the
// recording host from `varco-test-utils`, whose trait impls target the
// non-test build of this crate and so cannot satisfy the lib-test
// target's traits from an in-source `#[cfg(test)]` module (cyclic dev-
// dependency). Only the history test stays here — it reads the
// crate-private `history_len`/`pop_history` accessors.
#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    /// Minimal host for tests that never inspect committed views.
    struct NullHost;

    impl ViewHost for NullHost {
        fn replace(&self, _view: View) {}
    }

    fn view_handler(name: &'static str) -> Handler {
        Arc::new(move |_params: &RouteParams| Ok(View::new(name, name)))
    }

    #[test]
    fn history_records_departed_paths_up_to_limit() {
        let mut router = Router::new(Arc::new(NullHost)).with_history_limit(2);
        router.register_pattern("/p/{n}", view_handler("p")).unwrap();

        for n in 0..5 {
            router.dispatch(&format!("/p/{n}")).unwrap();
        }

        assert_eq!(router.history_len(), 2);
        assert_eq!(router.pop_history(), Some("/p/3".to_string()));
        assert_eq!(router.pop_history(), Some("/p/2".to_string()));
        assert_eq!(router.pop_history(), None);
    }
}

