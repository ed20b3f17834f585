//! Authorization gate wrapping the router.
//!
//! Every navigation goes through [`AccessGate::navigate`]: the gate looks
//! up the permission requirement bound to the path, asks the entity policy
//! for a predicate, and has the policy service evaluate it before the
//! wrapped router is consulted at all.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::error::NavError;
use crate::policy::{AccessError, Action, AuthorizedActor, EntityPolicy, PolicyService};
use crate::route::Router;
use crate::view::View;

/// Errors from wiring requirements at startup.
#[derive(Debug, Clone, Error)]
pub enum GateError {
    /// A requirement named an entity with no registered policy. Caught at
    /// registration time so the dispatch path never meets a requirement
    /// it cannot evaluate.
    #[error("no policy registered for entity '{entity}'")]
    UnknownEntity { entity: String },
}

/// A permission requirement bound to one literal path.
struct Requirement {
    entity: String,
    action: Action,
    default_target: String,
    policy: Arc<dyn EntityPolicy>,
}

/// Router decorator enforcing per-path permission requirements.
///
/// Requirement lookup is **literal**: a requirement registered against a
/// template string guards only navigation to that exact string, not the
/// concrete paths the template can expand to — each concrete path needs
/// its own requirement. A path with no registered requirement is
/// implicitly **public** (fail-open by omission); use
/// [`unguarded_paths`] at startup to audit that every registered route is
/// intentionally public or guarded.
///
/// [`unguarded_paths`]: AccessGate::unguarded_paths
pub struct AccessGate {
    router: Router,
    policy: PolicyService,
    policies: HashMap<String, Arc<dyn EntityPolicy>>,
    requirements: HashMap<String, Requirement>,
}

impl AccessGate {
    /// Wrap `router`, checking access through `policy`.
    pub fn new(router: Router, policy: PolicyService) -> Self {
        Self {
            router,
            policy,
            policies: HashMap::new(),
            requirements: HashMap::new(),
        }
    }

    /// Register an entity rule set, keyed by its entity name.
    pub fn register_policy(&mut self, policy: Arc<dyn EntityPolicy>) {
        debug!(entity = policy.entity(), "registered entity policy");
        self.policies.insert(policy.entity().to_string(), policy);
    }

    /// Bind a permission requirement to one literal path string.
    ///
    /// Re-binding the same path silently replaces the requirement. Fails
    /// with [`GateError::UnknownEntity`] when no policy is registered for
    /// `entity` — requirements are startup configuration, and a missing
    /// rule set is a wiring bug to fail fast on.
    pub fn register_permission(
        &mut self,
        path: impl Into<String>,
        entity: &str,
        action: Action,
        default_target: impl Into<String>,
    ) -> Result<(), GateError> {
        let policy = self
            .policies
            .get(entity)
            .cloned()
            .ok_or_else(|| GateError::UnknownEntity {
                entity: entity.to_string(),
            })?;

        let path = path.into();
        debug!(%path, entity, %action, "registered permission requirement");
        self.requirements.insert(
            path,
            Requirement {
                entity: entity.to_string(),
                action,
                default_target: default_target.into(),
                policy,
            },
        );
        Ok(())
    }

    /// Navigate to `path`, authorizing against the requirement's default
    /// target.
    pub fn navigate(&mut self, path: &str) -> Result<View, NavError> {
        self.navigate_inner(path, None, true)
    }

    /// Navigate to `path`, authorizing against `target` instead of the
    /// requirement's default.
    ///
    /// The override affects authorization only; route captures still come
    /// from the path itself.
    pub fn navigate_with_target(&mut self, path: &str, target: &str) -> Result<View, NavError> {
        self.navigate_inner(path, Some(target), true)
    }

    fn navigate_inner(
        &mut self,
        path: &str,
        target: Option<&str>,
        record_history: bool,
    ) -> Result<View, NavError> {
        if let Some(requirement) = self.requirements.get(path) {
            let target = target.unwrap_or(&requirement.default_target);
            let predicate = requirement.policy.predicate_for(requirement.action, target);

            if let Err(err) =
                self.policy
                    .authorize(&requirement.entity, requirement.action, &predicate)
            {
                // The router is never consulted on denial, so a denied
                // caller cannot learn whether the path exists.
                self.router.note_denied();
                return Err(err.into());
            }
        }

        self.router.dispatch_inner(path, record_history)
    }

    /// Evaluate the requirement for `path` without dispatching.
    ///
    /// `Ok(None)` means the path is public (no requirement bound). Used
    /// for menu filtering and other UI affordances.
    pub fn authorize_path(
        &self,
        path: &str,
        target: Option<&str>,
    ) -> Result<Option<AuthorizedActor>, AccessError> {
        let Some(requirement) = self.requirements.get(path) else {
            return Ok(None);
        };
        let target = target.unwrap_or(&requirement.default_target);
        let predicate = requirement.policy.predicate_for(requirement.action, target);
        self.policy
            .authorize(&requirement.entity, requirement.action, &predicate)
            .map(Some)
    }

    /// Registered route paths with no requirement bound.
    ///
    /// The audit unit for a dynamic route is its template string; the
    /// concrete paths a template expands to still need their own
    /// requirements. Startup code can refuse to serve until this is
    /// empty.
    pub fn unguarded_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .router
            .registered_paths()
            .filter(|path| !self.requirements.contains_key(*path))
            .map(str::to_string)
            .collect();
        paths.sort_unstable();
        paths
    }

    /// Re-open the most recent history entry, re-checking authorization.
    ///
    /// An entry that now fails its check is dropped and the next one is
    /// tried, so repeated `back()` walks past revoked panels. `Ok(None)`
    /// when the history is exhausted.
    pub fn back(&mut self) -> Result<Option<View>, NavError> {
        while let Some(path) = self.router.pop_history() {
            match self.navigate_inner(&path, None, false) {
                Ok(view) => return Ok(Some(view)),
                Err(NavError::Denied(denied)) => {
                    warn!(%path, actor_id = denied.actor_id, "dropping revoked history entry");
                }
                Err(other) => return Err(other),
            }
        }
        Ok(None)
    }

    /// The wrapped router, for state inspection.
    pub fn router(&self) -> &Router {
        &self.router
    }
}

// The gate unit tests live in `tests/gate_test.rs`: they use the
// recording host and scripted session from `varco-test-utils`, whose
// trait impls target the non-test build of this crate and so cannot
// satisfy the lib-test target's traits from an in-source `#[cfg(test)]`
// module (cyclic dev-dependency).
