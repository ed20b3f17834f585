//! The authorization chokepoint.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::actor::{Actor, NO_ACTOR_ID};
use crate::policy::{Action, Predicate};
use crate::session::SessionProvider;

/// A denied access check.
///
/// Carries enough context to render a uniform access-denied message; the
/// message never says whether the path or record exists. `actor_id` is
/// [`NO_ACTOR_ID`] when no one was signed in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("actor {actor_id} may not {action} {entity}")]
pub struct Denied {
    pub actor_id: i64,
    pub entity: String,
    pub action: Action,
}

impl Denied {
    /// Whether the denial was for an unauthenticated caller.
    pub fn is_anonymous(&self) -> bool {
        self.actor_id == NO_ACTOR_ID
    }
}

/// Outcome of an access check that did not succeed.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The predicate held `false`, or no actor was signed in. Expected
    /// and recoverable.
    #[error(transparent)]
    Denied(#[from] Denied),

    /// The predicate itself failed to evaluate. A policy-layer bug,
    /// propagated rather than converted to a denial.
    #[error(transparent)]
    Evaluation(#[from] crate::policy::PolicyError),
}

/// Proof that one access check passed.
///
/// Produced only by [`PolicyService::authorize`], scoped to a single
/// (actor, entity, action) and meant to be consumed right away, not
/// stored or reused for later checks.
#[derive(Debug)]
pub struct AuthorizedActor {
    pub actor: Actor,
    pub entity: String,
    pub action: Action,
}

/// Evaluates predicates against the live actor.
///
/// Every access decision in the kernel flows through [`authorize`]; the
/// convenience wrappers only fix the action label. One instance is built
/// per application context and injected where needed.
///
/// [`authorize`]: PolicyService::authorize
#[derive(Clone)]
pub struct PolicyService {
    session: Arc<dyn SessionProvider>,
}

impl PolicyService {
    /// Create a policy service reading actors from `session`.
    pub fn new(session: Arc<dyn SessionProvider>) -> Self {
        Self { session }
    }

    /// Run one access check.
    ///
    /// Fetches a fresh actor snapshot; absence denies immediately with
    /// actor id [`NO_ACTOR_ID`] and the predicate is not evaluated.
    /// Otherwise the predicate runs exactly once: `true` yields an
    /// [`AuthorizedActor`] capability, `false` a [`Denied`] carrying the
    /// real actor id.
    pub fn authorize(
        &self,
        entity: &str,
        action: Action,
        predicate: &Predicate,
    ) -> Result<AuthorizedActor, AccessError> {
        let Some(actor) = self.session.current_actor() else {
            warn!(entity, %action, "denied: no authenticated actor");
            return Err(Denied {
                actor_id: NO_ACTOR_ID,
                entity: entity.to_string(),
                action,
            }
            .into());
        };

        if predicate.test(&actor)? {
            Ok(AuthorizedActor {
                actor,
                entity: entity.to_string(),
                action,
            })
        } else {
            warn!(actor_id = actor.id, entity, %action, "denied by policy");
            Err(Denied {
                actor_id: actor.id,
                entity: entity.to_string(),
                action,
            }
            .into())
        }
    }

    /// Check a read rule.
    pub fn can_read(
        &self,
        entity: &str,
        predicate: &Predicate,
    ) -> Result<AuthorizedActor, AccessError> {
        self.authorize(entity, Action::Read, predicate)
    }

    /// Check an edit rule.
    pub fn can_edit(
        &self,
        entity: &str,
        predicate: &Predicate,
    ) -> Result<AuthorizedActor, AccessError> {
        self.authorize(entity, Action::Edit, predicate)
    }

    /// Check a delete rule.
    pub fn can_delete(
        &self,
        entity: &str,
        predicate: &Predicate,
    ) -> Result<AuthorizedActor, AccessError> {
        self.authorize(entity, Action::Delete, predicate)
    }

    /// Check a browse rule.
    pub fn can_browse(
        &self,
        entity: &str,
        predicate: &Predicate,
    ) -> Result<AuthorizedActor, AccessError> {
        self.authorize(entity, Action::Browse, predicate)
    }
}
