//! Actor predicates.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::actor::Actor;

/// Errors from evaluating a predicate.
///
/// These are policy-layer bugs (a malformed target id, a failing custom
/// rule), never authorization outcomes: the policy service propagates them
/// instead of converting them to a denial.
#[derive(Debug, Clone, Error)]
pub enum PolicyError {
    #[error("target id '{target}' is not a valid actor id")]
    InvalidTarget { target: String },

    #[error("custom rule failed: {message}")]
    Rule { message: String },
}

impl PolicyError {
    /// Build a custom-rule failure.
    pub fn rule(message: impl Into<String>) -> Self {
        Self::Rule {
            message: message.into(),
        }
    }
}

/// Custom rule function, for entity-specific checks the tagged variants
/// cannot express.
pub type RuleFn = Arc<dyn Fn(&Actor) -> Result<bool, PolicyError> + Send + Sync>;

/// A side-effect-free rule deciding authorization for one actor.
///
/// Evaluation never mutates anything, so a predicate can be tested in
/// isolation and evaluated repeatedly with the same outcome.
#[derive(Clone)]
pub enum Predicate {
    /// True for the administrator role.
    Admin,
    /// True for the manager role.
    Manager,
    /// True when the actor's id equals the target id.
    ///
    /// The target is kept as a string and parsed at evaluation time; a
    /// malformed id surfaces as [`PolicyError::InvalidTarget`].
    SelfIs(String),
    /// True for any authenticated actor.
    Authenticated,
    /// Entity-specific rule.
    Custom(RuleFn),
    /// True when any member is true, evaluated in order, short-circuit.
    Any(Vec<Predicate>),
}

impl Predicate {
    /// Evaluate the rule against an actor snapshot.
    pub fn test(&self, actor: &Actor) -> Result<bool, PolicyError> {
        match self {
            Predicate::Admin => Ok(actor.role.is_admin()),
            Predicate::Manager => Ok(actor.role.is_manager()),
            Predicate::SelfIs(target) => {
                let target_id: i64 =
                    target.parse().map_err(|_| PolicyError::InvalidTarget {
                        target: target.clone(),
                    })?;
                Ok(actor.id == target_id)
            }
            Predicate::Authenticated => Ok(true),
            Predicate::Custom(rule) => rule(actor),
            Predicate::Any(members) => {
                for member in members {
                    if member.test(actor)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Admin => f.write_str("Admin"),
            Predicate::Manager => f.write_str("Manager"),
            Predicate::SelfIs(target) => f.debug_tuple("SelfIs").field(target).finish(),
            Predicate::Authenticated => f.write_str("Authenticated"),
            Predicate::Custom(_) => f.write_str("Custom(..)"),
            Predicate::Any(members) => f.debug_tuple("Any").field(members).finish(),
        }
    }
}
