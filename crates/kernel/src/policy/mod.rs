//! Access policy: actions, predicates, per-entity rule sets, and the
//! authorization chokepoint.
//!
//! Entity policies produce [`Predicate`] values rather than booleans so
//! evaluation can be deferred until the live actor snapshot is fetched by
//! [`PolicyService`]. Role precedence in the shipped rule sets is
//! admin > manager > self > deny.

mod catalog;
mod predicate;
mod service;
mod staff;

pub use catalog::CatalogPolicy;
pub use predicate::{Predicate, PolicyError};
pub use service::{AccessError, AuthorizedActor, Denied, PolicyService};
pub use staff::StaffPolicy;

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed action taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Edit,
    Delete,
    Browse,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Read => "read",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Browse => "browse",
        };
        f.write_str(name)
    }
}

/// Rule set for one protected entity.
///
/// Factories return predicates, not decisions: the rule is built from the
/// action and target alone, and only [`PolicyService`] applies it to an
/// actor.
pub trait EntityPolicy: Send + Sync {
    /// Machine name of the entity this rule set protects (e.g., "staff").
    fn entity(&self) -> &str;

    /// Rule for reading the record identified by `target`.
    fn can_read(&self, target: &str) -> Predicate;

    /// Rule for editing the record identified by `target`.
    fn can_edit(&self, target: &str) -> Predicate;

    /// Rule for deleting the record identified by `target`.
    fn can_delete(&self, target: &str) -> Predicate;

    /// Rule for browsing the entity's listing. Browsing has no target.
    fn can_browse(&self) -> Predicate;

    /// Dispatch on the action label.
    fn predicate_for(&self, action: Action, target: &str) -> Predicate {
        match action {
            Action::Read => self.can_read(target),
            Action::Edit => self.can_edit(target),
            Action::Delete => self.can_delete(target),
            Action::Browse => self.can_browse(),
        }
    }
}
