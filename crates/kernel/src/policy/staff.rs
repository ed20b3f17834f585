//! Rule set for staff records.

use crate::policy::{EntityPolicy, Predicate};

/// Access rules for the "staff" entity.
///
/// Administrators may do anything. Managers may read, edit, and browse
/// staff records but may not delete them. Anyone else only reaches their
/// own record. Precedence: admin > manager > self > deny.
#[derive(Debug, Default)]
pub struct StaffPolicy;

impl StaffPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl EntityPolicy for StaffPolicy {
    fn entity(&self) -> &str {
        "staff"
    }

    fn can_read(&self, target: &str) -> Predicate {
        Predicate::Any(vec![
            Predicate::Admin,
            Predicate::Manager,
            Predicate::SelfIs(target.to_string()),
        ])
    }

    fn can_edit(&self, target: &str) -> Predicate {
        Predicate::Any(vec![
            Predicate::Admin,
            Predicate::Manager,
            Predicate::SelfIs(target.to_string()),
        ])
    }

    /// Managers are excluded here: removing staff accounts is reserved
    /// for administrators and the account holder.
    fn can_delete(&self, target: &str) -> Predicate {
        Predicate::Any(vec![
            Predicate::Admin,
            Predicate::SelfIs(target.to_string()),
        ])
    }

    /// Browsing has no target record, so the self rule cannot apply.
    fn can_browse(&self) -> Predicate {
        Predicate::Any(vec![Predicate::Admin, Predicate::Manager])
    }
}
