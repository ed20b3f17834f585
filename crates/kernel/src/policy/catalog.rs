//! Rule set for catalog records.

use crate::policy::{EntityPolicy, Predicate};

/// Access rules for the "catalog" entity.
///
/// Catalog records are shared reference data: any authenticated actor may
/// read and browse them, while changes are reserved for managers and
/// administrators. Ownership does not apply, so there is no self rule —
/// unlike [`crate::policy::StaffPolicy`], managers may also delete.
#[derive(Debug, Default)]
pub struct CatalogPolicy;

impl CatalogPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl EntityPolicy for CatalogPolicy {
    fn entity(&self) -> &str {
        "catalog"
    }

    fn can_read(&self, _target: &str) -> Predicate {
        Predicate::Authenticated
    }

    fn can_edit(&self, _target: &str) -> Predicate {
        Predicate::Any(vec![Predicate::Admin, Predicate::Manager])
    }

    fn can_delete(&self, _target: &str) -> Predicate {
        Predicate::Any(vec![Predicate::Admin, Predicate::Manager])
    }

    fn can_browse(&self) -> Predicate {
        Predicate::Authenticated
    }
}
