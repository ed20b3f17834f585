//! Actor identity and role model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel actor id reported in denials when no actor is signed in.
///
/// Real actor ids are non-negative; `-1` never identifies an account.
pub const NO_ACTOR_ID: i64 = -1;

/// Role assigned to an actor.
///
/// An actor holds exactly one role; the rule sets in [`crate::policy`]
/// resolve roles in precedence order admin > manager > staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Staff,
}

impl Role {
    /// Check if this is the administrator role.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Check if this is the manager role.
    pub fn is_manager(self) -> bool {
        matches!(self, Role::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Staff => "staff",
        };
        f.write_str(name)
    }
}

/// Error parsing a role name.
#[derive(Debug, Clone, Error)]
#[error("unknown role '{0}', expected admin, manager, or staff")]
pub struct UnknownRole(String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "staff" => Ok(Role::Staff),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// The authenticated identity attempting an action.
///
/// Always a live snapshot taken from the session at evaluation time;
/// the authorization components never hold one across checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub name: String,
    pub role: Role,
    /// Free-form profile attributes; custom rules may inspect these.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Actor {
    /// Create an actor with empty profile attributes.
    pub fn new(id: i64, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            data: serde_json::Value::Null,
        }
    }

    /// Attach profile attributes.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}
