//! Varco test utilities.
//!
//! Helpers for integration testing: actor fixtures, a recording view
//! host, a scripted session provider, and assertion utilities for
//! access-check outcomes. Unlike mock types, these implement the
//! kernel's real traits so tests exercise actual dispatch behavior.

use parking_lot::{Mutex, RwLock};

use varco_kernel::actor::{Actor, Role};
use varco_kernel::session::SessionProvider;
use varco_kernel::view::{View, ViewHost};

/// Create an administrator actor.
pub fn admin_actor(id: i64) -> Actor {
    Actor::new(id, "admin", Role::Admin)
}

/// Create a manager actor.
pub fn manager_actor(id: i64) -> Actor {
    Actor::new(id, "manager", Role::Manager)
}

/// Create a plain staff actor.
pub fn staff_actor(id: i64) -> Actor {
    Actor::new(id, "staff", Role::Staff)
}

/// View host that records every replacement instead of rendering.
///
/// Lets tests assert both what was committed and that nothing was
/// committed on a failed dispatch.
#[derive(Debug, Default)]
pub struct RecordingHost {
    views: Mutex<Vec<View>>,
}

impl RecordingHost {
    /// Create a host with an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// All views committed so far, in order.
    pub fn replaced(&self) -> Vec<View> {
        self.views.lock().clone()
    }

    /// The most recently committed view.
    pub fn last(&self) -> Option<View> {
        self.views.lock().last().cloned()
    }
}

impl ViewHost for RecordingHost {
    fn replace(&self, view: View) {
        self.views.lock().push(view);
    }
}

/// Session provider scripted from the test body.
///
/// `set` and `clear` swap the actor between navigation calls, simulating
/// sign-in, sign-out, and mid-session revocation.
#[derive(Debug, Default)]
pub struct ScriptedSession {
    actor: RwLock<Option<Actor>>,
}

impl ScriptedSession {
    /// Create a session with no one signed in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with `actor` already signed in.
    pub fn signed_in(actor: Actor) -> Self {
        let session = Self::new();
        session.set(actor);
        session
    }

    /// Sign `actor` in.
    pub fn set(&self, actor: Actor) {
        *self.actor.write() = Some(actor);
    }

    /// Sign out.
    pub fn clear(&self) {
        *self.actor.write() = None;
    }
}

impl SessionProvider for ScriptedSession {
    fn current_actor(&self) -> Option<Actor> {
        self.actor.read().clone()
    }
}

/// Assertion helpers for access-check outcomes and committed views.
pub mod assert {
    use varco_kernel::NavError;
    use varco_kernel::policy::AccessError;
    use varco_kernel::view::View;

    /// Assert that a view's model equals the expected JSON.
    pub fn model_eq(view: &View, expected: &serde_json::Value) {
        assert_eq!(
            &view.model,
            expected,
            "model mismatch for view '{}':\nactual: {}\nexpected: {}",
            view.name,
            serde_json::to_string_pretty(&view.model).unwrap_or_default(),
            serde_json::to_string_pretty(expected).unwrap_or_default()
        );
    }

    /// Assert a navigation error is a denial carrying `actor_id`.
    pub fn nav_denied(err: &NavError, actor_id: i64) {
        match err {
            NavError::Denied(denied) => assert_eq!(
                denied.actor_id, actor_id,
                "denial carried actor {}, expected {}",
                denied.actor_id, actor_id
            ),
            other => panic!("expected denial, got: {other:?}"),
        }
    }

    /// Assert an access error is a denial carrying `actor_id`.
    pub fn access_denied(err: &AccessError, actor_id: i64) {
        match err {
            AccessError::Denied(denied) => assert_eq!(
                denied.actor_id, actor_id,
                "denial carried actor {}, expected {}",
                denied.actor_id, actor_id
            ),
            other => panic!("expected denial, got: {other:?}"),
        }
    }
}
