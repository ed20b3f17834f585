//! Session access for authorization checks.

use parking_lot::RwLock;

use crate::actor::Actor;

/// Source of the current actor snapshot.
///
/// The policy service fetches a fresh snapshot on every check and never
/// caches it, so sign-in and sign-out take effect on the next evaluation.
pub trait SessionProvider: Send + Sync {
    /// The currently authenticated actor, or `None` when signed out.
    fn current_actor(&self) -> Option<Actor>;
}

/// Default in-process session holder.
///
/// Uses `parking_lot::RwLock` rather than `std::sync::RwLock` because:
/// - No poisoning: a panic while signed in won't wedge later checks.
/// - Short critical sections: callers only clone the snapshot out.
#[derive(Debug, Default)]
pub struct SessionHolder {
    current: RwLock<Option<Actor>>,
}

impl SessionHolder {
    /// Create a holder with no one signed in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign an actor in, replacing any previous session.
    pub fn sign_in(&self, actor: Actor) {
        *self.current.write() = Some(actor);
    }

    /// Sign the current actor out.
    pub fn sign_out(&self) {
        *self.current.write() = None;
    }
}

impl SessionProvider for SessionHolder {
    fn current_actor(&self) -> Option<Actor> {
        self.current.read().clone()
    }
}
