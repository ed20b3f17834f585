//! Navigation error types.

use thiserror::Error;

use crate::policy::{AccessError, Denied, PolicyError};

/// Errors surfaced by dispatch and navigation.
#[derive(Debug, Error)]
pub enum NavError {
    /// The path was never registered. A programmer error: route tables
    /// are wired at startup, so hitting this at runtime means a missing
    /// registration, not user input to recover from.
    #[error("no route registered for '{path}'")]
    NotFound { path: String },

    /// The access check failed. Expected and recoverable: the caller
    /// shows an access-denied message and navigation state is unchanged.
    #[error(transparent)]
    Denied(#[from] Denied),

    /// A predicate failed to evaluate. A policy-layer bug, propagated.
    #[error(transparent)]
    Evaluation(#[from] PolicyError),

    /// The route handler failed to produce a view. The view host was not
    /// touched.
    #[error("view handler failed for '{path}'")]
    Handler {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<AccessError> for NavError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Denied(denied) => NavError::Denied(denied),
            AccessError::Evaluation(e) => NavError::Evaluation(e),
        }
    }
}
