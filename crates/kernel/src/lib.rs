//! Varco Panel Kernel Library
//!
//! Navigation dispatch and access policy for the Varco admin panels:
//! route patterns, the router, the policy service, per-entity rule sets,
//! and the authorization gate that ties them together. The `varco` binary
//! wraps this in an interactive console shell.

pub mod actor;
pub mod config;
pub mod error;
pub mod gate;
pub mod menu;
pub mod policy;
pub mod route;
pub mod session;
pub mod view;

pub use actor::{Actor, NO_ACTOR_ID, Role};
pub use config::Config;
pub use error::NavError;
pub use gate::{AccessGate, GateError};
pub use menu::{MenuEntry, MenuRegistry};
pub use policy::{
    AccessError, Action, AuthorizedActor, CatalogPolicy, Denied, EntityPolicy, PolicyError,
    PolicyService, Predicate, StaffPolicy,
};
pub use route::{Handler, PatternError, Phase, RouteParams, RoutePattern, Router};
pub use session::{SessionHolder, SessionProvider};
pub use view::{View, ViewHost};
