//! Integration tests for the authorization gate.
//!
//! ## Test Coverage
//!
//! - Denial before the wrapped router is ever consulted
//! - Fail-open for paths with no registered requirement
//! - No route-existence leak through denials
//! - Explicit target overrides for authorization
//! - Role rule sets exercised end to end (admin/manager/staff)
//! - Coverage audit via `unguarded_paths`
//! - Menu filtering and history revocation

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use varco_kernel::{
    AccessError, AccessGate, Action, CatalogPolicy, MenuEntry, MenuRegistry, NO_ACTOR_ID,
    NavError, PolicyError, PolicyService, RouteParams, Router, SessionProvider, StaffPolicy, View,
    ViewHost,
};
use varco_test_utils::{
    RecordingHost, ScriptedSession, admin_actor, assert as check, manager_actor, staff_actor,
};

struct Fixture {
    gate: AccessGate,
    session: Arc<ScriptedSession>,
    host: Arc<RecordingHost>,
    handler_calls: Arc<AtomicUsize>,
}

/// Standard route table: a public dashboard plus guarded staff and
/// catalog panels. Every staff record path is bound to its own literal
/// requirement, since requirement lookup is not pattern-aware.
fn fixture() -> Fixture {
    let session = Arc::new(ScriptedSession::new());
    let host = Arc::new(RecordingHost::new());
    let handler_calls = Arc::new(AtomicUsize::new(0));

    let mut router = Router::new(Arc::clone(&host) as Arc<dyn ViewHost>);
    let calls = Arc::clone(&handler_calls);
    let counting = move |name: &'static str| {
        let calls = Arc::clone(&calls);
        let handler: varco_kernel::Handler = Arc::new(move |params: &RouteParams| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(View::new(name, name).with_model(serde_json::json!(params)))
        });
        handler
    };

    router.register("/dashboard", counting("dashboard"));
    router.register("/staffs", counting("staff_list"));
    router.register_pattern("/staffs/{id}", counting("staff_detail")).unwrap();
    router.register_pattern("/staffs/edit/{id}", counting("staff_edit")).unwrap();
    router.register("/catalog", counting("catalog_list"));

    let policy = PolicyService::new(Arc::clone(&session) as Arc<dyn SessionProvider>);
    let mut gate = AccessGate::new(router, policy);
    gate.register_policy(Arc::new(StaffPolicy::new()));
    gate.register_policy(Arc::new(CatalogPolicy::new()));

    gate.register_permission("/staffs", "staff", Action::Browse, "0").unwrap();
    gate.register_permission("/catalog", "catalog", Action::Browse, "0").unwrap();
    for id in ["3", "7"] {
        gate.register_permission(format!("/staffs/{id}"), "staff", Action::Read, id)
            .unwrap();
        gate.register_permission(format!("/staffs/edit/{id}"), "staff", Action::Edit, id)
            .unwrap();
    }

    Fixture {
        gate,
        session,
        host,
        handler_calls,
    }
}

// -----------------------------------------------------------------------------
// Denial semantics
// -----------------------------------------------------------------------------

#[test]
fn denied_navigation_never_reaches_the_router() {
    let mut fx = fixture();
    fx.session.set(staff_actor(5));

    let err = fx.gate.navigate("/staffs/7").unwrap_err();
    check::nav_denied(&err, 5);

    assert_eq!(fx.handler_calls.load(Ordering::SeqCst), 0);
    assert!(fx.host.replaced().is_empty());
    assert_eq!(fx.gate.router().current_path(), None);
}

#[test]
fn unauthenticated_guarded_navigation_denies_with_sentinel() {
    let mut fx = fixture();

    let err = fx.gate.navigate("/staffs").unwrap_err();
    check::nav_denied(&err, NO_ACTOR_ID);
}

#[test]
fn denial_does_not_leak_route_existence() {
    let mut fx = fixture();
    fx.session.set(staff_actor(5));

    // "/staffs/7" resolves to a real route; bind the same requirement to
    // a path with no route behind it.
    fx.gate
        .register_permission("/staffs/404", "staff", Action::Read, "404")
        .unwrap();

    let real = fx.gate.navigate("/staffs/7").unwrap_err();
    let ghost = fx.gate.navigate("/staffs/404").unwrap_err();

    let (NavError::Denied(real), NavError::Denied(ghost)) = (real, ghost) else {
        panic!("expected two denials");
    };
    // Identical shape apart from the target-independent fields.
    assert_eq!(real.actor_id, ghost.actor_id);
    assert_eq!(real.entity, ghost.entity);
    assert_eq!(real.action, ghost.action);
}

#[test]
fn unguarded_unknown_path_is_a_not_found() {
    let mut fx = fixture();
    fx.session.set(staff_actor(5));

    let err = fx.gate.navigate("/nowhere").unwrap_err();
    assert!(matches!(err, NavError::NotFound { .. }));
}

// -----------------------------------------------------------------------------
// Fail-open by omission
// -----------------------------------------------------------------------------

#[test]
fn paths_without_requirements_are_public() {
    // Security-relevant default: no requirement bound to "/dashboard"
    // means the gate performs no check at all, even signed out.
    let mut fx = fixture();

    let view = fx.gate.navigate("/dashboard").unwrap();
    assert_eq!(view.name, "dashboard");
    assert_eq!(fx.handler_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn unregistered_record_path_slips_past_the_gate() {
    // The documented literal-lookup gap: "/staffs/9" has a matching
    // route pattern but no requirement of its own, so it dispatches
    // unchecked. The audit below is how wiring code catches this.
    let mut fx = fixture();
    fx.session.set(staff_actor(5));

    let view = fx.gate.navigate("/staffs/9").unwrap();
    assert_eq!(view.model["id"], "9");
}

#[test]
fn unguarded_paths_reports_exactly_the_unbound_routes() {
    let fx = fixture();
    // The templates are registered routes but carry no requirement of
    // their own in this fixture; "/dashboard" is deliberately public.
    assert_eq!(
        fx.gate.unguarded_paths(),
        ["/dashboard", "/staffs/edit/{id}", "/staffs/{id}"]
    );
}

// -----------------------------------------------------------------------------
// Rule sets through the gate
// -----------------------------------------------------------------------------

#[test]
fn admin_passes_every_guarded_path() {
    let mut fx = fixture();
    fx.session.set(admin_actor(1));

    for path in ["/staffs", "/catalog", "/staffs/7", "/staffs/edit/7"] {
        assert!(fx.gate.navigate(path).is_ok(), "admin blocked at {path}");
    }
}

#[test]
fn manager_browses_but_cannot_edit_foreign_record_owner_can() {
    let mut fx = fixture();

    fx.session.set(manager_actor(2));
    assert!(fx.gate.navigate("/staffs").is_ok());
    assert!(fx.gate.navigate("/staffs/7").is_ok());
    assert!(fx.gate.navigate("/staffs/edit/7").is_ok());

    fx.session.set(staff_actor(7));
    assert!(fx.gate.navigate("/staffs/edit/7").is_ok());
    let err = fx.gate.navigate("/staffs").unwrap_err();
    check::nav_denied(&err, 7);
}

#[test]
fn authenticated_actor_browses_catalog() {
    let mut fx = fixture();
    fx.session.set(staff_actor(5));

    assert!(fx.gate.navigate("/catalog").is_ok());
}

// -----------------------------------------------------------------------------
// Target overrides
// -----------------------------------------------------------------------------

#[test]
fn explicit_target_overrides_the_requirement_default() {
    let mut fx = fixture();
    fx.session.set(staff_actor(5));

    // The requirement on "/staffs/7" defaults to target "7", denying
    // actor 5; an explicit target of "5" authorizes the concrete
    // instance instead.
    check::nav_denied(&fx.gate.navigate("/staffs/7").unwrap_err(), 5);

    let view = fx.gate.navigate_with_target("/staffs/7", "5").unwrap();
    // Captures still come from the path, not the override.
    check::model_eq(&view, &serde_json::json!({ "id": "7" }));
}

#[test]
fn override_applies_to_a_single_call() {
    let mut fx = fixture();
    fx.session.set(staff_actor(5));

    assert!(fx.gate.navigate_with_target("/staffs/7", "5").is_ok());
    check::nav_denied(&fx.gate.navigate("/staffs/7").unwrap_err(), 5);
}

// -----------------------------------------------------------------------------
// Menu filtering
// -----------------------------------------------------------------------------

#[test]
fn menu_hides_denied_entries_and_keeps_public_ones() {
    let fx = fixture();
    let mut menu = MenuRegistry::new();
    menu.add(MenuEntry::new("/dashboard", "Dashboard").with_weight(-10));
    menu.add(MenuEntry::new("/staffs", "Staff"));
    menu.add(MenuEntry::new("/catalog", "Catalog").with_weight(10));
    menu.add(MenuEntry::new("/internal", "Internal").hidden());

    // Signed out: only the public entry survives.
    let paths: Vec<&str> = menu
        .visible(&fx.gate)
        .unwrap()
        .iter()
        .map(|e| e.path.as_str())
        .collect();
    assert_eq!(paths, ["/dashboard"]);

    // A manager sees the guarded entries too, in weight order.
    fx.session.set(manager_actor(2));
    let paths: Vec<&str> = menu
        .visible(&fx.gate)
        .unwrap()
        .iter()
        .map(|e| e.path.as_str())
        .collect();
    assert_eq!(paths, ["/dashboard", "/staffs", "/catalog"]);
}

#[test]
fn menu_propagates_predicate_evaluation_errors() {
    let mut fx = fixture();
    fx.session.set(staff_actor(5));

    // A requirement whose default target cannot parse as an actor id is
    // a wiring bug: filtering must surface it, not render it as hidden.
    fx.gate
        .register_permission("/staffs/corrupt", "staff", Action::Read, "not-a-number")
        .unwrap();

    let mut menu = MenuRegistry::new();
    menu.add(MenuEntry::new("/dashboard", "Dashboard"));
    menu.add(MenuEntry::new("/staffs/corrupt", "Corrupt"));

    let err = menu.visible(&fx.gate).unwrap_err();
    assert!(matches!(
        err,
        AccessError::Evaluation(PolicyError::InvalidTarget { .. })
    ));
}

// -----------------------------------------------------------------------------
// History revocation
// -----------------------------------------------------------------------------

#[test]
fn back_drops_revoked_entries() {
    let mut fx = fixture();
    fx.session.set(manager_actor(2));

    fx.gate.navigate("/dashboard").unwrap();
    fx.gate.navigate("/staffs").unwrap();
    fx.gate.navigate("/catalog").unwrap();

    // Demoted mid-session: "/staffs" now denies for actor 9, so back()
    // walks past it to the dashboard.
    fx.session.set(staff_actor(9));
    let view = fx.gate.back().unwrap().unwrap();
    assert_eq!(view.name, "dashboard");
    assert_eq!(fx.gate.router().current_path(), Some("/dashboard"));
}
