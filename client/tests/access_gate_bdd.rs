//! Behaviour tests for the dashboard access gate.
//!
//! These scenarios drive `guard_route` and the menu filter with signed-in
//! and signed-out sessions against the shipped rule table.

use std::cell::RefCell;

use doctrack::domain::{
    Role, RouteDecision, RoutePermissions, Session, UnlistedRoutePolicy, guard_route,
    standard_menu,
};
use doctrack::test_support::session_with_role;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

struct AccessGateWorld {
    permissions: RefCell<RoutePermissions>,
    session: RefCell<Session>,
    decision: RefCell<Option<RouteDecision>>,
    menu: RefCell<Vec<String>>,
}

impl AccessGateWorld {
    fn new() -> Self {
        Self {
            permissions: RefCell::new(RoutePermissions::standard()),
            session: RefCell::new(Session::anonymous()),
            decision: RefCell::new(None),
            menu: RefCell::new(Vec::new()),
        }
    }

    fn decision(&self) -> RouteDecision {
        self.decision
            .borrow()
            .expect("a navigation should have been attempted")
    }
}

fn parse_role(raw: &str) -> Role {
    raw.parse().expect("scenario role should be valid")
}

#[fixture]
fn world() -> AccessGateWorld {
    AccessGateWorld::new()
}

#[given("the standard access rules")]
fn the_standard_access_rules(world: &AccessGateWorld) {
    *world.permissions.borrow_mut() = RoutePermissions::standard();
}

#[given("unlisted routes are denied")]
fn unlisted_routes_are_denied(world: &AccessGateWorld) {
    world
        .permissions
        .replace_with(|current| current.clone().with_unlisted_policy(UnlistedRoutePolicy::Deny));
}

#[given("a rule granting {role} access to {prefix}")]
fn a_rule_granting_access(world: &AccessGateWorld, role: String, prefix: String) {
    world
        .permissions
        .borrow_mut()
        .insert_rule(prefix, [parse_role(&role)])
        .expect("rule should be accepted");
}

#[given("a session signed in as {role}")]
fn a_session_signed_in_as(world: &AccessGateWorld, role: String) {
    *world.session.borrow_mut() = session_with_role(parse_role(&role));
}

#[given("no signed-in session")]
fn no_signed_in_session(world: &AccessGateWorld) {
    *world.session.borrow_mut() = Session::anonymous();
}

#[when("the user navigates to {path}")]
fn the_user_navigates_to(world: &AccessGateWorld, path: String) {
    let decision = guard_route(&path, &world.session.borrow(), &world.permissions.borrow());
    *world.decision.borrow_mut() = Some(decision);
}

#[when("the menu is built")]
fn the_menu_is_built(world: &AccessGateWorld) {
    let items = standard_menu();
    let role = world.session.borrow().context().map(|context| context.role());
    let labels = world
        .permissions
        .borrow()
        .filter_menu(&items, role)
        .map(|item| item.label().to_owned())
        .collect();
    *world.menu.borrow_mut() = labels;
}

#[then("the navigation is allowed")]
fn the_navigation_is_allowed(world: &AccessGateWorld) {
    assert_eq!(world.decision(), RouteDecision::Allow);
}

#[then("the user is redirected to {target}")]
fn the_user_is_redirected_to(world: &AccessGateWorld, target: String) {
    assert_eq!(world.decision().redirect_target(), Some(target.as_str()));
}

#[then("the menu lists {labels}")]
fn the_menu_lists(world: &AccessGateWorld, labels: String) {
    let expected: Vec<String> = labels.split(", ").map(str::to_owned).collect();
    assert_eq!(*world.menu.borrow(), expected);
}

#[scenario(
    path = "tests/features/access_gate.feature",
    name = "Auditors may open reports"
)]
fn auditors_may_open_reports(world: AccessGateWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/access_gate.feature",
    name = "Auditors may not register documents"
)]
fn auditors_may_not_register_documents(world: AccessGateWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/access_gate.feature",
    name = "Signed-out users are sent to the login page"
)]
fn signed_out_users_are_sent_to_the_login_page(world: AccessGateWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/access_gate.feature",
    name = "The most specific rule wins"
)]
fn the_most_specific_rule_wins(world: AccessGateWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/access_gate.feature",
    name = "Unlisted dashboard routes follow the deny policy"
)]
fn unlisted_dashboard_routes_follow_the_deny_policy(world: AccessGateWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/access_gate.feature",
    name = "Paths outside the dashboard skip the role check"
)]
fn paths_outside_the_dashboard_skip_the_role_check(world: AccessGateWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/access_gate.feature",
    name = "The menu lists only reachable entries"
)]
fn the_menu_lists_only_reachable_entries(world: AccessGateWorld) {
    drop(world);
}
