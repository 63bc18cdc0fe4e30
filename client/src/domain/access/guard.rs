//! Navigation guard combining the session with the access gate.

use super::RoutePermissions;
use crate::domain::Session;

/// Path segment that marks routes requiring a role check.
const PROTECTED_SEGMENT: &str = "/dashboard";

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested view.
    Allow,
    /// No session; send the user to the login page.
    RedirectToLogin,
    /// Signed in, but the role may not open the path.
    RedirectToUnauthorized,
}

impl RouteDecision {
    /// Target path for redirects.
    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin => Some("/"),
            Self::RedirectToUnauthorized => Some("/dashboard/unauthorized"),
        }
    }
}

/// Decide what happens when the shell navigates to `pathname`.
///
/// # Examples
/// ```
/// use doctrack::domain::{RouteDecision, RoutePermissions, Session, guard_route};
///
/// let decision = guard_route("/dashboard/inbox", &Session::anonymous(), &RoutePermissions::standard());
/// assert_eq!(decision, RouteDecision::RedirectToLogin);
/// ```
pub fn guard_route(pathname: &str, session: &Session, permissions: &RoutePermissions) -> RouteDecision {
    let Some(context) = session.context() else {
        return RouteDecision::RedirectToLogin;
    };
    if !pathname.contains(PROTECTED_SEGMENT) {
        return RouteDecision::Allow;
    }
    if permissions.is_authorized(pathname, Some(context.role())) {
        RouteDecision::Allow
    } else {
        RouteDecision::RedirectToUnauthorized
    }
}
