//! Route guards
//!
//! Which route a session in a given phase must be sent to, if any. The
//! table is evaluated after every state or route change; following its
//! answer once always lands on a route it leaves alone.

use serde::Serialize;

use super::state::SessionPhase;
use crate::routing::{has_prefix, path_only};

pub const LOGIN_ROUTE: &str = "/login";
pub const REGISTER_ROUTE: &str = "/register";
pub const DASHBOARD_ROUTE: &str = "/dashboard";
pub const ONBOARDING_ROUTE: &str = "/onboarding";

/// Route families the guard distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    /// Login and registration pages
    Auth,
    Dashboard,
    Onboarding,
    /// Everything else (marketing pages, docs, embeds)
    Public,
}

impl RouteKind {
    pub fn classify(path: &str) -> Self {
        let path = path_only(path);
        if has_prefix(path, DASHBOARD_ROUTE) {
            RouteKind::Dashboard
        } else if has_prefix(path, ONBOARDING_ROUTE) {
            RouteKind::Onboarding
        } else if has_prefix(path, LOGIN_ROUTE) || has_prefix(path, REGISTER_ROUTE) {
            RouteKind::Auth
        } else {
            RouteKind::Public
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, RouteKind::Dashboard | RouteKind::Onboarding)
    }
}

/// Redirect target for `phase` on `path`, or `None` to stay put.
///
/// While the profile is loading nothing moves.
pub fn redirect_for(phase: SessionPhase, path: &str) -> Option<&'static str> {
    use RouteKind::*;
    use SessionPhase::*;

    match (phase, RouteKind::classify(path)) {
        (Loading, _) => None,
        (Unauthenticated, Dashboard | Onboarding) => Some(LOGIN_ROUTE),
        (AuthenticatedOnboarding, Auth | Dashboard) => Some(ONBOARDING_ROUTE),
        (AuthenticatedComplete, Auth | Onboarding) => Some(DASHBOARD_ROUTE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATHS: &[&str] = &[
        "/",
        "/pricing",
        "/login",
        "/login?next=/dashboard",
        "/register",
        "/dashboard",
        "/dashboard/",
        "/dashboard/phone-numbers",
        "/dashboard/calls?page=2",
        "/dashboards",
        "/onboarding",
        "/onboarding/step-3",
        "/embed/agt_1",
    ];

    #[test]
    fn test_classify() {
        assert_eq!(RouteKind::classify("/dashboard/x"), RouteKind::Dashboard);
        assert_eq!(RouteKind::classify("/dashboards"), RouteKind::Public);
        assert_eq!(RouteKind::classify("/onboarding#top"), RouteKind::Onboarding);
        assert_eq!(RouteKind::classify("/register"), RouteKind::Auth);
        assert_eq!(RouteKind::classify("/"), RouteKind::Public);
    }

    #[test]
    fn test_unauthenticated_only_leaves_protected_routes() {
        for path in PATHS {
            let target = redirect_for(SessionPhase::Unauthenticated, path);
            if RouteKind::classify(path).is_protected() {
                assert_eq!(target, Some(LOGIN_ROUTE), "{path}");
            } else {
                assert_eq!(target, None, "{path}");
            }
        }
    }

    #[test]
    fn test_onboarding_users_kept_out_of_dashboard() {
        for path in PATHS {
            if RouteKind::classify(path) == RouteKind::Dashboard {
                assert_eq!(
                    redirect_for(SessionPhase::AuthenticatedOnboarding, path),
                    Some(ONBOARDING_ROUTE),
                    "{path}"
                );
            }
        }
    }

    #[test]
    fn test_complete_users_leave_onboarding_and_login() {
        assert_eq!(
            redirect_for(SessionPhase::AuthenticatedComplete, "/onboarding"),
            Some(DASHBOARD_ROUTE)
        );
        assert_eq!(
            redirect_for(SessionPhase::AuthenticatedComplete, "/login"),
            Some(DASHBOARD_ROUTE)
        );
        assert_eq!(
            redirect_for(SessionPhase::AuthenticatedOnboarding, "/login"),
            Some(ONBOARDING_ROUTE)
        );
        assert_eq!(
            redirect_for(SessionPhase::AuthenticatedComplete, "/dashboard/calls"),
            None
        );
    }

    #[test]
    fn test_loading_never_redirects() {
        for path in PATHS {
            assert_eq!(redirect_for(SessionPhase::Loading, path), None, "{path}");
        }
    }

    #[test]
    fn test_public_routes_never_redirect() {
        for phase in SessionPhase::ALL {
            for path in ["/", "/pricing", "/dashboards", "/embed/agt_1"] {
                assert_eq!(redirect_for(phase, path), None, "{phase} {path}");
            }
        }
    }

    #[test]
    fn test_redirects_are_idempotent() {
        for phase in SessionPhase::ALL {
            for path in PATHS {
                if let Some(target) = redirect_for(phase, path) {
                    assert_eq!(
                        redirect_for(phase, target),
                        None,
                        "{phase}: {path} -> {target} redirects again"
                    );
                }
            }
        }
    }
}
