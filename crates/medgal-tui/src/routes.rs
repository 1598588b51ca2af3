//! Route guard: pure mapping from (requested path, session) to a target.
//!
//! All redirect rules live here so they are testable without a rendered
//! view. `resolve` is deterministic, side-effect free, and re-evaluated by
//! the reducer on every navigation event and every session change.

use medgal_core::session::SessionStore;
use medgal_core::types::UserType;

/// Top-level views of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    PatientDashboard,
    HospitalDashboard,
}

impl Route {
    /// All routes, for guard tests that sweep the matrix.
    pub fn all() -> &'static [Route] {
        &[
            Route::Landing,
            Route::Login,
            Route::Register,
            Route::PatientDashboard,
            Route::HospitalDashboard,
        ]
    }

    /// Canonical path for this route.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::PatientDashboard => "/patient-dashboard",
            Route::HospitalDashboard => "/hospital-dashboard",
        }
    }

    /// Parses a path; unrecognized paths yield `None`.
    pub fn from_path(path: &str) -> Option<Route> {
        match path {
            "/" => Some(Route::Landing),
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/patient-dashboard" => Some(Route::PatientDashboard),
            "/hospital-dashboard" => Some(Route::HospitalDashboard),
            _ => None,
        }
    }

    /// True if the route is only reachable with a current identity.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::PatientDashboard | Route::HospitalDashboard)
    }

    /// The role a role-specific route is restricted to.
    pub fn required_role(&self) -> Option<UserType> {
        match self {
            Route::PatientDashboard => Some(UserType::Patient),
            Route::HospitalDashboard => Some(UserType::Hospital),
            _ => None,
        }
    }

    /// The default dashboard for a role.
    pub fn dashboard_for(role: UserType) -> Route {
        match role {
            UserType::Patient => Route::PatientDashboard,
            UserType::Hospital => Route::HospitalDashboard,
        }
    }
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Session restore is still in flight; render a placeholder, decide
    /// nothing (prevents a flash-redirect to login).
    Pending,
    /// Navigate to this route.
    Goto(Route),
}

/// Resolves a requested path against the current session.
///
/// Rules, in order: defer while restoring; protected route without an
/// identity goes to login; a role mismatch silently lands on the identity's
/// own dashboard; unrecognized paths land on the public landing page;
/// otherwise the request passes through unchanged.
pub fn resolve(requested_path: &str, session: &SessionStore) -> Resolution {
    if session.is_restoring() {
        return Resolution::Pending;
    }

    let Some(route) = Route::from_path(requested_path) else {
        return Resolution::Goto(Route::Landing);
    };

    let Some(identity) = session.current() else {
        if route.requires_auth() {
            return Resolution::Goto(Route::Login);
        }
        return Resolution::Goto(route);
    };

    if let Some(required) = route.required_role()
        && required != identity.user_type
    {
        return Resolution::Goto(Route::dashboard_for(identity.user_type));
    }

    Resolution::Goto(route)
}

#[cfg(test)]
mod tests {
    use medgal_core::types::Identity;

    use super::*;

    fn empty_session(dir: &tempfile::TempDir) -> SessionStore {
        let mut session = SessionStore::new(dir.path().join("session.json"));
        session.initialize();
        session
    }

    fn session_with(dir: &tempfile::TempDir, role: UserType) -> SessionStore {
        let mut session = empty_session(dir);
        session.set_identity(Identity {
            user_id: 1,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            user_type: role,
            access_code: "AC-1".to_string(),
        });
        session
    }

    #[test]
    fn test_defers_while_restoring() {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionStore::new(dir.path().join("session.json"));
        assert!(session.is_restoring());

        for route in Route::all() {
            assert_eq!(resolve(route.path(), &session), Resolution::Pending);
        }
    }

    #[test]
    fn test_resolve_is_deterministic_and_does_not_mutate() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with(&dir, UserType::Patient);

        for route in Route::all() {
            let first = resolve(route.path(), &session);
            let second = resolve(route.path(), &session);
            assert_eq!(first, second);
        }
        // Session unchanged by resolution.
        assert_eq!(session.current().unwrap().user_id, 1);
        assert!(!session.is_restoring());
    }

    #[test]
    fn test_unauthenticated_never_lands_on_a_protected_route() {
        let dir = tempfile::tempdir().unwrap();
        let session = empty_session(&dir);

        for route in Route::all() {
            let Resolution::Goto(target) = resolve(route.path(), &session) else {
                panic!("settled session must decide");
            };
            assert!(
                !target.requires_auth(),
                "{} resolved to protected {:?}",
                route.path(),
                target
            );
        }
        assert_eq!(
            resolve("/patient-dashboard", &session),
            Resolution::Goto(Route::Login)
        );
        assert_eq!(
            resolve("/hospital-dashboard", &session),
            Resolution::Goto(Route::Login)
        );
    }

    #[test]
    fn test_role_mismatch_redirects_to_own_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let patient = session_with(&dir, UserType::Patient);
        assert_eq!(
            resolve("/hospital-dashboard", &patient),
            Resolution::Goto(Route::PatientDashboard)
        );

        let dir = tempfile::tempdir().unwrap();
        let hospital = session_with(&dir, UserType::Hospital);
        assert_eq!(
            resolve("/patient-dashboard", &hospital),
            Resolution::Goto(Route::HospitalDashboard)
        );
    }

    #[test]
    fn test_no_role_ever_reaches_the_other_dashboard() {
        for (role, forbidden) in [
            (UserType::Patient, Route::HospitalDashboard),
            (UserType::Hospital, Route::PatientDashboard),
        ] {
            let dir = tempfile::tempdir().unwrap();
            let session = session_with(&dir, role);
            for route in Route::all() {
                let Resolution::Goto(target) = resolve(route.path(), &session) else {
                    panic!("settled session must decide");
                };
                assert_ne!(target, forbidden, "{role:?} reached {forbidden:?}");
            }
        }
    }

    #[test]
    fn test_unrecognized_path_lands_on_landing() {
        let dir = tempfile::tempdir().unwrap();
        let session = empty_session(&dir);
        assert_eq!(resolve("/nope", &session), Resolution::Goto(Route::Landing));
        assert_eq!(resolve("", &session), Resolution::Goto(Route::Landing));
    }

    #[test]
    fn test_matching_requests_pass_through_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with(&dir, UserType::Hospital);
        assert_eq!(
            resolve("/hospital-dashboard", &session),
            Resolution::Goto(Route::HospitalDashboard)
        );
        assert_eq!(resolve("/login", &session), Resolution::Goto(Route::Login));
        assert_eq!(resolve("/", &session), Resolution::Goto(Route::Landing));
    }
}
