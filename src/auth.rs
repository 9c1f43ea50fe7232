//! Explicit sign-in session and route guard.
//!
//! Views receive this session by injection instead of reading ambient
//! provider state; it is created at app start and torn down on sign-out.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Paths reachable without a signed-in session.
const PUBLIC_ROUTES: &[&str] = &["/login", "/signup"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    pub id: Uuid,
    pub email: String,
    pub signed_in_at: SystemTime,
}

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    SignedOut,
    SignedIn(UserSession),
}

/// Where a navigation attempt should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Allowed,
    RedirectToLogin,
    RedirectToDashboard,
}

#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    state: SessionState,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&mut self, email: impl Into<String>) -> &UserSession {
        self.state = SessionState::SignedIn(UserSession {
            id: Uuid::new_v4(),
            email: email.into(),
            signed_in_at: SystemTime::now(),
        });
        match &self.state {
            SessionState::SignedIn(user) => user,
            SessionState::SignedOut => unreachable!(),
        }
    }

    pub fn sign_out(&mut self) {
        self.state = SessionState::SignedOut;
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self.state, SessionState::SignedIn(_))
    }

    pub fn user(&self) -> Option<&UserSession> {
        match &self.state {
            SessionState::SignedIn(user) => Some(user),
            SessionState::SignedOut => None,
        }
    }

    /// Route guard: public routes redirect signed-in users to the dashboard;
    /// everything else requires a session.
    pub fn route_access(&self, path: &str) -> RouteAccess {
        let public = PUBLIC_ROUTES.iter().any(|route| path.starts_with(route));
        match (public, self.is_signed_in()) {
            (true, true) => RouteAccess::RedirectToDashboard,
            (true, false) => RouteAccess::Allowed,
            (false, true) => RouteAccess::Allowed,
            (false, false) => RouteAccess::RedirectToLogin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_out_is_redirected_from_dashboard() {
        let session = AuthSession::new();
        assert_eq!(session.route_access("/dashboard"), RouteAccess::RedirectToLogin);
        assert_eq!(session.route_access("/login"), RouteAccess::Allowed);
        assert_eq!(session.route_access("/signup"), RouteAccess::Allowed);
    }

    #[test]
    fn sign_in_and_out_lifecycle() {
        let mut session = AuthSession::new();
        let user = session.sign_in("ops@example.com");
        assert_eq!(user.email, "ops@example.com");
        assert!(session.is_signed_in());
        assert_eq!(session.route_access("/dashboard/health"), RouteAccess::Allowed);
        assert_eq!(session.route_access("/login"), RouteAccess::RedirectToDashboard);

        session.sign_out();
        assert!(!session.is_signed_in());
        assert!(session.user().is_none());
    }
}
