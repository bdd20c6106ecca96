//! Route guard: a stateless three-way access decision.
//!
//! ```text
//! no session                     -> RedirectToLogin
//! session, requirement not met   -> RedirectToHome(role home)
//! session, requirement met       -> Allow(session)
//! ```
//!
//! The guard holds no memory of earlier decisions. Sessions can expire
//! between two navigations, so every navigation must hand the guard a
//! freshly read session.

use super::{RoleKind, Session};

/// What a protected route asks of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// Any live session.
    Authenticated,
    /// A live session with exactly this role.
    Role(RoleKind),
}

impl Requirement {
    pub fn is_satisfied_by(&self, session: &Session) -> bool {
        match self {
            Requirement::Authenticated => true,
            Requirement::Role(kind) => session.has_role(*kind),
        }
    }
}

/// Outcome of evaluating a requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the target. Carries the session that satisfied the check.
    Allow(Session),
    /// Nobody is logged in.
    RedirectToLogin(String),
    /// Logged in, but the role may not view this route.
    RedirectToHome(String),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow(_))
    }

    /// Redirect target, if the decision is a redirect.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            GuardDecision::Allow(_) => None,
            GuardDecision::RedirectToLogin(to) | GuardDecision::RedirectToHome(to) => Some(to),
        }
    }
}

/// Where the guard sends callers it turns away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMap {
    pub login: String,
    pub aggregator_home: String,
    pub brand_home: String,
}

impl RouteMap {
    pub fn home_for(&self, kind: RoleKind) -> &str {
        match kind {
            RoleKind::Aggregator => &self.aggregator_home,
            RoleKind::Brand => &self.brand_home,
        }
    }
}

impl Default for RouteMap {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            aggregator_home: "/dashboard".to_string(),
            brand_home: "/campaigns".to_string(),
        }
    }
}

/// Stateless route guard.
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    routes: RouteMap,
}

impl RouteGuard {
    pub fn new(routes: RouteMap) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &RouteMap {
        &self.routes
    }

    /// Decides access for `requirement` given the caller's current session.
    pub fn evaluate(&self, requirement: Requirement, session: Option<Session>) -> GuardDecision {
        match session {
            None => GuardDecision::RedirectToLogin(self.routes.login.clone()),
            Some(session) if requirement.is_satisfied_by(&session) => {
                GuardDecision::Allow(session)
            }
            Some(session) => {
                let home = self.routes.home_for(session.role().kind());
                tracing::debug!(
                    session_id = %session.session_id(),
                    role = %session.role(),
                    ?requirement,
                    "Role does not satisfy route requirement, redirecting home"
                );
                GuardDecision::RedirectToHome(home.to_string())
            }
        }
    }
}
