//! Route guard middleware and session extractor for axum.
//!
//! ```text
//! Request → guard_middleware → RouteGuard::evaluate(requirement, fresh session)
//!              │                      │
//!              │  Allow(session) ─────┴─> injects Session into extensions → handler
//!              └─ Redirect* ───────────> 303 See Other (login or role home)
//! ```
//!
//! The session is re-read on every request; nothing about an earlier
//! decision is remembered.
//!
//! # Example
//!
//! ```ignore
//! let dashboard = Router::new().route("/dashboard", get(dashboard_page));
//! let dashboard = require(dashboard, state.clone(), Requirement::Role(RoleKind::Aggregator));
//!
//! async fn dashboard_page(CurrentSession(session): CurrentSession) -> String {
//!     format!("Hello, {}!", session.display_name())
//! }
//! ```

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Redirect, Response},
    Json, Router,
};

use crate::adapters::http::auth::{handle_auth_error, AuthAppState};
use crate::domain::access::{GuardDecision, Requirement, Session};

/// Guard middleware state: the auth state plus the route's requirement.
#[derive(Clone)]
pub struct GuardState {
    pub auth: AuthAppState,
    pub requirement: Requirement,
}

/// Enforces `state.requirement` for the wrapped routes.
///
/// A slot backend failure answers 503 rather than guessing either way.
pub async fn guard_middleware(
    State(state): State<GuardState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = match state.auth.current_session(request.headers()).await {
        Ok(session) => session,
        Err(e) => return handle_auth_error(e),
    };

    match state.auth.guard().evaluate(state.requirement, session) {
        GuardDecision::Allow(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        GuardDecision::RedirectToLogin(to) | GuardDecision::RedirectToHome(to) => {
            tracing::debug!(path = %request.uri().path(), redirect = %to, "Route guard redirect");
            Redirect::to(&to).into_response()
        }
    }
}

/// Wraps every route in `router` with the guard for `requirement`.
pub fn require<S>(router: Router<S>, auth: AuthAppState, requirement: Requirement) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(from_fn_with_state(
        GuardState { auth, requirement },
        guard_middleware,
    ))
}

/// Extractor for the session the guard admitted.
///
/// Only valid behind `guard_middleware`; elsewhere it answers 401.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(CurrentSession)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({
                        "error": "Authentication required",
                        "code": "UNAUTHENTICATED"
                    })),
                )
                    .into_response()
            })
    }
}
