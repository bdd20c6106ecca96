//! HTTP routes for the auth endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{current_session, login, logout, AuthAppState};

/// Creates the auth router, meant to be nested under `/auth`.
pub fn auth_routes(state: AuthAppState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(current_session))
        .with_state(state)
}
