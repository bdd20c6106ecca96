//! HTTP handlers for the auth endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::cookie::{CookieSettings, CookieSigner};
use crate::application::{
    LoginCommand, LoginHandler, LogoutCommand, LogoutHandler, SessionServices,
};
use crate::domain::access::{RouteGuard, Session};
use crate::domain::foundation::AuthError;
use crate::ports::SlotKey;

use super::dto::{ErrorResponse, LoginRequest, SessionEnvelope};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// Shared state for the auth endpoints and the route guard middleware.
#[derive(Clone)]
pub struct AuthAppState {
    login_handler: Arc<LoginHandler>,
    logout_handler: Arc<LogoutHandler>,
    sessions: SessionServices,
    signer: CookieSigner,
    cookie: CookieSettings,
    guard: RouteGuard,
}

impl AuthAppState {
    pub fn new(
        login_handler: Arc<LoginHandler>,
        sessions: SessionServices,
        signer: CookieSigner,
        cookie: CookieSettings,
        guard: RouteGuard,
    ) -> Self {
        Self {
            login_handler,
            logout_handler: Arc::new(LogoutHandler::new(sessions.clone())),
            sessions,
            signer,
            cookie,
            guard,
        }
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    pub fn sessions(&self) -> &SessionServices {
        &self.sessions
    }

    /// Slot key for the request's cookie, if it carries a valid signature.
    pub fn client_key(&self, headers: &HeaderMap) -> Option<SlotKey> {
        let value = self.cookie.read(headers)?;
        match self.signer.verify(value) {
            Some(token) => Some(CookieSigner::slot_key(token)),
            None => {
                tracing::debug!("Ignoring session cookie with invalid signature");
                None
            }
        }
    }

    /// Live session of the calling client.
    pub async fn current_session(&self, headers: &HeaderMap) -> Result<Option<Session>, AuthError> {
        match self.client_key(headers) {
            Some(key) => self.sessions.accessor(key).current().await,
            None => Ok(None),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /auth/login - Validate credentials and start a session
pub async fn login(
    State(state): State<AuthAppState>,
    headers: HeaderMap,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected malformed login body");
            return (rejection.status(), Json(ErrorResponse::invalid_request())).into_response();
        }
    };

    // Rotate the token on every login so a pre-login cookie never names the new session
    let token = CookieSigner::new_token();
    let cmd = LoginCommand {
        identifier: req.identifier,
        secret: req.secret,
        slot_key: CookieSigner::slot_key(&token),
    };

    let session = match state.login_handler.handle(cmd).await {
        Ok(session) => session,
        Err(e) => return handle_auth_error(e),
    };

    if let Some(previous) = state.client_key(&headers) {
        if let Err(e) = state.sessions.accessor(previous).logout().await {
            tracing::warn!(error = %e, "Failed to clear previous session after login");
        }
    }

    tracing::info!(
        identifier = %session.identifier(),
        role = %session.role(),
        session_id = %session.session_id(),
        "Login succeeded"
    );

    let mut response = (
        StatusCode::OK,
        Json(SessionEnvelope {
            session: Some(session),
        }),
    )
        .into_response();
    if let Some(cookie) = state.cookie.set_header(&state.signer.sign(&token)) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

/// POST /auth/logout - End the caller's session
pub async fn logout(State(state): State<AuthAppState>, headers: HeaderMap) -> Response {
    if let Some(slot_key) = state.client_key(&headers) {
        if let Err(e) = state.logout_handler.handle(LogoutCommand { slot_key }).await {
            return handle_auth_error(e);
        }
    }

    let mut response = StatusCode::NO_CONTENT.into_response();
    if let Some(cookie) = state.cookie.clear_header() {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

/// GET /auth/session - Current session or null
pub async fn current_session(State(state): State<AuthAppState>, headers: HeaderMap) -> Response {
    match state.current_session(&headers).await {
        Ok(session) => (StatusCode::OK, Json(SessionEnvelope { session })).into_response(),
        Err(e) => handle_auth_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

pub(crate) fn handle_auth_error(error: AuthError) -> Response {
    let status = match &error {
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::ValidatorUnavailable(msg) => {
            tracing::error!("Credential validator unavailable: {}", msg);
            StatusCode::SERVICE_UNAVAILABLE
        }
        AuthError::StorageUnavailable(msg) => {
            tracing::error!("Session storage unavailable: {}", msg);
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    (status, Json(ErrorResponse::from(&error))).into_response()
}
