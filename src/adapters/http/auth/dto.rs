//! HTTP DTOs for the auth endpoints.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::domain::access::Session;
use crate::domain::foundation::{AuthError, ErrorCode};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Login form submission.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub secret: SecretString,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Current session, `null` when nobody is logged in.
#[derive(Debug, Clone, Serialize)]
pub struct SessionEnvelope {
    pub session: Option<Session>,
}

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    /// Body for a request the endpoint could not parse.
    pub fn invalid_request() -> Self {
        Self {
            error: "Invalid request body".to_string(),
            code: ErrorCode::InvalidRequest.to_string(),
        }
    }
}

impl From<&AuthError> for ErrorResponse {
    fn from(err: &AuthError) -> Self {
        Self {
            error: err.user_message().to_string(),
            code: err.code().to_string(),
        }
    }
}
