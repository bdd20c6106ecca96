//! Authentication error types for the domain layer.
//!
//! `AuthError` is **domain-centric**: it describes what went wrong from the
//! console's perspective, not from whichever directory or storage backend
//! happens to be plugged in.
//!
//! # Design Decisions
//!
//! - Unknown identifier and wrong secret collapse into one variant,
//!   `InvalidCredentials`, so a caller cannot enumerate accounts.
//! - `ValidatorUnavailable` is kept apart from `InvalidCredentials` so the UI
//!   can say "try again" instead of "wrong password".
//! - Expired or corrupt stored sessions are not errors at all; they degrade
//!   to "no session" (see `SessionRejection`).

use thiserror::Error;

use super::ErrorCode;

/// Authentication errors surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Identifier unknown or secret mismatch. The only user-facing message.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The credential directory could not be reached (network, timeout, etc.).
    #[error("Credential validator unavailable: {0}")]
    ValidatorUnavailable(String),

    /// The session slot backend failed to read or write.
    #[error("Session storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl AuthError {
    /// Creates a validator unavailable error with a message.
    pub fn validator_unavailable(message: impl Into<String>) -> Self {
        Self::ValidatorUnavailable(message.into())
    }

    /// Creates a storage unavailable error with a message.
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AuthError::ValidatorUnavailable(_) | AuthError::StorageUnavailable(_)
        )
    }

    /// Returns the stable API error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            AuthError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AuthError::ValidatorUnavailable(_) => ErrorCode::ValidatorUnavailable,
            AuthError::StorageUnavailable(_) => ErrorCode::StorageUnavailable,
        }
    }

    /// Message safe to show to an end user.
    ///
    /// Infrastructure details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "Invalid credentials",
            AuthError::ValidatorUnavailable(_) => {
                "Sign-in is temporarily unavailable, please try again"
            }
            AuthError::StorageUnavailable(_) => "Session service unavailable",
        }
    }
}

/// Reasons a stored session is refused on read.
///
/// Internal signal only. Both variants degrade to "no session" for callers
/// and are paired with clearing the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRejection {
    /// `now` has reached `expires_at`.
    Expired,
    /// Stored bytes did not parse or violated a session invariant.
    Corrupt,
}

impl SessionRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionRejection::Expired => "expired",
            SessionRejection::Corrupt => "corrupt",
        }
    }
}

impl std::fmt::Display for SessionRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
