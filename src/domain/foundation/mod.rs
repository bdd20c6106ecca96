//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary of the console access domain.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, SessionRejection};
pub use errors::{ErrorCode, ValidationError};
pub use ids::{Identifier, SessionId};
pub use timestamp::Timestamp;
