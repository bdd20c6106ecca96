//! Application layer - Services and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports:
//!
//! - `credentials` - secret hashing and the credential validator
//! - `session` - session store, issuer, accessor and change events
//! - `handlers` - command handlers (login, logout)

pub mod credentials;
pub mod handlers;
pub mod session;

pub use credentials::{CredentialValidator, SecretHasher};
pub use handlers::{LoginCommand, LoginHandler, LogoutCommand, LogoutHandler};
pub use session::{
    ClearReason, SessionAccessor, SessionChange, SessionEvents, SessionIssuer, SessionServices,
    SessionStore,
};
