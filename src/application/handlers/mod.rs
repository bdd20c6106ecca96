//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod auth;

pub use auth::{LoginCommand, LoginHandler, LogoutCommand, LogoutHandler};
