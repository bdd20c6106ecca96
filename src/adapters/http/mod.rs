//! HTTP adapters - the console's axum surface.
//!
//! - `auth` - login, logout and current-session endpoints
//! - `cookie` - signed client cookie and slot key derivation
//! - `middleware` - route guard middleware and extractors

pub mod auth;
pub mod cookie;
pub mod middleware;

pub use auth::{auth_routes, AuthAppState};
pub use cookie::{CookieSettings, CookieSigner};
pub use middleware::{guard_middleware, require, CurrentSession, GuardState};
