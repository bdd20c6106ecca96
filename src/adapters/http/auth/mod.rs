//! Auth HTTP adapter: login, logout and current-session endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, LoginRequest, SessionEnvelope};
pub use handlers::{current_session, login, logout, AuthAppState};
pub(crate) use handlers::handle_auth_error;
pub use routes::auth_routes;
