//! HTTP middleware for axum.
//!
//! - `guard` - Route guard middleware and the `CurrentSession` extractor

pub mod guard;

pub use guard::{guard_middleware, require, CurrentSession, GuardState};
