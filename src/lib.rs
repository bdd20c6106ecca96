//! Console Access - session management and role-based access control for
//! the campaign console.
//!
//! Establishes who is logged in, for how long and under which role, and
//! decides which routes and which brand-tagged records each role may see.
//!
//! - `domain` - roles, sessions, the route guard and the scope filter
//! - `ports` - credential directory and session slot contracts
//! - `application` - validator, session store/issuer/accessor, login/logout
//! - `adapters` - directories, slots and the axum HTTP surface
//! - `config` - environment-driven configuration

pub mod adapters;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
