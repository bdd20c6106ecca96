//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `access` - Roles, sessions, route guard and brand scope filtering

pub mod access;
pub mod foundation;
