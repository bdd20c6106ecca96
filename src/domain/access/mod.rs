//! Access domain module.
//!
//! Pure types and decisions for who is logged in and what they may see:
//!
//! - `Role` / `BrandScope` - the two console roles, brand scope baked in
//! - `Identity` - result of a successful credential check
//! - `Session` - the immutable, time-boxed login record
//! - `RouteGuard` - allow / redirect decision per protected route
//! - `ScopeFilter` - brand visibility over record collections
//!
//! Nothing here performs I/O; storage and directory access live behind the
//! ports.

mod guard;
mod identity;
mod role;
mod scope_filter;
pub(crate) mod session;

pub use guard::{GuardDecision, Requirement, RouteGuard, RouteMap};
pub use identity::Identity;
pub use role::{BrandScope, Role, RoleKind};
pub use scope_filter::{ScopeFilter, ScopedRecord};
pub use session::{Session, DEFAULT_SESSION_TTL, MAX_SESSION_TTL};
