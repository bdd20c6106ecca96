//! Verified identity returned by the credential validator.

use crate::domain::foundation::Identifier;

use super::Role;

/// Who a caller proved to be, and what role the directory grants them.
///
/// Produced only by a successful credential check; consumed by the session
/// issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub identifier: Identifier,
    pub role: Role,
    pub display_name: String,
}

impl Identity {
    pub fn new(identifier: Identifier, role: Role, display_name: impl Into<String>) -> Self {
        Self {
            identifier,
            role,
            display_name: display_name.into(),
        }
    }
}
