//! Credential directory port.
//!
//! The directory maps a login identifier to the role, scope, display name
//! and expected secret hash for that identity. It is the upstream boundary of
//! the access subsystem: a hard-coded table, a YAML file and a remote
//! identity service all sit behind the same contract.
//!
//! # Example
//!
//! ```ignore
//! let directory: Arc<dyn CredentialDirectory> =
//!     Arc::new(InMemoryCredentialDirectory::with_demo_accounts()?);
//!
//! let entry = directory
//!     .lookup(&Identifier::new("nike@zepto.com")?)
//!     .await?;
//! ```

use async_trait::async_trait;

use crate::domain::access::Role;
use crate::domain::foundation::{AuthError, Identifier};

/// One identity known to the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub identifier: Identifier,
    pub role: Role,
    pub display_name: String,
    /// Argon2 PHC string (`$argon2id$v=19$...`).
    pub secret_hash: String,
}

impl DirectoryEntry {
    pub fn new(
        identifier: Identifier,
        role: Role,
        display_name: impl Into<String>,
        secret_hash: impl Into<String>,
    ) -> Self {
        Self {
            identifier,
            role,
            display_name: display_name.into(),
            secret_hash: secret_hash.into(),
        }
    }
}

/// Looks up identities by login identifier.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(Some(entry))` if the identifier is known
/// - Return `Ok(None)` if it is not (never an error)
/// - Return `AuthError::ValidatorUnavailable` for transient failures,
///   including timeouts, so callers never confuse an outage with bad
///   credentials
#[async_trait]
pub trait CredentialDirectory: Send + Sync {
    /// Fetch the entry for `identifier`, if any.
    async fn lookup(&self, identifier: &Identifier) -> Result<Option<DirectoryEntry>, AuthError>;
}
