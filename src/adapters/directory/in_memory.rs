//! In-memory credential directory.
//!
//! Holds directory entries in a map. Used for the seeded demo accounts, as
//! the backing map of the file directory, and in tests.
//!
//! # Example
//!
//! ```ignore
//! use console_access::adapters::directory::InMemoryCredentialDirectory;
//!
//! let directory = InMemoryCredentialDirectory::new()
//!     .with_account(&hasher, "nike@zepto.com", Role::Brand(nike), "Nike", "s3cret")?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::credentials::SecretHasher;
use crate::domain::access::{BrandScope, Role};
use crate::domain::foundation::{AuthError, Identifier};
use crate::ports::{CredentialDirectory, DirectoryEntry};

use super::DirectorySetupError;

/// Secret shared by the seeded demo accounts. Each account stores its own
/// salted hash of it.
pub const DEMO_SECRET: &str = "demo123";

/// Map-backed credential directory.
#[derive(Debug, Default)]
pub struct InMemoryCredentialDirectory {
    entries: RwLock<HashMap<Identifier, DirectoryEntry>>,
    /// Optional error to return for all lookups (for error testing)
    force_error: RwLock<Option<AuthError>>,
}

impl InMemoryCredentialDirectory {
    /// Creates a new empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory seeded with the console's demo accounts, hashed at low cost.
    ///
    /// | identifier          | role       | scope   |
    /// |---------------------|------------|---------|
    /// | zepto@zepto.com     | aggregator | -       |
    /// | nike@zepto.com      | brand      | Nike    |
    /// | hul@zepto.com       | brand      | HUL     |
    /// | pepsico@zepto.com   | brand      | PepsiCo |
    pub fn with_demo_accounts() -> Result<Self, DirectorySetupError> {
        Self::with_demo_accounts_hashed_by(&SecretHasher::low_cost())
    }

    /// Demo accounts hashed with `hasher`.
    pub fn with_demo_accounts_hashed_by(
        hasher: &SecretHasher,
    ) -> Result<Self, DirectorySetupError> {
        let brand = |name: &str| BrandScope::new(name).map(Role::Brand);

        Self::new()
            .with_account(hasher, "zepto@zepto.com", Role::Aggregator, "Zepto Admin", DEMO_SECRET)?
            .with_account(hasher, "nike@zepto.com", brand("Nike")?, "Nike", DEMO_SECRET)?
            .with_account(hasher, "hul@zepto.com", brand("HUL")?, "HUL", DEMO_SECRET)?
            .with_account(hasher, "pepsico@zepto.com", brand("PepsiCo")?, "PepsiCo", DEMO_SECRET)
    }

    /// Adds an entry.
    pub fn with_entry(mut self, entry: DirectoryEntry) -> Self {
        self.entries
            .get_mut()
            .insert(entry.identifier.clone(), entry);
        self
    }

    /// Hashes `secret` and adds an account.
    pub fn with_account(
        self,
        hasher: &SecretHasher,
        identifier: &str,
        role: Role,
        display_name: &str,
        secret: &str,
    ) -> Result<Self, DirectorySetupError> {
        let identifier = Identifier::new(identifier)?;
        let entry = DirectoryEntry::new(identifier, role, display_name, hasher.hash(secret)?);
        Ok(self.with_entry(entry))
    }

    /// Forces all lookups to return the specified error.
    ///
    /// Useful for testing error handling paths.
    pub fn with_error(mut self, error: AuthError) -> Self {
        *self.force_error.get_mut() = Some(error);
        self
    }

    /// Clears the forced error and returns to normal operation.
    pub async fn clear_error(&self) {
        *self.force_error.write().await = None;
    }

    /// Adds or replaces an entry at runtime.
    pub async fn insert(&self, entry: DirectoryEntry) {
        self.entries
            .write()
            .await
            .insert(entry.identifier.clone(), entry);
    }

    /// Replaces every entry at once.
    pub async fn replace_all(&self, entries: HashMap<Identifier, DirectoryEntry>) {
        *self.entries.write().await = entries;
    }

    /// Removes an entry.
    pub async fn remove(&self, identifier: &Identifier) {
        self.entries.write().await.remove(identifier);
    }

    /// Returns the number of entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialDirectory for InMemoryCredentialDirectory {
    async fn lookup(&self, identifier: &Identifier) -> Result<Option<DirectoryEntry>, AuthError> {
        // Check for forced error
        if let Some(error) = self.force_error.read().await.clone() {
            return Err(error);
        }

        Ok(self.entries.read().await.get(identifier).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::credentials::verify_secret;
    use crate::domain::access::RoleKind;

    fn id(s: &str) -> Identifier {
        Identifier::new(s).unwrap()
    }

    #[tokio::test]
    async fn demo_accounts_are_seeded_with_roles() {
        let directory = InMemoryCredentialDirectory::with_demo_accounts().unwrap();
        assert_eq!(directory.len().await, 4);

        let zepto = directory.lookup(&id("zepto@zepto.com")).await.unwrap().unwrap();
        assert_eq!(zepto.role, Role::Aggregator);

        let nike = directory.lookup(&id("nike@zepto.com")).await.unwrap().unwrap();
        assert_eq!(nike.role.kind(), RoleKind::Brand);
        assert_eq!(nike.role.scope().map(BrandScope::as_str), Some("Nike"));
    }

    #[tokio::test]
    async fn demo_accounts_store_distinct_hashes() {
        let directory = InMemoryCredentialDirectory::with_demo_accounts().unwrap();
        let nike = directory.lookup(&id("nike@zepto.com")).await.unwrap().unwrap();
        let hul = directory.lookup(&id("hul@zepto.com")).await.unwrap().unwrap();

        assert_ne!(nike.secret_hash, hul.secret_hash);
        assert!(verify_secret(&nike.secret_hash, DEMO_SECRET));
        assert!(!nike.secret_hash.contains(DEMO_SECRET));
    }

    #[tokio::test]
    async fn unknown_identifier_is_none() {
        let directory = InMemoryCredentialDirectory::new();
        assert_eq!(directory.lookup(&id("ghost@zepto.com")).await, Ok(None));
    }

    #[tokio::test]
    async fn runtime_insert_and_remove() {
        let directory = InMemoryCredentialDirectory::new();
        let entry =
            DirectoryEntry::new(id("amul@zepto.com"), Role::Aggregator, "Amul", "$argon2id$x");

        directory.insert(entry.clone()).await;
        assert_eq!(directory.lookup(&id("amul@zepto.com")).await, Ok(Some(entry)));

        directory.remove(&id("amul@zepto.com")).await;
        assert!(directory.is_empty().await);
    }

    #[tokio::test]
    async fn forced_error_is_returned_until_cleared() {
        let directory = InMemoryCredentialDirectory::new()
            .with_error(AuthError::validator_unavailable("maintenance"));

        assert!(matches!(
            directory.lookup(&id("a@zepto.com")).await,
            Err(AuthError::ValidatorUnavailable(_))
        ));

        directory.clear_error().await;
        assert_eq!(directory.lookup(&id("a@zepto.com")).await, Ok(None));
    }
}
