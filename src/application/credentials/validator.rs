//! CredentialValidator - checks a submitted identifier/secret pair.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::OnceCell;

use crate::domain::access::Identity;
use crate::domain::foundation::{AuthError, Identifier};
use crate::ports::CredentialDirectory;

use super::secret_hash::{verify_secret, SecretHasher};

/// Validates credentials against a `CredentialDirectory`.
///
/// Unknown identifiers and wrong secrets both yield
/// `AuthError::InvalidCredentials`. For unknown identifiers a throwaway hash
/// is still verified so both failure paths spend the same Argon2 work.
pub struct CredentialValidator {
    directory: Arc<dyn CredentialDirectory>,
    hasher: SecretHasher,
    decoy_hash: OnceCell<String>,
}

const DECOY_SECRET: &str = "decoy-secret-never-matches";

impl CredentialValidator {
    /// `hasher` should use the same costs the directory's hashes were made
    /// with, so decoy verification costs the same as a real one.
    pub fn new(directory: Arc<dyn CredentialDirectory>, hasher: SecretHasher) -> Self {
        Self {
            directory,
            hasher,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Returns the directory's role, scope and display name for a correct pair.
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials` - identifier unknown, blank, or secret mismatch
    /// - `ValidatorUnavailable` - the directory could not be consulted
    pub async fn validate(&self, identifier: &str, secret: &str) -> Result<Identity, AuthError> {
        let identifier = match Identifier::new(identifier) {
            Ok(id) => id,
            Err(_) => {
                self.spend_decoy(secret).await;
                return Err(AuthError::InvalidCredentials);
            }
        };

        let entry = match self.directory.lookup(&identifier).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(
                    identifier = %identifier,
                    error = %e,
                    "Credential directory lookup failed"
                );
                return Err(e);
            }
        };

        let Some(entry) = entry else {
            tracing::debug!(identifier = %identifier, "Login rejected");
            self.spend_decoy(secret).await;
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_off_thread(entry.secret_hash.clone(), secret).await {
            tracing::debug!(identifier = %identifier, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Identity::new(entry.identifier, entry.role, entry.display_name))
    }

    /// Hashed once, off the executor. A failed attempt is not cached.
    async fn decoy_hash(&self) -> Result<&String, String> {
        self.decoy_hash
            .get_or_try_init(|| async {
                let hasher = self.hasher.clone();
                tokio::task::spawn_blocking(move || hasher.hash(DECOY_SECRET))
                    .await
                    .map_err(|e| e.to_string())?
                    .map_err(|e| e.to_string())
            })
            .await
    }

    async fn spend_decoy(&self, secret: &str) {
        match self.decoy_hash().await {
            Ok(hash) => {
                let _ = verify_off_thread(hash.clone(), secret).await;
            }
            Err(e) => tracing::error!(error = %e, "Decoy hash unavailable"),
        }
    }
}

/// Argon2 is CPU-bound; keep it off the async executor threads.
async fn verify_off_thread(hash: String, secret: &str) -> bool {
    let secret = SecretString::new(secret.to_string());
    match tokio::task::spawn_blocking(move || verify_secret(&hash, secret.expose_secret())).await
    {
        Ok(matched) => matched,
        Err(e) => {
            tracing::error!(error = %e, "Secret verification task failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::{BrandScope, Role, RoleKind};
    use crate::ports::DirectoryEntry;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StaticDirectory {
        entries: HashMap<String, DirectoryEntry>,
    }

    impl StaticDirectory {
        fn seeded() -> Self {
            let hasher = SecretHasher::low_cost();
            let mut entries = HashMap::new();
            for (email, role, name) in [
                ("zepto@zepto.com", Role::Aggregator, "Zepto Admin"),
                (
                    "nike@zepto.com",
                    Role::Brand(BrandScope::new("Nike").unwrap()),
                    "Nike Brand Manager",
                ),
            ] {
                let id = Identifier::new(email).unwrap();
                entries.insert(
                    email.to_string(),
                    DirectoryEntry::new(id, role, name, hasher.hash("demo123").unwrap()),
                );
            }
            Self { entries }
        }
    }

    #[async_trait]
    impl CredentialDirectory for StaticDirectory {
        async fn lookup(
            &self,
            identifier: &Identifier,
        ) -> Result<Option<DirectoryEntry>, AuthError> {
            Ok(self.entries.get(identifier.as_str()).cloned())
        }
    }

    struct DownDirectory;

    #[async_trait]
    impl CredentialDirectory for DownDirectory {
        async fn lookup(&self, _: &Identifier) -> Result<Option<DirectoryEntry>, AuthError> {
            Err(AuthError::validator_unavailable("timed out"))
        }
    }

    fn validator() -> CredentialValidator {
        CredentialValidator::new(Arc::new(StaticDirectory::seeded()), SecretHasher::low_cost())
    }

    #[tokio::test]
    async fn correct_pair_returns_directory_role_and_scope() {
        let identity = validator().validate("nike@zepto.com", "demo123").await.unwrap();

        assert_eq!(identity.identifier.as_str(), "nike@zepto.com");
        assert_eq!(identity.role.kind(), RoleKind::Brand);
        assert_eq!(identity.role.scope().map(BrandScope::as_str), Some("Nike"));
        assert_eq!(identity.display_name, "Nike Brand Manager");
    }

    #[tokio::test]
    async fn aggregator_pair_returns_no_scope() {
        let identity = validator().validate("zepto@zepto.com", "demo123").await.unwrap();
        assert_eq!(identity.role, Role::Aggregator);
    }

    #[tokio::test]
    async fn identifier_lookup_ignores_case_and_whitespace() {
        let result = validator().validate("  NIKE@zepto.com", "demo123").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn wrong_secret_and_unknown_identifier_are_indistinguishable() {
        let validator = validator();
        let wrong_secret = validator.validate("nike@zepto.com", "wrong-secret").await;
        let unknown = validator.validate("ghost@zepto.com", "demo123").await;

        assert_eq!(wrong_secret, Err(AuthError::InvalidCredentials));
        assert_eq!(unknown, Err(AuthError::InvalidCredentials));
        assert_eq!(
            wrong_secret.unwrap_err().to_string(),
            unknown.unwrap_err().to_string()
        );
    }

    #[tokio::test]
    async fn unknown_identifier_builds_and_reuses_decoy_hash() {
        let validator = validator();
        assert!(validator.decoy_hash.get().is_none());

        let _ = validator.validate("ghost@zepto.com", "demo123").await;
        let first = validator.decoy_hash.get().cloned().unwrap();
        let _ = validator.validate("phantom@zepto.com", "demo123").await;

        assert_eq!(validator.decoy_hash.get(), Some(&first));
        assert!(!verify_secret(&first, "demo123"));
        assert!(verify_secret(&first, DECOY_SECRET));
    }

    #[tokio::test]
    async fn blank_identifier_is_invalid_credentials() {
        let result = validator().validate("   ", "demo123").await;
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn secret_comparison_is_exact() {
        let result = validator().validate("nike@zepto.com", "DEMO123").await;
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn directory_outage_is_not_invalid_credentials() {
        let validator = CredentialValidator::new(Arc::new(DownDirectory), SecretHasher::low_cost());
        let result = validator.validate("nike@zepto.com", "demo123").await;

        assert!(matches!(result, Err(AuthError::ValidatorUnavailable(_))));
    }
}
