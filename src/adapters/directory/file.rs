//! YAML file credential directory.
//!
//! Loads identities from a YAML document at startup. The file holds hashes,
//! never plaintext secrets:
//!
//! ```yaml
//! accounts:
//!   - identifier: nike@zepto.com
//!     role: brand
//!     scope: Nike
//!     display_name: Nike Brand Manager
//!     secret_hash: "$argon2id$v=19$m=19456,t=2,p=1$..."
//!   - identifier: zepto@zepto.com
//!     role: aggregator
//!     display_name: Zepto Admin
//!     secret_hash: "$argon2id$v=19$m=19456,t=2,p=1$..."
//! ```
//!
//! A file with any invalid entry is rejected as a whole. `reload` swaps the
//! entries in one step, so lookups see either the old or the new set.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use password_hash::PasswordHash;
use serde::Deserialize;
use tokio::fs;

use crate::domain::access::{Role, RoleKind};
use crate::domain::foundation::{AuthError, Identifier};
use crate::ports::{CredentialDirectory, DirectoryEntry};

use super::{DirectorySetupError, InMemoryCredentialDirectory};

#[derive(Debug, Deserialize)]
struct DirectoryFile {
    #[serde(default)]
    accounts: Vec<AccountRecord>,
}

#[derive(Debug, Deserialize)]
struct AccountRecord {
    identifier: String,
    role: RoleKind,
    #[serde(default)]
    scope: Option<String>,
    display_name: String,
    secret_hash: String,
}

impl AccountRecord {
    fn into_entry(self) -> Result<DirectoryEntry, DirectorySetupError> {
        let invalid = |reason: String| DirectorySetupError::InvalidEntry {
            identifier: self.identifier.clone(),
            reason,
        };

        let identifier = Identifier::new(&self.identifier).map_err(|e| invalid(e.to_string()))?;
        let role = Role::from_parts(self.role, self.scope.clone())
            .map_err(|e| invalid(e.to_string()))?;
        PasswordHash::new(&self.secret_hash)
            .map_err(|e| invalid(format!("secret_hash is not a PHC string: {}", e)))?;

        Ok(DirectoryEntry::new(
            identifier,
            role,
            self.display_name,
            self.secret_hash,
        ))
    }
}

/// Credential directory backed by a YAML file.
#[derive(Debug)]
pub struct FileCredentialDirectory {
    path: PathBuf,
    entries: InMemoryCredentialDirectory,
}

impl FileCredentialDirectory {
    /// Reads and validates the file at `path`.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, DirectorySetupError> {
        let path = path.as_ref().to_path_buf();
        let entries = InMemoryCredentialDirectory::new();
        entries.replace_all(read_entries(&path).await?).await;

        tracing::info!(
            path = %path.display(),
            accounts = entries.len().await,
            "Loaded credential directory"
        );
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the file. On failure the previous entries stay in place.
    pub async fn reload(&self) -> Result<usize, DirectorySetupError> {
        let entries = read_entries(&self.path).await?;
        let count = entries.len();
        self.entries.replace_all(entries).await;

        tracing::info!(
            path = %self.path.display(),
            accounts = count,
            "Reloaded credential directory"
        );
        Ok(count)
    }
}

async fn read_entries(
    path: &Path,
) -> Result<HashMap<Identifier, DirectoryEntry>, DirectorySetupError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| DirectorySetupError::Io(format!("{}: {}", path.display(), e)))?;

    let file: DirectoryFile =
        serde_yaml::from_str(&content).map_err(|e| DirectorySetupError::Parse(e.to_string()))?;

    let mut entries = HashMap::with_capacity(file.accounts.len());
    for record in file.accounts {
        let entry = record.into_entry()?;
        if entries.contains_key(&entry.identifier) {
            return Err(DirectorySetupError::DuplicateIdentifier(
                entry.identifier.to_string(),
            ));
        }
        entries.insert(entry.identifier.clone(), entry);
    }
    Ok(entries)
}

#[async_trait]
impl CredentialDirectory for FileCredentialDirectory {
    async fn lookup(&self, identifier: &Identifier) -> Result<Option<DirectoryEntry>, AuthError> {
        self.entries.lookup(identifier).await
    }
}
