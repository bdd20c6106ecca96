//! Credential directory adapters.
//!
//! ## Available Adapters
//!
//! - **InMemoryCredentialDirectory** - Map-backed, seeded demo accounts (development/testing)
//! - **FileCredentialDirectory** - Hashed accounts loaded from a YAML file
//! - **RemoteCredentialDirectory** - Lookups against an identity service over HTTP

mod file;
mod in_memory;
mod remote;

pub use file::FileCredentialDirectory;
pub use in_memory::{InMemoryCredentialDirectory, DEMO_SECRET};
pub use remote::{RemoteCredentialDirectory, RemoteDirectoryConfig};

use thiserror::Error;

use crate::application::credentials::SecretHashError;
use crate::domain::foundation::ValidationError;

/// Errors raised while building a directory. Lookups never return these.
#[derive(Debug, Error)]
pub enum DirectorySetupError {
    #[error("Failed to read directory file: {0}")]
    Io(String),

    #[error("Failed to parse directory file: {0}")]
    Parse(String),

    #[error("Invalid directory entry '{identifier}': {reason}")]
    InvalidEntry { identifier: String, reason: String },

    #[error("Duplicate directory identifier: {0}")]
    DuplicateIdentifier(String),

    #[error("Invalid account: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to hash secret: {0}")]
    Hash(#[from] SecretHashError),

    #[error("Failed to build directory client: {0}")]
    Client(String),
}
