//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `directory` - Credential directories (demo seed, YAML file, remote service)
//! - `storage` - Session slots (in-memory, file, Redis)
//! - `http` - axum endpoints, signed cookie and route guard middleware

pub mod directory;
pub mod http;
pub mod storage;

pub use directory::{
    DirectorySetupError, FileCredentialDirectory, InMemoryCredentialDirectory,
    RemoteCredentialDirectory, RemoteDirectoryConfig,
};
pub use storage::{FileSessionSlot, InMemorySessionSlot, RedisSessionSlot};
