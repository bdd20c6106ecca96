//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `CredentialDirectory` - identity lookup (upstream collaborator)
//! - `SessionSlot` - per-client durable key-value cell (storage boundary)

mod credential_directory;
mod session_slot;

pub use credential_directory::{CredentialDirectory, DirectoryEntry};
pub use session_slot::{SessionSlot, SlotError, SlotKey};
