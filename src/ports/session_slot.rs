//! Session slot port - a durable key-value cell holding one serialized session.
//!
//! In a browser this is local storage; on a server it is a cache or table
//! keyed by the client's cookie. The slot stores opaque bytes and knows
//! nothing about sessions.
//!
//! # Atomicity
//!
//! Implementations must never let a reader observe a partially written
//! value. `remove_if_eq` must compare and remove as one step so that a
//! reader clearing an expired record cannot wipe a session written after it
//! read.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::foundation::AuthError;

/// Name of a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey(String);

impl SlotKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors that can occur during slot operations
#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

impl From<SlotError> for AuthError {
    fn from(err: SlotError) -> Self {
        AuthError::storage_unavailable(err.to_string())
    }
}

/// Port for the per-client session slot
#[async_trait]
pub trait SessionSlot: Send + Sync {
    /// Read the raw bytes stored under `key`.
    async fn get(&self, key: &SlotKey) -> Result<Option<Vec<u8>>, SlotError>;

    /// Replace the value under `key`.
    ///
    /// `ttl` is a housekeeping hint; backends that cannot expire entries may
    /// ignore it; correctness never depends on it.
    async fn set(&self, key: &SlotKey, value: Vec<u8>, ttl: Option<Duration>)
        -> Result<(), SlotError>;

    /// Remove the value under `key`. Removing an empty slot is not an error.
    async fn remove(&self, key: &SlotKey) -> Result<(), SlotError>;

    /// Remove the value only if it still equals `expected`.
    ///
    /// Returns `true` if a value was removed.
    async fn remove_if_eq(&self, key: &SlotKey, expected: &[u8]) -> Result<bool, SlotError>;
}
