//! In-Memory Session Slot Adapter
//!
//! Holds serialized sessions in a process-local map. Useful for testing,
//! development and single-instance deployments.
//!
//! TTL hints are recorded but only acted on by [`InMemorySessionSlot::sweep`];
//! reads never drop entries on their own. Expiry of the session itself is
//! decided by the accessor from the stored record.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::ports::{SessionSlot, SlotError, SlotKey};

#[derive(Debug, Clone)]
struct SlotEntry {
    value: Vec<u8>,
    evict_after: Option<Instant>,
}

/// In-memory session slot storage
#[derive(Debug, Clone)]
pub struct InMemorySessionSlot {
    entries: Arc<RwLock<HashMap<SlotKey, SlotEntry>>>,
}

impl InMemorySessionSlot {
    /// Create a new in-memory slot store
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Drop entries whose TTL hint has passed. Returns how many were removed.
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.evict_after.map_or(true, |at| at > now));
        before - entries.len()
    }

    /// Get the number of occupied slots
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Clear all slots (useful for tests)
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

impl Default for InMemorySessionSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionSlot for InMemorySessionSlot {
    async fn get(&self, key: &SlotKey) -> Result<Option<Vec<u8>>, SlotError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn set(
        &self,
        key: &SlotKey,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<(), SlotError> {
        let entry = SlotEntry {
            value,
            evict_after: ttl.and_then(|ttl| Instant::now().checked_add(ttl)),
        };
        self.entries.write().await.insert(key.clone(), entry);
        Ok(())
    }

    async fn remove(&self, key: &SlotKey) -> Result<(), SlotError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn remove_if_eq(&self, key: &SlotKey, expected: &[u8]) -> Result<bool, SlotError> {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.value == expected => {
                entries.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
