//! SessionStore - typed access to one client's session slot.
//!
//! The store serializes sessions as JSON into a `SessionSlot` under a fixed
//! key. Reads are fail-safe: bytes that do not parse, or parse into a record
//! that breaks a session invariant, are reported as "no session" and removed
//! so the corruption does not recur on the next read. A record whose window
//! is longer than the store's TTL counts as corrupt too: sessions are only
//! ever issued with that TTL, so a longer window was written by someone else.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::access::{Session, DEFAULT_SESSION_TTL};
use crate::domain::foundation::{AuthError, SessionRejection, Timestamp};
use crate::ports::{SessionSlot, SlotKey};

use super::events::{ClearReason, SessionChange, SessionEvents};

/// A session together with the exact bytes it was read from.
///
/// The bytes let a later conditional clear target this record and nothing
/// newer.
#[derive(Debug, Clone)]
pub(crate) struct LoadedSession {
    pub session: Session,
    pub raw: Vec<u8>,
}

/// Persists, retrieves and clears the session stored for one client.
#[derive(Clone)]
pub struct SessionStore {
    slot: Arc<dyn SessionSlot>,
    key: SlotKey,
    max_ttl: Duration,
    events: Option<SessionEvents>,
}

impl SessionStore {
    pub fn new(slot: Arc<dyn SessionSlot>, key: SlotKey) -> Self {
        Self {
            slot,
            key,
            max_ttl: DEFAULT_SESSION_TTL,
            events: None,
        }
    }

    /// Refuse stored sessions whose window exceeds `ttl`.
    pub fn with_max_ttl(mut self, ttl: Duration) -> Self {
        self.max_ttl = ttl;
        self
    }

    pub fn max_ttl(&self) -> Duration {
        self.max_ttl
    }

    /// Publish issue/clear changes on `events`.
    pub fn with_events(mut self, events: SessionEvents) -> Self {
        self.events = Some(events);
        self
    }

    pub fn key(&self) -> &SlotKey {
        &self.key
    }

    pub fn events(&self) -> Option<&SessionEvents> {
        self.events.as_ref()
    }

    /// Write `session`, replacing whatever the slot held.
    pub async fn put(&self, session: &Session) -> Result<(), AuthError> {
        let bytes = serde_json::to_vec(session)
            .map_err(|e| AuthError::storage_unavailable(format!("serialize session: {}", e)))?;
        let ttl = Duration::from_secs(session.remaining_secs_at(&Timestamp::now()).max(1));

        self.slot.set(&self.key, bytes, Some(ttl)).await?;

        self.publish(SessionChange::Issued {
            key: self.key.clone(),
            session_id: *session.session_id(),
        });
        Ok(())
    }

    /// Read the stored session, if any.
    ///
    /// Does not check expiry; that is the accessor's job.
    pub async fn get(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.load().await?.map(|loaded| loaded.session))
    }

    /// Remove the stored session unconditionally. Idempotent.
    pub async fn clear(&self) -> Result<(), AuthError> {
        self.slot.remove(&self.key).await?;
        self.publish(SessionChange::Cleared {
            key: self.key.clone(),
            reason: ClearReason::Logout,
        });
        Ok(())
    }

    /// Raw bytes currently in the slot, unparsed.
    pub async fn read_raw(&self) -> Result<Option<Vec<u8>>, AuthError> {
        Ok(self.slot.get(&self.key).await?)
    }

    /// Remove the slot contents only if they still equal `raw`.
    ///
    /// Returns `false` when the slot was empty or held something else.
    pub async fn clear_if_unchanged(&self, raw: &[u8]) -> Result<bool, AuthError> {
        Ok(self.slot.remove_if_eq(&self.key, raw).await?)
    }

    pub(crate) async fn load(&self) -> Result<Option<LoadedSession>, AuthError> {
        let Some(raw) = self.read_raw().await? else {
            return Ok(None);
        };

        match serde_json::from_slice::<Session>(&raw) {
            Ok(session) if session.lifetime_secs() > self.max_ttl.as_secs() => {
                tracing::warn!(
                    key = %self.key,
                    session_id = %session.session_id(),
                    lifetime_secs = session.lifetime_secs(),
                    max_ttl_secs = self.max_ttl.as_secs(),
                    "Discarding session with a window longer than the TTL"
                );
                self.discard(&raw, SessionRejection::Corrupt).await;
                Ok(None)
            }
            Ok(session) => Ok(Some(LoadedSession { session, raw })),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Discarding unreadable session record");
                self.discard(&raw, SessionRejection::Corrupt).await;
                Ok(None)
            }
        }
    }

    /// Remove `raw` from the slot if it is still the stored value.
    ///
    /// Failures are logged and swallowed: a read that already decided
    /// "no session" must not turn into an error because cleanup failed.
    pub(crate) async fn discard(&self, raw: &[u8], rejection: SessionRejection) {
        match self.clear_if_unchanged(raw).await {
            Ok(true) => {
                tracing::debug!(key = %self.key, reason = %rejection, "Cleared session slot");
                self.publish(SessionChange::Cleared {
                    key: self.key.clone(),
                    reason: rejection.into(),
                });
            }
            Ok(false) => {
                tracing::debug!(key = %self.key, "Session slot changed before clear, leaving it");
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to clear rejected session");
            }
        }
    }

    fn publish(&self, change: SessionChange) {
        if let Some(events) = &self.events {
            events.publish(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionSlot;
    use crate::domain::access::session::test_support::{aggregator_session, brand_session};

    fn store_with_slot() -> (SessionStore, Arc<InMemorySessionSlot>) {
        let slot = Arc::new(InMemorySessionSlot::new());
        let store = SessionStore::new(slot.clone(), SlotKey::new("console.session"));
        (store, slot)
    }

    #[tokio::test]
    async fn put_then_get_returns_equal_session() {
        let (store, _) = store_with_slot();
        let session = brand_session("Nike");

        store.put(&session).await.unwrap();

        assert_eq!(store.get().await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn get_on_empty_slot_is_none() {
        let (store, _) = store_with_slot();
        assert_eq!(store.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_replaces_previous_session() {
        let (store, _) = store_with_slot();
        store.put(&brand_session("Nike")).await.unwrap();
        let second = aggregator_session();
        store.put(&second).await.unwrap();

        assert_eq!(store.get().await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn malformed_bytes_read_as_none_and_are_cleared() {
        let (store, slot) = store_with_slot();
        let key = store.key().clone();
        slot.set(&key, b"{not json".to_vec(), None).await.unwrap();

        assert_eq!(store.get().await.unwrap(), None);
        assert_eq!(slot.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn invariant_violating_record_reads_as_none_and_is_cleared() {
        let (store, slot) = store_with_slot();
        let key = store.key().clone();
        let bad = br#"{"identifier":"x@zepto.com","role":"aggregator","scope":"Nike","displayName":"X","sessionId":"550e8400-e29b-41d4-a716-446655440000","issuedAt":"2024-01-15T10:00:00Z","expiresAt":"2024-01-16T10:00:00Z"}"#;
        slot.set(&key, bad.to_vec(), None).await.unwrap();

        assert_eq!(store.get().await.unwrap(), None);
        assert_eq!(slot.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn window_longer_than_ttl_reads_as_none_and_is_cleared() {
        let (store, slot) = store_with_slot();
        let key = store.key().clone();
        let stretched = br#"{"identifier":"nike@zepto.com","role":"brand","scope":"Nike","displayName":"Nike","sessionId":"550e8400-e29b-41d4-a716-446655440000","issuedAt":"2024-01-15T10:00:00Z","expiresAt":"2099-01-15T10:00:00Z"}"#;
        slot.set(&key, stretched.to_vec(), None).await.unwrap();

        assert_eq!(store.get().await.unwrap(), None);
        assert_eq!(slot.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn window_within_max_ttl_is_kept() {
        let (store, slot) = store_with_slot();
        let store = store.with_max_ttl(Duration::from_secs(2 * 24 * 60 * 60));
        let key = store.key().clone();
        let two_days = br#"{"identifier":"nike@zepto.com","role":"brand","scope":"Nike","displayName":"Nike","sessionId":"550e8400-e29b-41d4-a716-446655440000","issuedAt":"2024-01-15T10:00:00Z","expiresAt":"2024-01-17T10:00:00Z"}"#;
        slot.set(&key, two_days.to_vec(), None).await.unwrap();

        assert!(store.get().await.unwrap().is_some());

        let store = store.with_max_ttl(DEFAULT_SESSION_TTL);
        assert_eq!(store.get().await.unwrap(), None);
        assert_eq!(slot.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let (store, _) = store_with_slot();
        store.put(&brand_session("HUL")).await.unwrap();

        store.clear().await.unwrap();
        store.clear().await.unwrap();

        assert_eq!(store.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn discard_leaves_a_newer_session_alone() {
        let (store, _) = store_with_slot();
        store.put(&brand_session("Nike")).await.unwrap();
        let stale = store.load().await.unwrap().unwrap();

        let fresh = aggregator_session();
        store.put(&fresh).await.unwrap();
        store.discard(&stale.raw, SessionRejection::Expired).await;

        assert_eq!(store.get().await.unwrap(), Some(fresh));
    }

    #[tokio::test]
    async fn clear_if_unchanged_compares_raw_bytes() {
        let (store, _) = store_with_slot();
        store.put(&brand_session("Nike")).await.unwrap();
        let raw = store.read_raw().await.unwrap().unwrap();

        assert!(!store.clear_if_unchanged(b"something else").await.unwrap());
        assert!(store.get().await.unwrap().is_some());

        assert!(store.clear_if_unchanged(&raw).await.unwrap());
        assert_eq!(store.read_raw().await.unwrap(), None);
    }

    #[tokio::test]
    async fn stores_with_different_keys_are_independent() {
        let slot = Arc::new(InMemorySessionSlot::new());
        let a = SessionStore::new(slot.clone(), SlotKey::new("a"));
        let b = SessionStore::new(slot, SlotKey::new("b"));

        a.put(&brand_session("Nike")).await.unwrap();

        assert!(a.get().await.unwrap().is_some());
        assert_eq!(b.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_and_clear_publish_changes() {
        let events = SessionEvents::new(8);
        let mut rx = events.subscribe();
        let (store, _) = store_with_slot();
        let store = store.with_events(events);
        let session = brand_session("Nike");

        store.put(&session).await.unwrap();
        store.clear().await.unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            SessionChange::Issued {
                key: SlotKey::new("console.session"),
                session_id: *session.session_id(),
            }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            SessionChange::Cleared {
                key: SlotKey::new("console.session"),
                reason: ClearReason::Logout,
            }
        );
    }
}
