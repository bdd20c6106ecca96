//! SessionIssuer - mints sessions for verified identities.

use std::time::Duration;

use crate::domain::access::{Identity, Session, MAX_SESSION_TTL};
use crate::domain::foundation::{AuthError, Timestamp};

use super::store::SessionStore;

/// Creates sessions and writes them through the store.
///
/// This is the only path that creates a session.
#[derive(Clone)]
pub struct SessionIssuer {
    store: SessionStore,
    ttl: Duration,
}

impl SessionIssuer {
    /// `ttl` is capped at [`MAX_SESSION_TTL`].
    pub fn new(store: SessionStore, ttl: Duration) -> Self {
        Self {
            store,
            ttl: bounded_ttl(ttl),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a session starting now.
    pub async fn issue(&self, identity: Identity) -> Result<Session, AuthError> {
        self.issue_at(identity, Timestamp::now()).await
    }

    /// Issue a session whose window starts at `issued_at`.
    pub async fn issue_at(
        &self,
        identity: Identity,
        issued_at: Timestamp,
    ) -> Result<Session, AuthError> {
        let session = Session::issue(identity, issued_at, self.ttl);
        self.store.put(&session).await?;

        tracing::info!(
            session_id = %session.session_id(),
            identifier = %session.identifier(),
            role = %session.role(),
            expires_at = %session.expires_at().as_datetime(),
            "Session issued"
        );
        Ok(session)
    }
}

/// Caps `ttl` at [`MAX_SESSION_TTL`].
pub(crate) fn bounded_ttl(ttl: Duration) -> Duration {
    if ttl > MAX_SESSION_TTL {
        tracing::warn!(
            requested_secs = ttl.as_secs(),
            max_secs = MAX_SESSION_TTL.as_secs(),
            "Session TTL above maximum, capping"
        );
        return MAX_SESSION_TTL;
    }
    ttl
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionSlot;
    use crate::domain::access::session::test_support::brand_identity;
    use crate::domain::access::DEFAULT_SESSION_TTL;
    use crate::ports::SlotKey;
    use std::sync::Arc;

    fn issuer() -> (SessionIssuer, SessionStore) {
        let store = SessionStore::new(
            Arc::new(InMemorySessionSlot::new()),
            SlotKey::new("console.session"),
        );
        (SessionIssuer::new(store.clone(), DEFAULT_SESSION_TTL), store)
    }

    #[tokio::test]
    async fn issue_writes_session_to_store() {
        let (issuer, store) = issuer();
        let session = issuer.issue(brand_identity("nike@zepto.com", "Nike")).await.unwrap();

        assert_eq!(store.get().await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn issue_at_applies_ttl() {
        let (issuer, _) = issuer();
        let now = Timestamp::now();
        let session = issuer
            .issue_at(brand_identity("nike@zepto.com", "Nike"), now)
            .await
            .unwrap();

        assert_eq!(session.issued_at(), &now);
        assert_eq!(
            session.expires_at().duration_since(session.issued_at()).num_seconds(),
            24 * 60 * 60
        );
    }

    #[tokio::test]
    async fn oversized_ttl_is_capped_instead_of_overflowing() {
        let store = SessionStore::new(
            Arc::new(InMemorySessionSlot::new()),
            SlotKey::new("console.session"),
        )
        .with_max_ttl(MAX_SESSION_TTL);
        let issuer = SessionIssuer::new(store.clone(), Duration::from_secs(1 << 44));
        assert_eq!(issuer.ttl(), MAX_SESSION_TTL);

        let session = issuer.issue(brand_identity("nike@zepto.com", "Nike")).await.unwrap();

        assert_eq!(session.lifetime_secs(), MAX_SESSION_TTL.as_secs());
        assert_eq!(store.get().await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn each_login_gets_a_new_session_id() {
        let (issuer, _) = issuer();
        let first = issuer.issue(brand_identity("nike@zepto.com", "Nike")).await.unwrap();
        let second = issuer.issue(brand_identity("nike@zepto.com", "Nike")).await.unwrap();

        assert_ne!(first.session_id(), second.session_id());
    }
}
