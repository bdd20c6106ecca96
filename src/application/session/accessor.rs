//! SessionAccessor - the read side of a client's session.
//!
//! Every predicate re-reads the store. Nothing is cached, so "is the session
//! still valid" and "which role does it carry" can never disagree.

use tokio::sync::broadcast;

use crate::domain::access::{BrandScope, GuardDecision, Requirement, RoleKind, RouteGuard, Session};
use crate::domain::foundation::{AuthError, SessionRejection, Timestamp};

use super::events::SessionChange;
use super::store::SessionStore;

/// Yields the live session for one client, enforcing lazy expiry.
#[derive(Clone)]
pub struct SessionAccessor {
    store: SessionStore,
}

impl SessionAccessor {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// The live session, or `None` if absent, expired or unreadable.
    ///
    /// # Errors
    ///
    /// Only `StorageUnavailable`, when the slot itself cannot be read.
    pub async fn current(&self) -> Result<Option<Session>, AuthError> {
        self.current_at(Timestamp::now()).await
    }

    /// Like [`SessionAccessor::current`] with an explicit clock reading.
    pub async fn current_at(&self, now: Timestamp) -> Result<Option<Session>, AuthError> {
        let Some(loaded) = self.store.load().await? else {
            return Ok(None);
        };

        if loaded.session.is_expired_at(&now) {
            tracing::debug!(
                session_id = %loaded.session.session_id(),
                "Session expired, clearing"
            );
            self.store.discard(&loaded.raw, SessionRejection::Expired).await;
            return Ok(None);
        }

        Ok(Some(loaded.session))
    }

    /// Reads the session, treating a storage failure as "no session".
    async fn current_or_none(&self) -> Option<Session> {
        match self.current().await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(key = %self.store.key(), error = %e, "Session read failed");
                None
            }
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current_or_none().await.is_some()
    }

    pub async fn has_role(&self, kind: RoleKind) -> bool {
        self.current_or_none()
            .await
            .is_some_and(|session| session.has_role(kind))
    }

    /// Brand scope of the live session; `None` for aggregators and anonymous callers.
    pub async fn scope(&self) -> Option<BrandScope> {
        self.current_or_none()
            .await
            .and_then(|session| session.scope().cloned())
    }

    /// Evaluates `requirement` against a freshly read session.
    ///
    /// A storage failure is treated as "no session" and redirects to login.
    pub async fn check(&self, guard: &RouteGuard, requirement: Requirement) -> GuardDecision {
        guard.evaluate(requirement, self.current_or_none().await)
    }

    /// Clear the session. Safe to call when nobody is logged in.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.store.clear().await?;
        tracing::info!(key = %self.store.key(), "Logged out");
        Ok(())
    }

    /// Changes published by the underlying store, if it has an event hub.
    pub fn subscribe(&self) -> Option<broadcast::Receiver<SessionChange>> {
        self.store.events().map(|events| events.subscribe())
    }
}
