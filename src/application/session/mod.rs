//! Session lifecycle: store, issuer, accessor and change notifications.
//!
//! `SessionServices` is the composition root for one slot backend. It hands
//! out store/issuer/accessor triples bound to a client's slot key, so each
//! client (or each test) gets independent session state without any global.
//!
//! ```text
//! CredentialValidator ─> SessionIssuer ─> SessionStore ─> SessionSlot
//!                                              ^
//!                         SessionAccessor ─────┘ ─> RouteGuard / ScopeFilter
//! ```

mod accessor;
mod events;
mod issuer;
mod store;

pub use accessor::SessionAccessor;
pub use events::{ClearReason, SessionChange, SessionEvents};
pub use issuer::SessionIssuer;
pub use store::SessionStore;

use std::sync::Arc;
use std::time::Duration;

use crate::domain::access::DEFAULT_SESSION_TTL;
use crate::ports::{SessionSlot, SlotKey};

/// Builds session components bound to a slot backend.
#[derive(Clone)]
pub struct SessionServices {
    slot: Arc<dyn SessionSlot>,
    events: SessionEvents,
    ttl: Duration,
}

impl SessionServices {
    pub fn new(slot: Arc<dyn SessionSlot>) -> Self {
        Self {
            slot,
            events: SessionEvents::default(),
            ttl: DEFAULT_SESSION_TTL,
        }
    }

    /// Session lifetime for issued sessions, capped at
    /// [`MAX_SESSION_TTL`](crate::domain::access::MAX_SESSION_TTL).
    ///
    /// Stored sessions with a longer window are refused on read.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = issuer::bounded_ttl(ttl);
        self
    }

    pub fn with_events(mut self, events: SessionEvents) -> Self {
        self.events = events;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    pub fn store(&self, key: SlotKey) -> SessionStore {
        SessionStore::new(self.slot.clone(), key)
            .with_max_ttl(self.ttl)
            .with_events(self.events.clone())
    }

    pub fn issuer(&self, key: SlotKey) -> SessionIssuer {
        SessionIssuer::new(self.store(key), self.ttl)
    }

    pub fn accessor(&self, key: SlotKey) -> SessionAccessor {
        SessionAccessor::new(self.store(key))
    }
}
