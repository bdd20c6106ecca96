//! Session change notifications.
//!
//! Expiry is lazy and a slot can be read by several holders at once (browser
//! tabs, server replicas behind a shared cache, websocket pushers). Without a
//! signal, a logout in one place is only noticed elsewhere on the next read.
//! `SessionEvents` broadcasts every issue and clear so interested holders can
//! react immediately.
//!
//! # Architecture
//!
//! ```text
//! SessionStore ──publish──> broadcast::Sender<SessionChange>
//!                                 ├── receiver (tab A)
//!                                 └── receiver (push channel)
//! ```

use tokio::sync::broadcast;

use crate::domain::foundation::{SessionId, SessionRejection};
use crate::ports::SlotKey;

/// Why a slot was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearReason {
    Logout,
    Expired,
    Corrupt,
}

impl From<SessionRejection> for ClearReason {
    fn from(rejection: SessionRejection) -> Self {
        match rejection {
            SessionRejection::Expired => ClearReason::Expired,
            SessionRejection::Corrupt => ClearReason::Corrupt,
        }
    }
}

/// A change to one client's session slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    Issued { key: SlotKey, session_id: SessionId },
    Cleared { key: SlotKey, reason: ClearReason },
}

impl SessionChange {
    pub fn key(&self) -> &SlotKey {
        match self {
            SessionChange::Issued { key, .. } | SessionChange::Cleared { key, .. } => key,
        }
    }
}

/// Broadcast hub for session changes.
///
/// Cloning shares the same channel.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionChange>,
}

impl SessionEvents {
    /// Create a hub whose receivers buffer up to `capacity` changes.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.sender.subscribe()
    }

    /// Publish a change. Having no subscribers is normal and not an error.
    pub fn publish(&self, change: SessionChange) {
        let _ = self.sender.send(change);
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new(64)
    }
}
