//! Session value object.
//!
//! A `Session` is the authenticated-identity record a client holds for a
//! bounded time window. It is immutable once issued: a role or scope change
//! requires a new login.
//!
//! # Persisted Shape
//!
//! Sessions are stored as a flat JSON object so the record stays readable in
//! any key-value backend:
//!
//! ```text
//! {
//!   "identifier": "nike@zepto.com",
//!   "role": "brand",
//!   "scope": "Nike",
//!   "displayName": "Nike Brand Manager",
//!   "sessionId": "6f1c...",
//!   "issuedAt": "2024-01-15T10:30:00Z",
//!   "expiresAt": "2024-01-16T10:30:00Z"
//! }
//! ```
//!
//! Deserialization re-checks every invariant, so a record that parses but
//! violates one (an aggregator with a scope, a window that ends before it
//! starts) is rejected the same way as malformed JSON.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Identifier, SessionId, Timestamp, ValidationError};

use super::{BrandScope, Identity, Role, RoleKind};

/// Default session lifetime: 24 hours.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Longest lifetime a session may be issued with: 30 days.
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// An issued login session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionRecord", into = "SessionRecord")]
pub struct Session {
    identifier: Identifier,
    role: Role,
    display_name: String,
    session_id: SessionId,
    issued_at: Timestamp,
    expires_at: Timestamp,
}

impl Session {
    /// Mints a session for a verified identity.
    ///
    /// Only the session issuer calls this; everything else receives sessions
    /// from the store.
    pub(crate) fn issue(identity: Identity, issued_at: Timestamp, ttl: Duration) -> Self {
        Self {
            identifier: identity.identifier,
            role: identity.role,
            display_name: identity.display_name,
            session_id: SessionId::new(),
            issued_at,
            expires_at: issued_at.plus_secs(ttl.as_secs()),
        }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Brand scope for brand sessions, `None` for aggregators.
    pub fn scope(&self) -> Option<&BrandScope> {
        self.role.scope()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn issued_at(&self) -> &Timestamp {
        &self.issued_at
    }

    pub fn expires_at(&self) -> &Timestamp {
        &self.expires_at
    }

    pub fn has_role(&self, kind: RoleKind) -> bool {
        self.role.is(kind)
    }

    /// A session is expired once `now` reaches `expires_at`.
    pub fn is_expired_at(&self, now: &Timestamp) -> bool {
        !now.is_before(&self.expires_at)
    }

    /// Length of the validity window, `expires_at - issued_at`.
    pub fn lifetime_secs(&self) -> u64 {
        self.expires_at.duration_since(&self.issued_at).num_seconds().max(0) as u64
    }

    /// Seconds of validity left at `now`, zero once expired.
    pub fn remaining_secs_at(&self, now: &Timestamp) -> u64 {
        self.expires_at.duration_since(now).num_seconds().max(0) as u64
    }
}

/// Flat wire form of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    identifier: String,
    role: RoleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
    display_name: String,
    session_id: SessionId,
    issued_at: Timestamp,
    expires_at: Timestamp,
}

impl TryFrom<SessionRecord> for Session {
    type Error = ValidationError;

    fn try_from(record: SessionRecord) -> Result<Self, Self::Error> {
        let identifier = Identifier::new(&record.identifier)?;
        let role = Role::from_parts(record.role, record.scope)?;
        if !record.issued_at.is_before(&record.expires_at) {
            return Err(ValidationError::invalid_format(
                "expiresAt",
                "must be after issuedAt",
            ));
        }
        Ok(Self {
            identifier,
            role,
            display_name: record.display_name,
            session_id: record.session_id,
            issued_at: record.issued_at,
            expires_at: record.expires_at,
        })
    }
}

impl From<Session> for SessionRecord {
    fn from(session: Session) -> Self {
        Self {
            identifier: session.identifier.into(),
            role: session.role.kind(),
            scope: session.role.scope().map(|s| s.as_str().to_string()),
            display_name: session.display_name,
            session_id: session.session_id,
            issued_at: session.issued_at,
            expires_at: session.expires_at,
        }
    }
}
