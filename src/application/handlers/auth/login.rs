//! LoginHandler - Command handler for interactive login.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::application::credentials::CredentialValidator;
use crate::application::session::SessionServices;
use crate::domain::access::Session;
use crate::domain::foundation::AuthError;
use crate::ports::SlotKey;

/// Command to log a client in.
#[derive(Debug)]
pub struct LoginCommand {
    pub identifier: String,
    pub secret: SecretString,
    /// Slot the resulting session is written to.
    pub slot_key: SlotKey,
}

/// Handler for login submissions.
pub struct LoginHandler {
    validator: Arc<CredentialValidator>,
    sessions: SessionServices,
}

impl LoginHandler {
    pub fn new(validator: Arc<CredentialValidator>, sessions: SessionServices) -> Self {
        Self {
            validator,
            sessions,
        }
    }

    /// Validate the credentials and, on success, issue a session.
    ///
    /// On failure nothing is written: whatever session the slot held before
    /// the attempt is left as it was.
    pub async fn handle(&self, cmd: LoginCommand) -> Result<Session, AuthError> {
        // 1. Check credentials
        let identity = self
            .validator
            .validate(&cmd.identifier, cmd.secret.expose_secret())
            .await?;

        // 2. Issue and persist the session
        self.sessions.issuer(cmd.slot_key).issue(identity).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::directory::InMemoryCredentialDirectory;
    use crate::adapters::storage::InMemorySessionSlot;
    use crate::application::credentials::SecretHasher;
    use crate::domain::access::{BrandScope, RoleKind};

    fn handler() -> (LoginHandler, SessionServices) {
        let directory = InMemoryCredentialDirectory::with_demo_accounts().unwrap();
        let validator = Arc::new(CredentialValidator::new(
            Arc::new(directory),
            SecretHasher::low_cost(),
        ));
        let sessions = SessionServices::new(Arc::new(InMemorySessionSlot::new()));
        (LoginHandler::new(validator, sessions.clone()), sessions)
    }

    fn cmd(identifier: &str, secret: &str) -> LoginCommand {
        LoginCommand {
            identifier: identifier.to_string(),
            secret: SecretString::new(secret.to_string()),
            slot_key: SlotKey::new("console.session"),
        }
    }

    #[tokio::test]
    async fn successful_login_issues_brand_session() {
        let (handler, sessions) = handler();

        let session = handler.handle(cmd("nike@zepto.com", "demo123")).await.unwrap();

        assert!(session.has_role(RoleKind::Brand));
        assert_eq!(session.scope().map(BrandScope::as_str), Some("Nike"));
        let current = sessions
            .accessor(SlotKey::new("console.session"))
            .current()
            .await
            .unwrap();
        assert_eq!(current, Some(session));
    }

    #[tokio::test]
    async fn failed_login_leaves_previous_session_in_place() {
        let (handler, sessions) = handler();
        let accessor = sessions.accessor(SlotKey::new("console.session"));
        let before = handler.handle(cmd("hul@zepto.com", "demo123")).await.unwrap();

        let result = handler.handle(cmd("nike@zepto.com", "wrong-secret")).await;

        assert_eq!(result, Err(AuthError::InvalidCredentials));
        assert_eq!(accessor.current().await.unwrap(), Some(before));
    }

    #[tokio::test]
    async fn failed_login_on_empty_slot_stays_empty() {
        let (handler, sessions) = handler();

        let result = handler.handle(cmd("ghost@zepto.com", "demo123")).await;

        assert_eq!(result, Err(AuthError::InvalidCredentials));
        let current = sessions
            .accessor(SlotKey::new("console.session"))
            .current()
            .await
            .unwrap();
        assert_eq!(current, None);
    }
}
