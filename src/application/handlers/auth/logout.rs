//! LogoutHandler - Command handler for ending a client's session.

use crate::application::session::SessionServices;
use crate::domain::foundation::AuthError;
use crate::ports::SlotKey;

/// Command to log a client out.
#[derive(Debug, Clone)]
pub struct LogoutCommand {
    pub slot_key: SlotKey,
}

/// Handler for logout requests.
pub struct LogoutHandler {
    sessions: SessionServices,
}

impl LogoutHandler {
    pub fn new(sessions: SessionServices) -> Self {
        Self { sessions }
    }

    /// Clear the client's session. Logging out twice is not an error.
    pub async fn handle(&self, cmd: LogoutCommand) -> Result<(), AuthError> {
        self.sessions.accessor(cmd.slot_key).logout().await
    }
}
