//! Application assembly: turns an [`AppConfig`] into a ready axum router.
//!
//! ```text
//! AppConfig ─┬─ directory ─> Arc<dyn CredentialDirectory> ─> CredentialValidator ─> LoginHandler
//!            ├─ session   ─> Arc<dyn SessionSlot> ─> SessionServices
//!            │              cookie secret ─> CookieSigner
//!            └─ routes    ─> RouteGuard
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use thiserror::Error;

use crate::adapters::directory::{
    DirectorySetupError, FileCredentialDirectory, InMemoryCredentialDirectory,
    RemoteCredentialDirectory, RemoteDirectoryConfig,
};
use crate::adapters::http::cookie::CookieKeyError;
use crate::adapters::http::{auth_routes, AuthAppState, CookieSettings, CookieSigner};
use crate::adapters::storage::{FileSessionSlot, InMemorySessionSlot, RedisSessionSlot};
use crate::application::credentials::{CredentialValidator, SecretHasher};
use crate::application::{LoginHandler, SessionServices};
use crate::config::{AppConfig, DirectorySource, StorageBackend, ValidationError};
use crate::domain::access::RouteGuard;
use crate::ports::{CredentialDirectory, SessionSlot, SlotError};

/// How often the in-memory slot drops abandoned sessions.
const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Errors that stop the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("Credential directory setup failed: {0}")]
    Directory(#[from] DirectorySetupError),

    #[error("Session storage setup failed: {0}")]
    Storage(#[from] SlotError),

    #[error("Cookie signing key rejected: {0}")]
    CookieKey(#[from] CookieKeyError),
}

/// Builds the credential directory selected by `config.directory.source`.
pub async fn build_directory(
    config: &AppConfig,
    hasher: &SecretHasher,
) -> Result<Arc<dyn CredentialDirectory>, StartupError> {
    let directory: Arc<dyn CredentialDirectory> = match config.directory.source {
        DirectorySource::Demo => {
            tracing::warn!("Using seeded demo accounts; not for production use");
            Arc::new(InMemoryCredentialDirectory::with_demo_accounts_hashed_by(hasher)?)
        }
        DirectorySource::File => {
            let path = config
                .directory
                .file_path
                .as_deref()
                .ok_or(ValidationError::MissingRequired("DIRECTORY__FILE_PATH"))?;
            Arc::new(FileCredentialDirectory::load(path).await?)
        }
        DirectorySource::Remote => {
            let base_url = config
                .directory
                .remote_url
                .clone()
                .ok_or(ValidationError::MissingRequired("DIRECTORY__REMOTE_URL"))?;
            Arc::new(RemoteCredentialDirectory::new(RemoteDirectoryConfig {
                base_url,
                timeout: config.directory.timeout(),
            })?)
        }
    };
    Ok(directory)
}

/// Builds the session slot selected by `config.session.storage`.
pub async fn build_slot(config: &AppConfig) -> Result<Arc<dyn SessionSlot>, StartupError> {
    let slot: Arc<dyn SessionSlot> = match config.session.storage {
        StorageBackend::Memory => {
            let slot = InMemorySessionSlot::new();
            spawn_sweeper(slot.clone());
            Arc::new(slot)
        }
        StorageBackend::File => Arc::new(FileSessionSlot::new(&config.session.storage_path)),
        StorageBackend::Redis => {
            let url = config
                .session
                .redis_url
                .as_deref()
                .ok_or(ValidationError::MissingRequired("SESSION__REDIS_URL"))?;
            Arc::new(RedisSessionSlot::connect(url).await?)
        }
    };
    tracing::info!(backend = ?config.session.storage, "Session storage ready");
    Ok(slot)
}

fn spawn_sweeper(slot: InMemorySessionSlot) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = slot.sweep().await;
            if removed > 0 {
                tracing::debug!(removed, "Swept abandoned session slots");
            }
        }
    });
}

/// Assembles the auth state from already-built collaborators.
pub fn build_state(
    config: &AppConfig,
    directory: Arc<dyn CredentialDirectory>,
    slot: Arc<dyn SessionSlot>,
    hasher: SecretHasher,
) -> Result<AuthAppState, StartupError> {
    let sessions = SessionServices::new(slot).with_ttl(config.session.ttl());
    let validator = Arc::new(CredentialValidator::new(directory, hasher));
    let login_handler = Arc::new(LoginHandler::new(validator, sessions.clone()));

    let signer = CookieSigner::new(config.session.cookie_secret.as_bytes())?;
    let cookie = CookieSettings {
        name: config.session.cookie_name.clone(),
        secure: config.is_production(),
        max_age_secs: config.session.ttl_secs,
    };

    Ok(AuthAppState::new(
        login_handler,
        sessions,
        signer,
        cookie,
        RouteGuard::new(config.session.route_map()),
    ))
}

/// Router with the auth endpoints under `/auth` and a liveness probe.
pub fn router(state: AuthAppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/auth", auth_routes(state))
}

/// Validates `config` and builds everything the server needs.
pub async fn build(config: &AppConfig) -> Result<(Router, AuthAppState), StartupError> {
    config.validate()?;

    // Demo accounts are hashed at low cost; keep decoy verification at the same cost
    let hasher = match config.directory.source {
        DirectorySource::Demo => SecretHasher::low_cost(),
        DirectorySource::File | DirectorySource::Remote => SecretHasher::new(),
    };

    let directory = build_directory(config, &hasher).await?;
    let slot = build_slot(config).await?;
    let state = build_state(config, directory, slot, hasher)?;

    Ok((router(state.clone()), state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DirectoryConfig, Environment, ServerConfig, SessionConfig};

    fn config() -> AppConfig {
        AppConfig {
            server: ServerConfig::default(),
            session: SessionConfig {
                cookie_secret: "0123456789abcdef0123456789abcdef".to_string(),
                ..Default::default()
            },
            directory: DirectoryConfig::default(),
        }
    }

    #[tokio::test]
    async fn builds_with_demo_directory_and_memory_slot() {
        assert!(build(&config()).await.is_ok());
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_before_building() {
        let mut config = config();
        config.server.environment = Environment::Production;

        let result = build(&config).await;

        assert!(matches!(
            result,
            Err(StartupError::Config(ValidationError::DemoDirectoryInProduction))
        ));
    }

    #[tokio::test]
    async fn missing_directory_file_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config();
        config.directory.source = DirectorySource::File;
        config.directory.file_path = Some(dir.path().join("absent.yaml").display().to_string());

        let result = build(&config).await;

        assert!(matches!(result, Err(StartupError::Directory(_))));
    }

    #[tokio::test]
    async fn file_slot_backend_builds() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config();
        config.session.storage = StorageBackend::File;
        config.session.storage_path = dir.path().display().to_string();

        assert!(build(&config).await.is_ok());
    }
}
