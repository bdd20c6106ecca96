//! Remote identity service directory.
//!
//! Resolves identities over HTTP:
//!
//! ```text
//! GET {base_url}/identities/{identifier}
//!
//! 200 {"identifier": "...", "role": "brand", "scope": "Nike",
//!      "displayName": "...", "secretHash": "$argon2id$..."}
//! 404 unknown identifier
//! ```
//!
//! Any other status, a transport error, a timeout or an unreadable body is
//! reported as `ValidatorUnavailable` so the login surface can tell an
//! outage apart from a wrong secret.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::domain::access::{Role, RoleKind};
use crate::domain::foundation::{AuthError, Identifier};
use crate::ports::{CredentialDirectory, DirectoryEntry};

use super::DirectorySetupError;

/// Configuration for the remote directory.
#[derive(Debug, Clone)]
pub struct RemoteDirectoryConfig {
    /// Base URL of the identity service (e.g. "https://identity.internal/api").
    pub base_url: String,

    /// Upper bound for a single lookup, connect included.
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityResponse {
    identifier: String,
    role: RoleKind,
    #[serde(default)]
    scope: Option<String>,
    display_name: String,
    secret_hash: String,
}

/// Credential directory backed by a remote identity service.
#[derive(Debug, Clone)]
pub struct RemoteCredentialDirectory {
    client: Client,
    base_url: Url,
}

impl RemoteCredentialDirectory {
    pub fn new(config: RemoteDirectoryConfig) -> Result<Self, DirectorySetupError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| DirectorySetupError::Client(format!("invalid base url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(DirectorySetupError::Client(format!(
                "base url cannot carry a path: {}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DirectorySetupError::Client(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn identity_url(&self, identifier: &Identifier) -> Result<Url, AuthError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AuthError::validator_unavailable("base url cannot carry a path"))?
            .pop_if_empty()
            .push("identities")
            .push(identifier.as_str());
        Ok(url)
    }
}

#[async_trait]
impl CredentialDirectory for RemoteCredentialDirectory {
    async fn lookup(&self, identifier: &Identifier) -> Result<Option<DirectoryEntry>, AuthError> {
        let url = self.identity_url(identifier)?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AuthError::validator_unavailable("identity service timed out")
            } else {
                AuthError::validator_unavailable(format!("identity service unreachable: {}", e))
            }
        })?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Ok(None),
            status => {
                tracing::warn!(%status, "Identity service returned unexpected status");
                return Err(AuthError::validator_unavailable(format!(
                    "identity service returned {}",
                    status
                )));
            }
        }

        let body: IdentityResponse = response.json().await.map_err(|e| {
            AuthError::validator_unavailable(format!("unreadable identity response: {}", e))
        })?;

        let returned = Identifier::new(&body.identifier)
            .map_err(|e| AuthError::validator_unavailable(e.to_string()))?;
        if &returned != identifier {
            return Err(AuthError::validator_unavailable(
                "identity service answered for a different identifier",
            ));
        }

        let role = Role::from_parts(body.role, body.scope)
            .map_err(|e| AuthError::validator_unavailable(e.to_string()))?;

        Ok(Some(DirectoryEntry::new(
            returned,
            role,
            body.display_name,
            body.secret_hash,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode as AxumStatus;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};

    async fn identity(Path(identifier): Path<String>) -> axum::response::Response {
        match identifier.as_str() {
            "nike@zepto.com" => Json(serde_json::json!({
                "identifier": "nike@zepto.com",
                "role": "brand",
                "scope": "Nike",
                "displayName": "Nike Brand Manager",
                "secretHash": "$argon2id$v=19$m=64,t=1,p=1$c2FsdHNhbHQ$aGFzaA"
            }))
            .into_response(),
            "broken@zepto.com" => AxumStatus::INTERNAL_SERVER_ERROR.into_response(),
            "garbled@zepto.com" => "not json".into_response(),
            "liar@zepto.com" => Json(serde_json::json!({
                "identifier": "someone-else@zepto.com",
                "role": "aggregator",
                "displayName": "X",
                "secretHash": "x"
            }))
            .into_response(),
            "slow@zepto.com" => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                AxumStatus::NOT_FOUND.into_response()
            }
            _ => AxumStatus::NOT_FOUND.into_response(),
        }
    }

    async fn spawn_identity_service() -> String {
        let app = Router::new().route("/api/identities/:identifier", get(identity));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/", addr)
    }

    fn directory(base_url: String, timeout: Duration) -> RemoteCredentialDirectory {
        RemoteCredentialDirectory::new(RemoteDirectoryConfig { base_url, timeout }).unwrap()
    }

    fn id(s: &str) -> Identifier {
        Identifier::new(s).unwrap()
    }

    #[tokio::test]
    async fn known_identity_maps_to_entry() {
        let dir = directory(spawn_identity_service().await, Duration::from_secs(2));

        let entry = dir.lookup(&id("nike@zepto.com")).await.unwrap().unwrap();

        assert_eq!(entry.identifier, id("nike@zepto.com"));
        assert_eq!(entry.role.kind(), RoleKind::Brand);
        assert_eq!(entry.display_name, "Nike Brand Manager");
    }

    #[tokio::test]
    async fn not_found_is_absent_not_an_error() {
        let dir = directory(spawn_identity_service().await, Duration::from_secs(2));
        assert_eq!(dir.lookup(&id("ghost@zepto.com")).await, Ok(None));
    }

    #[tokio::test]
    async fn server_error_is_validator_unavailable() {
        let dir = directory(spawn_identity_service().await, Duration::from_secs(2));
        let result = dir.lookup(&id("broken@zepto.com")).await;
        assert!(matches!(result, Err(AuthError::ValidatorUnavailable(_))));
    }

    #[tokio::test]
    async fn unreadable_body_is_validator_unavailable() {
        let dir = directory(spawn_identity_service().await, Duration::from_secs(2));
        let result = dir.lookup(&id("garbled@zepto.com")).await;
        assert!(matches!(result, Err(AuthError::ValidatorUnavailable(_))));
    }

    #[tokio::test]
    async fn mismatched_identifier_is_rejected() {
        let dir = directory(spawn_identity_service().await, Duration::from_secs(2));
        let result = dir.lookup(&id("liar@zepto.com")).await;
        assert!(matches!(result, Err(AuthError::ValidatorUnavailable(_))));
    }

    #[tokio::test]
    async fn timeout_is_validator_unavailable() {
        let dir = directory(spawn_identity_service().await, Duration::from_millis(100));
        let result = dir.lookup(&id("slow@zepto.com")).await;
        assert!(matches!(result, Err(AuthError::ValidatorUnavailable(_))));
    }

    #[tokio::test]
    async fn unreachable_service_is_validator_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let dir = directory(format!("http://{}", addr), Duration::from_secs(1));
        let result = dir.lookup(&id("nike@zepto.com")).await;
        assert!(matches!(result, Err(AuthError::ValidatorUnavailable(_))));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let result = RemoteCredentialDirectory::new(RemoteDirectoryConfig {
            base_url: "not a url".to_string(),
            timeout: Duration::from_secs(1),
        });
        assert!(matches!(result, Err(DirectorySetupError::Client(_))));
    }
}
