//! Session and cookie configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::access::{RouteMap, MAX_SESSION_TTL};

use super::error::ValidationError;

const MIN_TTL_SECS: u64 = 60;
const MAX_TTL_SECS: u64 = MAX_SESSION_TTL.as_secs();
const MIN_COOKIE_SECRET_LEN: usize = 32;

/// Where session slots live
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory; sessions are lost on restart
    #[default]
    Memory,
    /// One file per slot under `storage_path`
    File,
    /// Shared Redis at `redis_url`
    Redis,
}

/// Session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in seconds
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Name of the client cookie
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// HMAC key for cookie signatures
    #[serde(default)]
    pub cookie_secret: String,

    /// Slot backend
    #[serde(default)]
    pub storage: StorageBackend,

    /// Directory for the file backend
    #[serde(default = "default_storage_path")]
    pub storage_path: String,

    /// Redis connection URL for the redis backend
    pub redis_url: Option<String>,

    #[serde(default = "default_login_route")]
    pub login_route: String,

    #[serde(default = "default_aggregator_home")]
    pub aggregator_home: String,

    #[serde(default = "default_brand_home")]
    pub brand_home: String,
}

impl SessionConfig {
    /// Get session TTL as Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Redirect targets for the route guard
    pub fn route_map(&self) -> RouteMap {
        RouteMap {
            login: self.login_route.clone(),
            aggregator_home: self.aggregator_home.clone(),
            brand_home: self.brand_home.clone(),
        }
    }

    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_TTL_SECS..=MAX_TTL_SECS).contains(&self.ttl_secs) {
            return Err(ValidationError::InvalidSessionTtl);
        }

        if self.cookie_secret.is_empty() {
            return Err(ValidationError::MissingRequired("SESSION__COOKIE_SECRET"));
        }
        if self.cookie_secret.len() < MIN_COOKIE_SECRET_LEN {
            return Err(ValidationError::CookieSecretTooShort);
        }

        let valid_name = !self.cookie_name.is_empty()
            && self
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid_name {
            return Err(ValidationError::InvalidCookieName);
        }

        for route in [&self.login_route, &self.aggregator_home, &self.brand_home] {
            if !route.starts_with('/') {
                return Err(ValidationError::InvalidRoute(route.clone()));
            }
        }

        match self.storage {
            StorageBackend::Memory => {}
            StorageBackend::File => {
                if self.storage_path.is_empty() {
                    return Err(ValidationError::MissingRequired("SESSION__STORAGE_PATH"));
                }
            }
            StorageBackend::Redis => {
                let url = self
                    .redis_url
                    .as_deref()
                    .filter(|url| !url.is_empty())
                    .ok_or(ValidationError::MissingRequired("SESSION__REDIS_URL"))?;
                if !url.starts_with("redis://") && !url.starts_with("rediss://") {
                    return Err(ValidationError::InvalidRedisUrl);
                }
            }
        }

        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            cookie_name: default_cookie_name(),
            cookie_secret: String::new(),
            storage: StorageBackend::default(),
            storage_path: default_storage_path(),
            redis_url: None,
            login_route: default_login_route(),
            aggregator_home: default_aggregator_home(),
            brand_home: default_brand_home(),
        }
    }
}

fn default_ttl() -> u64 {
    24 * 60 * 60
}

fn default_cookie_name() -> String {
    "console_session".to_string()
}

fn default_storage_path() -> String {
    "./data/sessions".to_string()
}

fn default_login_route() -> String {
    "/login".to_string()
}

fn default_aggregator_home() -> String {
    "/dashboard".to_string()
}

fn default_brand_home() -> String {
    "/campaigns".to_string()
}
