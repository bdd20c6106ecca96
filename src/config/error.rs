//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Host and port do not form a socket address")]
    InvalidBindAddress,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Session TTL must be between 60 seconds and 30 days")]
    InvalidSessionTtl,

    #[error("Cookie secret must be at least 32 bytes")]
    CookieSecretTooShort,

    #[error("Invalid cookie name")]
    InvalidCookieName,

    #[error("Route '{0}' must start with '/'")]
    InvalidRoute(String),

    #[error("Demo credential directory is not allowed in production")]
    DemoDirectoryInProduction,

    #[error("Invalid directory URL format")]
    InvalidDirectoryUrl,

    #[error("Directory URL must use HTTPS in production")]
    DirectoryUrlMustBeHttps,

    #[error("Directory timeout must be between 1 and 60 seconds")]
    InvalidDirectoryTimeout,
}
