//! Credential directory configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Which credential directory backs logins
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DirectorySource {
    /// Seeded demo accounts (development only)
    #[default]
    Demo,
    /// YAML file at `file_path`
    File,
    /// Identity service at `remote_url`
    Remote,
}

/// Credential directory configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub source: DirectorySource,

    /// Path of the YAML directory file
    pub file_path: Option<String>,

    /// Base URL of the identity service
    pub remote_url: Option<String>,

    /// Lookup timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl DirectoryConfig {
    /// Get lookup timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate directory configuration
    ///
    /// In production, the demo directory is refused and the identity
    /// service must be reached over HTTPS.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 60 {
            return Err(ValidationError::InvalidDirectoryTimeout);
        }

        match self.source {
            DirectorySource::Demo => {
                if *environment == Environment::Production {
                    return Err(ValidationError::DemoDirectoryInProduction);
                }
            }
            DirectorySource::File => {
                if self.file_path.as_deref().map_or(true, str::is_empty) {
                    return Err(ValidationError::MissingRequired("DIRECTORY__FILE_PATH"));
                }
            }
            DirectorySource::Remote => {
                let url = self
                    .remote_url
                    .as_deref()
                    .filter(|url| !url.is_empty())
                    .ok_or(ValidationError::MissingRequired("DIRECTORY__REMOTE_URL"))?;
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ValidationError::InvalidDirectoryUrl);
                }
                if *environment == Environment::Production && !url.starts_with("https://") {
                    return Err(ValidationError::DirectoryUrlMustBeHttps);
                }
            }
        }

        Ok(())
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            source: DirectorySource::default(),
            file_path: None,
            remote_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}
