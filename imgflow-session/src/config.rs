//! Session configuration
//!
//! Defines the tunables of one interactive session: where the service lives,
//! how status polling is paced, what the upload guard accepts and how large a
//! listing page is.

use std::time::Duration;

use thiserror::Error;

use crate::listing::DEFAULT_PAGE_SIZE;
use crate::poller::{DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL, PollConfig};
use crate::validation::{ALLOWED_MIME_TYPES, DEFAULT_MAX_UPLOAD_BYTES, UploadPolicy};

/// Default service root
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Default validity of temporary access URLs, in seconds
pub const DEFAULT_ACCESS_URL_EXPIRY: u64 = 3600;

/// Error returned by [`SessionConfig::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(pub String);

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Service root URL (e.g., "http://localhost:8080")
    pub api_url: String,

    /// Fixed wait between two status fetches
    pub poll_interval: Duration,

    /// Maximum number of status fetches before giving up
    pub poll_max_attempts: u32,

    /// Upload size ceiling in bytes
    pub max_upload_bytes: u64,

    /// MIME types accepted by the upload guard
    pub allowed_mime_types: Vec<String>,

    /// Records per listing page
    pub page_size: u64,

    /// Validity requested for temporary access URLs, in seconds
    pub access_url_expiry: u64,
}

impl SessionConfig {
    /// Creates a new configuration with defaults
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_mime_types: ALLOWED_MIME_TYPES.iter().map(|s| s.to_string()).collect(),
            page_size: DEFAULT_PAGE_SIZE,
            access_url_expiry: DEFAULT_ACCESS_URL_EXPIRY,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Recognized variables, all optional:
    /// - IMGFLOW_API_URL (default: http://localhost:8080)
    /// - IMGFLOW_POLL_INTERVAL_MS (default: 2000)
    /// - IMGFLOW_POLL_MAX_ATTEMPTS (default: 60)
    /// - IMGFLOW_MAX_UPLOAD_BYTES (default: 33554432)
    /// - IMGFLOW_PAGE_SIZE (default: 12)
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("IMGFLOW_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let mut config = Self::new(api_url);

        if let Some(ms) = env_parse::<u64>("IMGFLOW_POLL_INTERVAL_MS") {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(attempts) = env_parse::<u32>("IMGFLOW_POLL_MAX_ATTEMPTS") {
            config.poll_max_attempts = attempts;
        }
        if let Some(bytes) = env_parse::<u64>("IMGFLOW_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = bytes;
        }
        if let Some(size) = env_parse::<u64>("IMGFLOW_PAGE_SIZE") {
            config.page_size = size;
        }

        config
    }

    /// Polling parameters for the submission workflow
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: self.poll_interval,
            max_attempts: self.poll_max_attempts,
        }
    }

    /// Guard parameters for the submission workflow
    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_bytes: self.max_upload_bytes,
            allowed_mime_types: self.allowed_mime_types.clone(),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.is_empty() {
            return Err(ConfigError("api_url cannot be empty".into()));
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ConfigError(
                "api_url must start with http:// or https://".into(),
            ));
        }

        if self.poll_interval.is_zero() {
            return Err(ConfigError("poll_interval must be greater than 0".into()));
        }

        if self.poll_max_attempts == 0 {
            return Err(ConfigError(
                "poll_max_attempts must be greater than 0".into(),
            ));
        }

        if self.max_upload_bytes == 0 {
            return Err(ConfigError(
                "max_upload_bytes must be greater than 0".into(),
            ));
        }

        if self.allowed_mime_types.is_empty() {
            return Err(ConfigError("allowed_mime_types cannot be empty".into()));
        }

        if self.page_size == 0 {
            return Err(ConfigError("page_size must be greater than 0".into()));
        }

        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(2000));
        assert_eq!(config.poll_max_attempts, 60);
        assert_eq!(config.max_upload_bytes, 32 * 1024 * 1024);
        assert_eq!(config.page_size, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SessionConfig::default();

        config.api_url = "not-a-url".to_string();
        assert!(config.validate().is_err());
        config.api_url = "https://images.example.com".to_string();
        assert!(config.validate().is_ok());

        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
        config.poll_interval = Duration::from_millis(10);

        config.page_size = 0;
        assert!(config.validate().is_err());
        config.page_size = 5;

        config.poll_max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_derived_parts() {
        let mut config = SessionConfig::default();
        config.poll_max_attempts = 3;
        config.max_upload_bytes = 1024;

        assert_eq!(config.poll_config().max_attempts, 3);
        assert_eq!(config.upload_policy().max_bytes, 1024);
        assert!(
            config
                .upload_policy()
                .allowed_mime_types
                .contains(&"image/webp".to_string())
        );
    }
}
