//! Configuration module
//!
//! Combines the `--api-url` flag with the session settings read from the
//! environment.

use anyhow::{Context, Result};
use imgflow_client::ImageServiceClient;
use imgflow_session::SessionConfig;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Session tunables; `api_url` comes from the command line
    pub session: SessionConfig,
}

impl Config {
    /// Loads session settings from the environment and applies `api_url`
    pub fn load(api_url: String) -> Result<Self> {
        let mut session = SessionConfig::from_env();
        session.api_url = api_url;
        session.validate().context("Invalid configuration")?;

        Ok(Self { session })
    }

    pub fn client(&self) -> ImageServiceClient {
        ImageServiceClient::new(self.session.api_url.clone())
    }
}
