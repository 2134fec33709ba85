//! imgflow HTTP Client
//!
//! A type-safe HTTP client for the remote image-processing service.
//!
//! Every failure leaving this crate is an [`ErrorEnvelope`]: transport
//! faults become `NetworkError`, non-success responses and unreadable bodies
//! become `ServerError`, and client-side guards raise `ValidationError`
//! before any request is sent.
//!
//! # Example
//!
//! ```no_run
//! use imgflow_client::ImageServiceClient;
//! use imgflow_core::domain::operation::Operation;
//! use imgflow_core::domain::upload::ImageUpload;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ImageServiceClient::new("http://localhost:8080");
//!
//!     let upload = ImageUpload::new("cat.jpg", "image/jpeg", std::fs::read("cat.jpg")?);
//!     let job = client.submit(&upload, &[Operation::thumbnail(128)]).await?;
//!
//!     println!("Submitted job: {}", job.id);
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
mod resources;
mod service;
mod telemetry;

// Re-export commonly used types
pub use error::{ErrorEnvelope, ErrorKind, Result};
pub use jobs::ResourceBytes;
pub use service::ImageService;

use imgflow_core::dto::job::ErrorBody;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Path prefix of the versioned resource API
pub const API_PREFIX: &str = "/api/v1";

/// HTTP client for the image-processing service
///
/// Methods are organized into logical groups:
/// - Job lifecycle (submit, status, renditions, access URLs, removal)
/// - Collection listing
/// - Telemetry and liveness
#[derive(Debug, Clone)]
pub struct ImageServiceClient {
    /// Service root (e.g., "http://localhost:8080"), without the API prefix
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl ImageServiceClient {
    /// Create a new client
    ///
    /// Accepts either the service root or a URL already ending in `/api/v1`.
    ///
    /// # Example
    /// ```
    /// use imgflow_client::ImageServiceClient;
    ///
    /// let client = ImageServiceClient::new("http://localhost:8080/api/v1/");
    /// assert_eq!(client.base_url(), "http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use imgflow_client::ImageServiceClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ImageServiceClient::with_client("http://localhost:8080", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        let trimmed = base_url.trim_end_matches('/');
        let root = trimmed.strip_suffix(API_PREFIX).unwrap_or(trimmed);
        Self {
            base_url: root.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the service root URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL under the versioned API prefix
    fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Non-success statuses become `ServerError` carrying the service's
    /// message; a body that does not match `T` is a `ServerError` as well.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            ErrorEnvelope::api_error(
                status.as_u16(),
                format!("Failed to parse JSON response: {}", e),
            )
        })
    }

    /// Turn a non-success response into an envelope
    async fn error_from_response(response: reqwest::Response) -> ErrorEnvelope {
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) if !body.message.is_empty() => body.message,
            _ if text.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
            _ => text,
        };

        ErrorEnvelope::api_error(status.as_u16(), message)
    }
}
