//! Telemetry and liveness endpoints

use crate::ImageServiceClient;
use crate::error::Result;
use imgflow_core::domain::telemetry::TelemetrySnapshot;
use std::time::Duration;
use tracing::debug;

/// Upper bound for the liveness probe
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

impl ImageServiceClient {
    /// Fetch the service-wide processing counters
    pub async fn fetch_telemetry(&self) -> Result<TelemetrySnapshot> {
        let url = self.api_url("/statistics");
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Probe service liveness
    ///
    /// Hits `/health` at the service root, outside the versioned API. Never
    /// fails: any error, timeout or non-success status yields `false`.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.base_url);

        match self.client.get(&url).timeout(HEALTH_TIMEOUT).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Health check failed: {}", e);
                false
            }
        }
    }
}
