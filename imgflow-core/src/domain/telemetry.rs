//! Aggregated processing telemetry
//!
//! Read-only counters computed by the service. The client only decodes and
//! displays them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Service-wide processing counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub total_images_uploaded: u64,
    pub total_images_processed: u64,
    #[serde(default)]
    pub total_images_failed: u64,
    pub total_data_processed_bytes: u64,
    pub average_processing_time_ms: f64,
    #[serde(default)]
    pub operation_statistics: Vec<OperationStatistic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl TelemetrySnapshot {
    pub fn total_data_processed_mb(&self) -> f64 {
        self.total_data_processed_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Counters for one operation type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationStatistic {
    pub operation_type: String,
    pub total_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub average_processing_time_ms: f64,
}

impl OperationStatistic {
    /// Share of successful runs in percent, `None` when nothing ran yet
    pub fn success_rate(&self) -> Option<f64> {
        if self.total_count == 0 {
            return None;
        }
        Some(self.success_count as f64 * 100.0 / self.total_count as f64)
    }
}
