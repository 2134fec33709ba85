//! Job DTOs for the image-processing service API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::job::{Job, JobStatus};
use crate::domain::operation::Operation;

/// Response to an accepted upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub id: Uuid,
    pub status: JobStatus,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub operations_count: Option<u32>,
}

impl SubmitResponse {
    /// Builds the local job record, attaching the operations that were sent
    pub fn into_job(self, requested_operations: Vec<Operation>) -> Job {
        let mut job = Job::submitted(self.id, self.status, requested_operations);
        if let Some(count) = self.operations_count.filter(|c| *c > 0) {
            job.total_operations = count;
        }
        job
    }
}

/// Status report for a job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub status: JobStatus,
    pub progress: u32,
    pub processed_operations: u32,
    pub total_operations: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl StatusResponse {
    /// Converts the report into a [`Job`] for `job_id`
    ///
    /// The report does not carry the requested operations; merge it into the
    /// submitted job with [`Job::merge`] to keep them.
    pub fn into_job(self, job_id: Uuid) -> Job {
        Job {
            id: self.id.unwrap_or(job_id),
            status: self.status,
            progress: self.progress.min(100) as u8,
            processed_operations: self.processed_operations,
            total_operations: self.total_operations,
            requested_operations: Vec::new(),
            error_message: self.error_message.filter(|m| !m.is_empty()),
        }
    }
}

/// Temporary download link for a stored rendition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessUrl {
    pub url: String,
    /// Validity in seconds
    #[serde(alias = "expires_in")]
    pub expiry: u64,
}

/// Acknowledgement of a delete
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub id: Option<String>,
}

/// Error body returned by the service on non-success responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_response_requires_counts() {
        let result: Result<StatusResponse, _> =
            serde_json::from_value(json!({"status": "processing", "progress": 40}));
        assert!(result.is_err());
    }

    #[test]
    fn test_status_response_into_job() {
        let id = Uuid::new_v4();
        let response: StatusResponse = serde_json::from_value(json!({
            "status": "processing",
            "progress": 140,
            "processed_operations": 1,
            "total_operations": 2,
            "error_message": ""
        }))
        .unwrap();

        let job = response.into_job(id);
        assert_eq!(job.id, id);
        assert_eq!(job.progress, 100);
        assert_eq!(job.error_message, None);
    }

    #[test]
    fn test_access_url_alias() {
        let url: AccessUrl =
            serde_json::from_value(json!({"url": "https://s3/x", "expires_in": 3600})).unwrap();
        assert_eq!(url.expiry, 3600);
    }

    #[test]
    fn test_submit_response_counts_operations() {
        let response: SubmitResponse = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "status": "pending",
            "operations_count": 3
        }))
        .unwrap();
        let job = response.into_job(vec![Operation::thumbnail(64)]);
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.total_operations, 3);
    }
}
