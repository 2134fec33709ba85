//! Job domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::operation::Operation;

/// A server-tracked unit of work: one submitted image plus its requested operations
///
/// The `id` is assigned by the remote service when the upload is accepted and
/// never changes afterwards. Status and progress only move forward; see
/// [`Job::merge`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub status: JobStatus,
    /// Completion percentage in `0..=100`
    pub progress: u8,
    pub processed_operations: u32,
    pub total_operations: u32,
    #[serde(default)]
    pub requested_operations: Vec<Operation>,
    /// Failure reason reported by the service, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Job {
    /// Creates the local record for a freshly accepted submission
    pub fn submitted(id: Uuid, status: JobStatus, requested_operations: Vec<Operation>) -> Self {
        let total_operations = requested_operations.len() as u32;
        Self {
            id,
            status,
            progress: 0,
            processed_operations: 0,
            total_operations,
            requested_operations,
            error_message: None,
        }
    }

    /// Whether the job has reached `completed` or `failed`
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Folds a newer status report into this job
    ///
    /// Reports for another job id, reports that move the status backwards and
    /// any change after a terminal status are rejected and leave `self`
    /// untouched. Progress and the processed-operation count never decrease.
    /// The requested operations are kept from the original submission.
    ///
    /// # Returns
    /// `true` if the report was applied
    pub fn merge(&mut self, latest: Job) -> bool {
        if latest.id != self.id {
            return false;
        }
        if self.status.is_terminal() && latest.status != self.status {
            return false;
        }
        if latest.status.rank() < self.status.rank() {
            return false;
        }

        self.status = latest.status;
        self.progress = self.progress.max(latest.progress.min(100));
        self.processed_operations = self.processed_operations.max(latest.processed_operations);
        if latest.total_operations > 0 {
            self.total_operations = latest.total_operations;
        }
        if latest.error_message.is_some() {
            self.error_message = latest.error_message;
        }
        if self.status == JobStatus::Completed {
            self.progress = 100;
        }
        true
    }
}

/// Processing status of a job as reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[serde(alias = "pending")]
    Queued,
    Uploading,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// All statuses, in lifecycle order
    pub const ALL: [JobStatus; 5] = [
        JobStatus::Queued,
        JobStatus::Uploading,
        JobStatus::Processing,
        JobStatus::Completed,
        JobStatus::Failed,
    ];

    /// Terminal statuses admit no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Position in the lifecycle; both terminal statuses share the last rank
    pub fn rank(self) -> u8 {
        match self {
            JobStatus::Queued => 0,
            JobStatus::Uploading => 1,
            JobStatus::Processing => 2,
            JobStatus::Completed | JobStatus::Failed => 3,
        }
    }

    /// Wire name of the status
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Uploading => "uploading",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queued" | "pending" => Ok(JobStatus::Queued),
            "uploading" => Ok(JobStatus::Uploading),
            "processing" => Ok(JobStatus::Processing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(format!("unknown job status '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: Uuid, status: JobStatus, progress: u8, processed: u32) -> Job {
        Job {
            id,
            status,
            progress,
            processed_operations: processed,
            total_operations: 2,
            requested_operations: Vec::new(),
            error_message: None,
        }
    }

    #[test]
    fn test_merge_keeps_requested_operations() {
        let id = Uuid::new_v4();
        let mut job = Job::submitted(id, JobStatus::Queued, vec![Operation::thumbnail(128)]);

        assert!(job.merge(report(id, JobStatus::Processing, 40, 1)));
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.progress, 40);
        assert_eq!(job.requested_operations.len(), 1);
    }

    #[test]
    fn test_merge_progress_never_decreases() {
        let id = Uuid::new_v4();
        let mut job = Job::submitted(id, JobStatus::Queued, Vec::new());

        job.merge(report(id, JobStatus::Processing, 80, 1));
        job.merge(report(id, JobStatus::Processing, 40, 0));

        assert_eq!(job.progress, 80);
        assert_eq!(job.processed_operations, 1);
    }

    #[test]
    fn test_merge_rejects_status_regression() {
        let id = Uuid::new_v4();
        let mut job = Job::submitted(id, JobStatus::Queued, Vec::new());

        job.merge(report(id, JobStatus::Processing, 10, 0));
        assert!(!job.merge(report(id, JobStatus::Queued, 10, 0)));
        assert_eq!(job.status, JobStatus::Processing);
    }

    #[test]
    fn test_merge_terminal_is_final() {
        let id = Uuid::new_v4();
        let mut job = Job::submitted(id, JobStatus::Queued, Vec::new());

        assert!(job.merge(report(id, JobStatus::Completed, 90, 2)));
        assert_eq!(job.progress, 100);
        assert!(!job.merge(report(id, JobStatus::Failed, 100, 2)));
        assert_eq!(job.status, JobStatus::Completed);

        // Same terminal status again is accepted without side effects
        assert!(job.merge(report(id, JobStatus::Completed, 100, 2)));
        assert_eq!(job.processed_operations, 2);
    }

    #[test]
    fn test_merge_ignores_other_job() {
        let mut job = Job::submitted(Uuid::new_v4(), JobStatus::Queued, Vec::new());
        assert!(!job.merge(report(Uuid::new_v4(), JobStatus::Processing, 50, 1)));
        assert_eq!(job.status, JobStatus::Queued);
    }

    #[test]
    fn test_status_pending_alias() {
        let status: JobStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, JobStatus::Queued);
        assert_eq!("Completed".parse::<JobStatus>().unwrap(), JobStatus::Completed);
        assert!("archived".parse::<JobStatus>().is_err());
    }
}
