//! Status snapshots and their subscribers

use imgflow_client::{ErrorEnvelope, ErrorKind};
use imgflow_core::domain::job::JobStatus;
use uuid::Uuid;

use super::state::WorkflowState;

/// Immutable view of a workflow emitted at every transition and poll tick
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub state: WorkflowState,
    /// Overall completion in `0..=100`
    pub percent: u8,
    /// Human-readable description of what is happening
    pub phase: String,
    /// Raw status tag last reported by the service
    pub status: Option<JobStatus>,
    pub job_id: Option<Uuid>,
    pub processed_operations: u32,
    pub total_operations: u32,
    pub error: Option<ErrorEnvelope>,
}

/// Receives every [`StatusSnapshot`] a workflow emits
///
/// Called synchronously from inside the workflow; implementations should
/// return quickly.
pub trait WorkflowObserver: Send + Sync {
    fn on_snapshot(&self, snapshot: &StatusSnapshot);
}

impl<F> WorkflowObserver for F
where
    F: Fn(&StatusSnapshot) + Send + Sync,
{
    fn on_snapshot(&self, snapshot: &StatusSnapshot) {
        self(snapshot)
    }
}

/// Phase description for a state
pub(crate) fn describe(
    state: WorkflowState,
    status: Option<JobStatus>,
    error: Option<&ErrorEnvelope>,
) -> String {
    match state {
        WorkflowState::Idle => "Waiting for an image".to_string(),
        WorkflowState::Selected => "Image selected".to_string(),
        WorkflowState::Validated => "Ready to upload".to_string(),
        WorkflowState::Uploading => "Uploading image...".to_string(),
        WorkflowState::AwaitingCompletion => match status {
            Some(JobStatus::Processing) => "Processing image...".to_string(),
            Some(JobStatus::Uploading) => "Storing upload...".to_string(),
            _ => "Waiting for processing to start...".to_string(),
        },
        WorkflowState::Completed => "Processing completed".to_string(),
        WorkflowState::Failed => match error.map(|e| e.kind) {
            Some(ErrorKind::PollingTimeout) => {
                "Processing is taking longer than expected; the image may still be processing"
                    .to_string()
            }
            Some(ErrorKind::Cancelled) => "Cancelled".to_string(),
            _ => match error {
                Some(e) => format!("Failed: {}", e.message),
                None => "Failed".to_string(),
            },
        },
    }
}
