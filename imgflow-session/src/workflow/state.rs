//! Workflow states and errors

use imgflow_client::{ErrorEnvelope, ErrorKind};
use thiserror::Error;

/// Position of a submission in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Selected,
    Validated,
    Uploading,
    AwaitingCompletion,
    Completed,
    Failed,
}

impl WorkflowState {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Selected => "selected",
            WorkflowState::Validated => "validated",
            WorkflowState::Uploading => "uploading",
            WorkflowState::AwaitingCompletion => "awaiting_completion",
            WorkflowState::Completed => "completed",
            WorkflowState::Failed => "failed",
        }
    }

    /// `Completed` or `Failed`
    pub fn is_finished(self) -> bool {
        matches!(self, WorkflowState::Completed | WorkflowState::Failed)
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`SubmissionWorkflow`](super::SubmissionWorkflow)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// The call is not allowed in the current state; nothing changed
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: WorkflowState,
        action: &'static str,
    },

    #[error(transparent)]
    Failed(#[from] ErrorEnvelope),
}

impl WorkflowError {
    /// The attached envelope, if the error came from a guard or the service
    pub fn envelope(&self) -> Option<&ErrorEnvelope> {
        match self {
            WorkflowError::Failed(envelope) => Some(envelope),
            WorkflowError::InvalidTransition { .. } => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.envelope().map(|e| e.kind)
    }
}
