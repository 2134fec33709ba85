//! Submission workflow
//!
//! Drives one image from selection to a terminal job:
//!
//! ```text
//! Idle -> Selected -> Validated -> Uploading -> AwaitingCompletion -> Completed | Failed
//! ```
//!
//! Every transition emits a [`StatusSnapshot`] to the subscribed observers.
//! Mutating calls take `&mut self`, so a workflow handles one submission at a
//! time; cancellation goes through a [`CancelHandle`] that can be cloned into
//! observers or other tasks.

mod snapshot;
mod state;

pub use snapshot::{StatusSnapshot, WorkflowObserver};
pub use state::{WorkflowError, WorkflowState};

use imgflow_client::{ErrorEnvelope, ImageService};
use imgflow_core::domain::job::{Job, JobStatus};
use imgflow_core::domain::operation::Operation;
use imgflow_core::domain::upload::ImageUpload;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::poller::{CancelHandle, PollConfig, Poller};
use crate::validation::UploadPolicy;

/// Percentage shown while the upload request is in flight
const UPLOAD_PERCENT: u8 = 30;
/// Percentage shown once the service has accepted the job
const AWAITING_PERCENT: u8 = 50;
/// Ceiling for remote progress while the job is still active
const ACTIVE_PERCENT_CAP: u8 = 95;

/// State machine for a single image submission
pub struct SubmissionWorkflow<S> {
    service: S,
    policy: UploadPolicy,
    poll_config: PollConfig,
    state: WorkflowState,
    selection: Option<ImageUpload>,
    job: Option<Job>,
    last_error: Option<ErrorEnvelope>,
    percent: u8,
    observers: Vec<Box<dyn WorkflowObserver>>,
    cancel: CancelHandle,
}

impl<S: ImageService> SubmissionWorkflow<S> {
    /// Creates a workflow using the guard and polling settings of `config`
    pub fn new(service: S, config: &SessionConfig) -> Self {
        Self::with_parts(service, config.upload_policy(), config.poll_config())
    }

    pub fn with_parts(service: S, policy: UploadPolicy, poll_config: PollConfig) -> Self {
        Self {
            service,
            policy,
            poll_config,
            state: WorkflowState::Idle,
            selection: None,
            job: None,
            last_error: None,
            percent: 0,
            observers: Vec::new(),
            cancel: CancelHandle::new(),
        }
    }

    /// Registers an observer for every future snapshot
    pub fn subscribe(&mut self, observer: impl WorkflowObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // =============================================================================
    // Accessors
    // =============================================================================

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn selection(&self) -> Option<&ImageUpload> {
        self.selection.as_ref()
    }

    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
    }

    pub fn last_error(&self) -> Option<&ErrorEnvelope> {
        self.last_error.as_ref()
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Handle that cancels the current or next wait for completion
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Current view of the workflow
    pub fn snapshot(&self) -> StatusSnapshot {
        build_snapshot(
            self.state,
            self.percent,
            self.job.as_ref(),
            self.last_error.as_ref(),
        )
    }

    // =============================================================================
    // Transitions
    // =============================================================================

    /// Picks the image to submit
    ///
    /// Allowed from `Idle`, `Selected` and `Validated`; a previous selection
    /// is replaced. No validation happens here.
    pub fn select(&mut self, upload: ImageUpload) -> Result<(), WorkflowError> {
        self.ensure(
            &[
                WorkflowState::Idle,
                WorkflowState::Selected,
                WorkflowState::Validated,
            ],
            "select an image",
        )?;

        debug!("Selected {:?}", upload);
        self.selection = Some(upload);
        self.last_error = None;
        self.cancel.reset();
        self.transition(WorkflowState::Selected, 0);
        Ok(())
    }

    /// Runs the upload guard against the selected image
    ///
    /// A rejected image is discarded and the workflow returns to `Idle`.
    pub fn validate(&mut self) -> Result<(), WorkflowError> {
        self.ensure(&[WorkflowState::Selected], "validate")?;

        let checked = match &self.selection {
            Some(upload) => self.policy.check_upload(upload),
            None => Err(ErrorEnvelope::validation("no image selected")),
        };

        match checked {
            Ok(()) => {
                self.transition(WorkflowState::Validated, 0);
                Ok(())
            }
            Err(e) => {
                warn!("Rejected selection: {}", e);
                self.selection = None;
                self.last_error = Some(e.clone());
                self.transition(WorkflowState::Idle, 0);
                Err(e.into())
            }
        }
    }

    /// Uploads the validated image with `operations`
    ///
    /// An empty or out-of-range operation list leaves the workflow in
    /// `Validated`. An upload failure passes through `Failed` and lands in
    /// `Selected` with the image kept, so the caller can retry.
    ///
    /// # Returns
    /// The id the service assigned to the job
    pub async fn submit(&mut self, operations: &[Operation]) -> Result<Uuid, WorkflowError> {
        self.ensure(&[WorkflowState::Validated], "submit")?;

        if let Err(e) = self.policy.check_operations(operations) {
            warn!("Rejected operations: {}", e);
            self.last_error = Some(e.clone());
            self.transition(WorkflowState::Validated, 0);
            return Err(e.into());
        }

        let Some(upload) = self.selection.take() else {
            return Err(WorkflowError::InvalidTransition {
                state: self.state,
                action: "submit without a selected image",
            });
        };

        self.last_error = None;
        self.transition(WorkflowState::Uploading, UPLOAD_PERCENT);

        info!(
            "Uploading {} with {} operation(s)",
            upload.filename,
            operations.len()
        );
        let result = self.service.submit(&upload, operations).await;
        self.selection = Some(upload);

        match result {
            Ok(job) => {
                let job_id = job.id;
                info!("Job {} accepted with status {}", job_id, job.status);
                self.job = Some(job);
                self.transition(WorkflowState::AwaitingCompletion, AWAITING_PERCENT);
                Ok(job_id)
            }
            Err(e) => {
                warn!("Upload failed: {}", e);
                self.last_error = Some(e.clone());
                self.transition(WorkflowState::Failed, 0);
                self.transition(WorkflowState::Selected, 0);
                Err(e.into())
            }
        }
    }

    /// Polls the submitted job until it is terminal
    ///
    /// Ends in `Completed` on remote success. A remote failure, a failed
    /// status fetch, an exhausted attempt budget or a cancellation all end in
    /// `Failed` with the matching envelope.
    pub async fn await_completion(&mut self) -> Result<Job, WorkflowError> {
        self.ensure(&[WorkflowState::AwaitingCompletion], "await completion")?;

        let Some(job_id) = self.job.as_ref().map(|job| job.id) else {
            return Err(WorkflowError::InvalidTransition {
                state: self.state,
                action: "await completion without a job",
            });
        };

        let poller = Poller::with_cancel(self.poll_config, self.cancel.clone());
        let service = &self.service;
        let job = &mut self.job;
        let percent = &mut self.percent;
        let observers = &self.observers;
        let state = self.state;

        let polled = poller
            .poll(
                job_id,
                move |id| service.fetch_status(id),
                |report: &Job| {
                    let Some(current) = job.as_mut() else {
                        return;
                    };
                    if !current.merge(report.clone()) {
                        debug!(
                            "Ignored stale report for {} ({} after {})",
                            job_id, report.status, current.status
                        );
                    }
                    *percent = (*percent).max(current.progress.min(ACTIVE_PERCENT_CAP));
                    notify(observers, &build_snapshot(state, *percent, Some(&*current), None));
                },
            )
            .await;

        match polled {
            Ok(outcome) if outcome.status.status == JobStatus::Completed => {
                info!(
                    "Job {} completed after {} poll(s)",
                    job_id, outcome.attempts
                );
                self.transition(WorkflowState::Completed, 100);
                match self.job.clone() {
                    Some(job) => Ok(job),
                    None => Err(ErrorEnvelope::server("job record lost").into()),
                }
            }
            Ok(outcome) => {
                let reason = outcome
                    .status
                    .error_message
                    .or_else(|| self.job.as_ref().and_then(|j| j.error_message.clone()))
                    .unwrap_or_else(|| "processing failed".to_string());
                Err(self.fail(ErrorEnvelope::server(reason)))
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Validates if needed, submits and waits for the job to finish
    pub async fn run(&mut self, operations: &[Operation]) -> Result<Job, WorkflowError> {
        if self.state == WorkflowState::Selected {
            self.validate()?;
        }
        self.submit(operations).await?;
        self.await_completion().await
    }

    /// Returns to `Idle`, dropping the job reference and any selection
    pub fn reset(&mut self) {
        debug!("Resetting workflow from {}", self.state);
        self.selection = None;
        self.job = None;
        self.last_error = None;
        self.cancel.reset();
        self.transition(WorkflowState::Idle, 0);
    }

    // =============================================================================
    // Internals
    // =============================================================================

    fn ensure(
        &self,
        allowed: &[WorkflowState],
        action: &'static str,
    ) -> Result<(), WorkflowError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(WorkflowError::InvalidTransition {
                state: self.state,
                action,
            })
        }
    }

    fn fail(&mut self, error: ErrorEnvelope) -> WorkflowError {
        warn!("Job failed: {}", error);
        self.last_error = Some(error.clone());
        self.transition(WorkflowState::Failed, 0);
        error.into()
    }

    fn transition(&mut self, next: WorkflowState, percent: u8) {
        if self.state != next {
            debug!("Workflow {} -> {}", self.state, next);
        }
        self.state = next;
        self.percent = percent;
        notify(&self.observers, &self.snapshot());
    }
}

fn build_snapshot(
    state: WorkflowState,
    percent: u8,
    job: Option<&Job>,
    error: Option<&ErrorEnvelope>,
) -> StatusSnapshot {
    let status = job.map(|j| j.status);
    StatusSnapshot {
        state,
        percent,
        phase: snapshot::describe(state, status, error),
        status,
        job_id: job.map(|j| j.id),
        processed_operations: job.map(|j| j.processed_operations).unwrap_or_default(),
        total_operations: job.map(|j| j.total_operations).unwrap_or_default(),
        error: error.cloned(),
    }
}

fn notify(observers: &[Box<dyn WorkflowObserver>], snapshot: &StatusSnapshot) {
    for observer in observers {
        observer.on_snapshot(snapshot);
    }
}
