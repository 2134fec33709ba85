//! Bounded status polling
//!
//! Repeatedly fetches the status of a job until it reaches a terminal state,
//! the attempt budget runs out, or the caller cancels. Each tick fetches once,
//! hands the freshest status to a callback and then waits a fixed interval.
//! There is no backoff and no jitter, and a failed fetch ends the loop.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use imgflow_client::ErrorEnvelope;
use imgflow_core::domain::job::{Job, JobStatus};
use thiserror::Error;
use tracing::{debug, warn};

/// Default wait between two status fetches
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Default number of status fetches before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Pacing of one polling run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Anything the poller can decide terminality for
pub trait PollStatus {
    fn is_terminal(&self) -> bool;
}

impl PollStatus for JobStatus {
    fn is_terminal(&self) -> bool {
        JobStatus::is_terminal(*self)
    }
}

impl PollStatus for Job {
    fn is_terminal(&self) -> bool {
        Job::is_terminal(self)
    }
}

/// Cloneable cancellation switch shared between a poller and its callers
///
/// Cancelling never interrupts a fetch in flight; the poller notices the flag
/// at its next check.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Re-arms the handle for the next run
    pub(crate) fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Why a polling run ended without a terminal status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("no terminal status after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    #[error("polling cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },

    #[error(transparent)]
    Fetch(#[from] ErrorEnvelope),
}

impl From<PollError> for ErrorEnvelope {
    fn from(err: PollError) -> Self {
        match err {
            PollError::Timeout { attempts } => ErrorEnvelope::polling_timeout(attempts),
            PollError::Cancelled { .. } => ErrorEnvelope::cancelled(err.to_string()),
            PollError::Fetch(envelope) => envelope,
        }
    }
}

/// Terminal status together with the number of fetches it took
#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome<S> {
    pub status: S,
    pub attempts: u32,
}

/// Fixed-interval, attempt-bounded poller
#[derive(Debug, Clone, Default)]
pub struct Poller {
    config: PollConfig,
    cancel: CancelHandle,
}

impl Poller {
    pub fn new(config: PollConfig) -> Self {
        Self::with_cancel(config, CancelHandle::new())
    }

    /// Creates a poller that observes an existing cancellation handle
    pub fn with_cancel(config: PollConfig, cancel: CancelHandle) -> Self {
        Self { config, cancel }
    }

    pub fn config(&self) -> PollConfig {
        self.config
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Polls `fetch(id)` until the returned status is terminal
    ///
    /// `on_tick` sees every fetched status, the terminal one included, before
    /// the poller decides whether to continue. The only wait per tick comes
    /// after the callback.
    ///
    /// # Arguments
    /// * `id` - Identifier handed to every fetch
    /// * `fetch` - Produces the current status for `id`
    /// * `on_tick` - Invoked with the freshest status on each tick
    ///
    /// # Returns
    /// The terminal status and the attempt count, or a [`PollError`] for
    /// timeout, cancellation or a failed fetch
    ///
    /// # Example
    /// ```no_run
    /// # use imgflow_client::ImageServiceClient;
    /// # use imgflow_core::domain::job::Job;
    /// # use imgflow_session::poller::{PollConfig, Poller};
    /// # async fn example(client: ImageServiceClient, id: uuid::Uuid) -> anyhow::Result<()> {
    /// let poller = Poller::new(PollConfig::default());
    /// let outcome = poller
    ///     .poll(id, |id| client.fetch_status(id), |job: &Job| println!("{}%", job.progress))
    ///     .await?;
    /// println!("finished as {}", outcome.status.status);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn poll<Id, S, F, Fut, C>(
        &self,
        id: Id,
        mut fetch: F,
        mut on_tick: C,
    ) -> Result<PollOutcome<S>, PollError>
    where
        Id: Clone + Display,
        S: PollStatus,
        F: FnMut(Id) -> Fut,
        Fut: Future<Output = Result<S, ErrorEnvelope>>,
        C: FnMut(&S),
    {
        let mut attempts: u32 = 0;

        loop {
            if self.cancel.is_cancelled() {
                debug!("Polling {} cancelled after {} attempt(s)", id, attempts);
                return Err(PollError::Cancelled { attempts });
            }

            if attempts >= self.config.max_attempts {
                warn!("Polling {} gave up after {} attempt(s)", id, attempts);
                return Err(PollError::Timeout { attempts });
            }

            attempts += 1;
            debug!(
                "Polling {} (attempt {}/{})",
                id, attempts, self.config.max_attempts
            );

            let status = match fetch(id.clone()).await {
                Ok(status) => status,
                Err(e) => {
                    warn!("Status fetch for {} failed: {}", id, e);
                    return Err(PollError::Fetch(e));
                }
            };

            on_tick(&status);

            if status.is_terminal() {
                debug!("{} reached a terminal status after {} attempt(s)", id, attempts);
                return Ok(PollOutcome { status, attempts });
            }

            if attempts >= self.config.max_attempts {
                warn!("Polling {} gave up after {} attempt(s)", id, attempts);
                return Err(PollError::Timeout { attempts });
            }

            if self.cancel.is_cancelled() {
                debug!("Polling {} cancelled after {} attempt(s)", id, attempts);
                return Err(PollError::Cancelled { attempts });
            }

            tokio::time::sleep(self.config.interval).await;
        }
    }
}
