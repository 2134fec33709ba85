//! imgflow session layer
//!
//! Stateful client-side logic on top of [`imgflow_client`]:
//!
//! - [`workflow`]: the submission state machine from image selection to a
//!   terminal job, emitting a snapshot at every step
//! - [`poller`]: bounded fixed-interval status polling with cancellation
//! - [`listing`]: paged, filterable view of the remote image collection
//! - [`validation`]: the upload guard (MIME whitelist and size ceiling)
//! - [`config`]: session tunables, loadable from the environment
//!
//! Everything here talks to the service through the
//! [`ImageService`](imgflow_client::ImageService) trait.

pub mod config;
pub mod listing;
pub mod poller;
pub mod validation;
pub mod workflow;

#[cfg(test)]
mod fake;

pub use config::{ConfigError, SessionConfig};
pub use listing::{ListingCache, ListingPage};
pub use poller::{CancelHandle, PollConfig, PollError, Poller};
pub use validation::UploadPolicy;
pub use workflow::{
    StatusSnapshot, SubmissionWorkflow, WorkflowError, WorkflowObserver, WorkflowState,
};
