//! Core domain types
//!
//! This module contains the domain structures used across imgflow crates.
//! They describe what the remote image-processing service tracks (jobs and
//! their requested operations) and what the client keeps locally (listed
//! resources, paging windows).

pub mod job;
pub mod operation;
pub mod resource;
pub mod telemetry;
pub mod upload;
