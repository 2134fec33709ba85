//! imgflow Core
//!
//! Core types and abstractions shared by the imgflow crates.
//!
//! This crate contains:
//! - Domain types: Jobs, operations, listed resources, telemetry
//! - DTOs: Wire shapes exchanged with the image-processing service

pub mod domain;
pub mod dto;
