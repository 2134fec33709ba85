//! Data Transfer Objects for the image-processing service API
//!
//! Every endpoint gets an explicit record with its required and optional
//! fields spelled out. A body missing a required field fails to decode
//! instead of surfacing as a half-populated value.

pub mod job;
pub mod resource;
