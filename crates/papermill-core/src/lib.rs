//! Core domain types and traits for the Papermill research service.
//!
//! This crate contains:
//! - Job identifiers and common types
//! - Job record, status, and stage definitions
//! - Stage output and final report payloads
//! - Collaborator traits (text generation, literature search, stage suite)

pub mod error;
pub mod id;
pub mod job;
pub mod report;
pub mod request;
pub mod stages;

pub use error::{Error, Result};
pub use id::JobId;
