//! Shared data models for the Reelcast backend.
//!
//! This crate provides Serde-serializable types for:
//! - Jobs and their status state machine
//! - Intake and update payloads for the job store
//! - Per-job outcomes of a batch sweep

pub mod job;
pub mod outcome;

pub use job::{Job, JobId, JobPatch, JobStatus, NewJob};
pub use outcome::{JobOutcome, SweepOutcome};
