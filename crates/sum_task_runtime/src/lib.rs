//! AWS-oriented adapters and handlers for the sum task pipeline.
//!
//! This crate owns runtime integration details (the container task, the ingest
//! Lambda handler and the S3 storage adapter). Domain rules live in
//! `sum_task_core`.

pub mod adapters;
pub mod handlers;
