//! Shared sum-task domain primitives.
//!
//! This crate owns the task environment contract, operand parsing, output key
//! derivation and the ingest request/response contract. It intentionally
//! excludes AWS SDK and Lambda runtime concerns.

pub mod contract;
pub mod storage_keys;
