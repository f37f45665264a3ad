pub mod ingest;
pub mod task;
