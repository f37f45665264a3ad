use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::json;
use sum_task_core::contract::{plan_task, TaskEnvironment, TaskError, TaskPlan};

use crate::adapters::object_store::ObjectStore;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskOutcome {
    pub bucket: String,
    pub key: String,
    pub body: String,
}

/// Runs one sum task: validate inputs, open the store, write the result once.
///
/// `open_store` is only called after operands and key have been validated, so
/// any input error leaves the store untouched.
pub fn run_task<S, F>(
    environment: &TaskEnvironment,
    open_store: F,
) -> Result<TaskOutcome, TaskError>
where
    S: ObjectStore,
    F: FnOnce(&TaskPlan) -> Result<S, TaskError>,
{
    let started_at = Instant::now();
    log_task_info(
        "task_started",
        json!({
            "region": environment.region.clone(),
            "bucket": environment.bucket.clone(),
            "input_key": environment.key.clone(),
        }),
    );

    match execute(environment, open_store) {
        Ok(outcome) => {
            log_task_info(
                "task_completed",
                json!({
                    "bucket": outcome.bucket.clone(),
                    "output_key": outcome.key.clone(),
                    "body": outcome.body.clone(),
                    "duration_ms": started_at.elapsed().as_millis(),
                }),
            );
            Ok(outcome)
        }
        Err(error) => {
            log_task_error(
                "task_failed",
                json!({
                    "error_code": error.kind(),
                    "error": error.to_string(),
                    "duration_ms": started_at.elapsed().as_millis(),
                }),
            );
            Err(error)
        }
    }
}

fn execute<S, F>(environment: &TaskEnvironment, open_store: F) -> Result<TaskOutcome, TaskError>
where
    S: ObjectStore,
    F: FnOnce(&TaskPlan) -> Result<S, TaskError>,
{
    let plan = plan_task(environment)?;
    let store = open_store(&plan)?;
    let body = plan.body();

    store
        .write_object(&plan.output_key, body.as_bytes(), None)
        .map_err(|message| TaskError::Write {
            key: plan.output_key.clone(),
            message,
        })?;

    Ok(TaskOutcome {
        bucket: plan.bucket,
        key: plan.output_key,
        body,
    })
}

fn log_task_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "sum_task",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_task_error(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "sum_task",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
