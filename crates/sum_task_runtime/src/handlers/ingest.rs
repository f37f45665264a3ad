use serde_json::{json, Value};
use sum_task_core::contract::{
    normalize_ingest_request, IngestRequest, IngestResponse, ValidationError,
    INGEST_SUCCESS_MESSAGE,
};
use sum_task_core::storage_keys::input_object_key;

use crate::adapters::object_store::ObjectStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestHandlerConfig {
    pub bucket: Option<String>,
    /// RFC 3339 UTC with millisecond precision, e.g. `2024-03-01T12:00:00.000Z`.
    pub event_time: String,
}

/// Records a sum request under `input/` and returns the environment handed to
/// the downstream sum task.
pub fn handle_ingest_event(
    event: Value,
    config: &IngestHandlerConfig,
    store: &impl ObjectStore,
) -> Result<IngestResponse, ValidationError> {
    let result = ingest(event, config, store);
    match &result {
        Ok(response) => log_ingest_info(
            "ingest_stored",
            json!({
                "bucket": response.bucket.clone(),
                "key": response.key.clone(),
                "num1": response.num1.clone(),
                "num2": response.num2.clone(),
            }),
        ),
        Err(error) => log_ingest_error(
            "ingest_failed",
            json!({
                "error": error.message(),
            }),
        ),
    }
    result
}

fn ingest(
    event: Value,
    config: &IngestHandlerConfig,
    store: &impl ObjectStore,
) -> Result<IngestResponse, ValidationError> {
    let payload = normalize_apigw_event(event).map_err(ValidationError::new)?;
    log_ingest_info("ingest_received", json!({ "payload": payload.clone() }));

    let request = serde_json::from_value::<IngestRequest>(payload)
        .map_err(|error| ValidationError::new(format!("Malformed request: {error}")))?;
    let normalized = normalize_ingest_request(request)?;

    let bucket = match config.bucket.as_deref() {
        Some(value) if !value.trim().is_empty() => value,
        _ => return Err(ValidationError::new("S3_BUCKET must be configured")),
    };

    let key = input_object_key(&config.event_time);
    let body = serde_json::to_vec(&normalized)
        .map_err(|error| ValidationError::new(format!("Failed to serialize request: {error}")))?;

    store
        .write_object(&key, &body, Some("application/json"))
        .map_err(|error| ValidationError::new(format!("Failed to persist request: {error}")))?;

    Ok(IngestResponse {
        message: INGEST_SUCCESS_MESSAGE.to_string(),
        bucket: bucket.to_string(),
        key,
        num1: normalized.a.to_string(),
        num2: normalized.b.to_string(),
    })
}

fn normalize_apigw_event(event: Value) -> Result<Value, String> {
    let Some(object) = event.as_object() else {
        return Err("Request payload must be a JSON object".to_string());
    };

    let Some(body) = object.get("body") else {
        return Ok(event);
    };

    match body {
        Value::Null => Ok(json!({})),
        Value::Object(_) => Ok(body.clone()),
        Value::String(text) => {
            serde_json::from_str(text).map_err(|error| format!("Malformed JSON body: {error}"))
        }
        _ => Err("Request body must be a JSON object".to_string()),
    }
}

fn log_ingest_info(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "ingest_handler",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_ingest_error(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "ingest_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
