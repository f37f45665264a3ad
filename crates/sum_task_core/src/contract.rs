use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::storage_keys::output_object_key;

pub const REGION_ENV: &str = "REGION";
pub const BUCKET_ENV: &str = "BUCKET";
pub const KEY_ENV: &str = "KEY";
pub const NUM1_ENV: &str = "NUM1";
pub const NUM2_ENV: &str = "NUM2";

pub const TASK_SUCCESS_MESSAGE: &str = "File uploaded successfully!!!";
pub const INGEST_SUCCESS_MESSAGE: &str = "Successfully uploaded to S3";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    A,
    B,
}

impl Operand {
    pub fn name(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
        }
    }

    pub fn env_var(self) -> &'static str {
        match self {
            Self::A => NUM1_ENV,
            Self::B => NUM2_ENV,
        }
    }
}

/// Raw task inputs as read from the environment. Missing variables are empty
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEnvironment {
    pub region: String,
    pub bucket: String,
    pub key: String,
    pub num1: String,
    pub num2: String,
}

impl TaskEnvironment {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).unwrap_or_default();
        Self {
            region: read(REGION_ENV),
            bucket: read(BUCKET_ENV),
            key: read(KEY_ENV),
            num1: read(NUM1_ENV),
            num2: read(NUM2_ENV),
        }
    }

    pub fn from_process_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPlan {
    pub region: String,
    pub bucket: String,
    pub output_key: String,
    pub operand_a: i64,
    pub operand_b: i64,
}

impl TaskPlan {
    /// Fixed-width signed addition; overflow wraps like the machine integer.
    pub fn sum(&self) -> i64 {
        self.operand_a.wrapping_add(self.operand_b)
    }

    pub fn body(&self) -> String {
        self.sum().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    InvalidOperand { operand: Operand, raw: String },
    InvalidKey { raw: String },
    Session { message: String },
    Write { key: String, message: String },
}

impl TaskError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidOperand { .. } => "invalid_operand",
            Self::InvalidKey { .. } => "invalid_key",
            Self::Session { .. } => "session_error",
            Self::Write { .. } => "write_error",
        }
    }
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOperand { operand, raw } => write!(
                f,
                "You provided '{raw}' as input for '{}' ({}). Please provide a valid integer",
                operand.name(),
                operand.env_var(),
            ),
            Self::InvalidKey { raw } => write!(
                f,
                "Input key '{raw}' has no second path segment; expected '<prefix>/<name>'"
            ),
            Self::Session { message } => write!(f, "Error creating session: {message}"),
            Self::Write { key, message } => {
                write!(f, "Error uploading file to '{key}': {message}")
            }
        }
    }
}

impl std::error::Error for TaskError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Base-10 signed integer with an optional sign and no surrounding whitespace.
pub fn parse_operand_text(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

pub fn parse_operand(operand: Operand, raw: &str) -> Result<i64, TaskError> {
    parse_operand_text(raw).ok_or_else(|| TaskError::InvalidOperand {
        operand,
        raw: raw.to_string(),
    })
}

/// Validates every input that can be checked without touching the network.
pub fn plan_task(environment: &TaskEnvironment) -> Result<TaskPlan, TaskError> {
    let operand_a = parse_operand(Operand::A, &environment.num1)?;
    let operand_b = parse_operand(Operand::B, &environment.num2)?;

    let output_key =
        output_object_key(&environment.key).ok_or_else(|| TaskError::InvalidKey {
            raw: environment.key.clone(),
        })?;

    Ok(TaskPlan {
        region: environment.region.clone(),
        bucket: environment.bucket.clone(),
        output_key,
        operand_a,
        operand_b,
    })
}

/// Region identifiers are hostname labels: lowercase ASCII, digits and `-`.
pub fn validate_region(region: &str) -> Result<(), TaskError> {
    if region.is_empty() {
        return Err(TaskError::Session {
            message: "region is not configured".to_string(),
        });
    }

    let well_formed = region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !well_formed || region.starts_with('-') || region.ends_with('-') {
        return Err(TaskError::Session {
            message: format!("malformed region '{region}'"),
        });
    }

    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestRequest {
    #[serde(default)]
    pub a: Value,
    #[serde(default)]
    pub b: Value,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedIngestRequest {
    pub a: i64,
    pub b: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestResponse {
    pub message: String,
    pub bucket: String,
    pub key: String,
    pub num1: String,
    pub num2: String,
}

impl IngestResponse {
    /// The environment a downstream sum task receives for this request.
    pub fn task_environment(&self, region: impl Into<String>) -> TaskEnvironment {
        TaskEnvironment {
            region: region.into(),
            bucket: self.bucket.clone(),
            key: self.key.clone(),
            num1: self.num1.clone(),
            num2: self.num2.clone(),
        }
    }
}

pub fn normalize_ingest_request(
    request: IngestRequest,
) -> Result<NormalizedIngestRequest, ValidationError> {
    match (ingest_operand(&request.a), ingest_operand(&request.b)) {
        (Some(a), Some(b)) => Ok(NormalizedIngestRequest { a, b }),
        _ => Err(ValidationError::new(format!(
            "You provided {} and {} as input. Please provide a valid integer",
            display_value(&request.a),
            display_value(&request.b),
        ))),
    }
}

fn ingest_operand(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => parse_operand_text(text),
        _ => None,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    fn environment(key: &str, num1: &str, num2: &str) -> TaskEnvironment {
        TaskEnvironment {
            region: "us-east-1".to_string(),
            bucket: "mybucket".to_string(),
            key: key.to_string(),
            num1: num1.to_string(),
            num2: num2.to_string(),
        }
    }

    #[test]
    fn reads_environment_through_lookup() {
        let vars = BTreeMap::from([
            (REGION_ENV, "eu-west-1"),
            (BUCKET_ENV, "results"),
            (KEY_ENV, "input/a.json"),
            (NUM1_ENV, "1"),
        ]);

        let environment =
            TaskEnvironment::from_lookup(|name| vars.get(name).map(|value| value.to_string()));

        assert_eq!(environment.region, "eu-west-1");
        assert_eq!(environment.bucket, "results");
        assert_eq!(environment.key, "input/a.json");
        assert_eq!(environment.num1, "1");
        assert_eq!(environment.num2, "");
    }

    #[test]
    fn plans_reference_scenario() {
        let plan = plan_task(&environment("input/data.txt", "3", "4")).expect("plan should pass");

        assert_eq!(plan.bucket, "mybucket");
        assert_eq!(plan.output_key, "output/data.txt");
        assert_eq!(plan.sum(), 7);
        assert_eq!(plan.body(), "7");
    }

    #[test]
    fn body_is_canonical_decimal() {
        let plan = plan_task(&environment("in/x", "+007", "-20")).expect("plan should pass");
        assert_eq!(plan.body(), "-13");
    }

    #[test]
    fn sum_wraps_on_overflow() {
        let plan = plan_task(&environment("in/x", &i64::MAX.to_string(), "1"))
            .expect("plan should pass");
        assert_eq!(plan.sum(), i64::MIN);
    }

    #[test]
    fn rejects_non_numeric_first_operand() {
        let error = plan_task(&environment("in/x", "abc", "4")).expect_err("plan should fail");

        assert_eq!(
            error,
            TaskError::InvalidOperand {
                operand: Operand::A,
                raw: "abc".to_string(),
            }
        );
        assert!(error.to_string().contains("'abc'"));
        assert!(error.to_string().contains("NUM1"));
    }

    #[test]
    fn rejects_empty_operand() {
        let error = plan_task(&environment("in/x", "", "5")).expect_err("plan should fail");
        assert_eq!(error.kind(), "invalid_operand");
    }

    #[test]
    fn rejects_operand_with_whitespace_or_fraction() {
        assert!(parse_operand(Operand::B, " 4").is_err());
        assert!(parse_operand(Operand::B, "4.0").is_err());
        assert!(parse_operand(Operand::B, "99999999999999999999").is_err());
    }

    #[test]
    fn operand_errors_take_precedence_over_key_errors() {
        let error = plan_task(&environment("nofile", "x", "4")).expect_err("plan should fail");
        assert_eq!(error.kind(), "invalid_operand");
    }

    #[test]
    fn rejects_key_without_separator() {
        let error = plan_task(&environment("nofile", "3", "4")).expect_err("plan should fail");
        assert_eq!(
            error,
            TaskError::InvalidKey {
                raw: "nofile".to_string()
            }
        );
    }

    #[test]
    fn validates_region_shape() {
        assert!(validate_region("us-east-1").is_ok());
        assert!(validate_region("ap-southeast-2").is_ok());
        assert_eq!(validate_region("").map_err(|e| e.kind()), Err("session_error"));
        assert!(validate_region("US East").is_err());
        assert!(validate_region("-us-east-1").is_err());
    }

    #[test]
    fn ingest_accepts_integers_and_numeric_strings() {
        let request: IngestRequest =
            serde_json::from_value(json!({"a": 3, "b": "-4"})).expect("request should parse");

        let normalized = normalize_ingest_request(request).expect("request should pass");
        assert_eq!(normalized, NormalizedIngestRequest { a: 3, b: -4 });
    }

    #[test]
    fn ingest_rejects_missing_and_fractional_operands() {
        let request: IngestRequest =
            serde_json::from_value(json!({"a": "abc"})).expect("request should parse");
        let error = normalize_ingest_request(request).expect_err("request should fail");
        assert_eq!(
            error.message(),
            "You provided abc and null as input. Please provide a valid integer"
        );

        let request: IngestRequest =
            serde_json::from_value(json!({"a": 1.5, "b": 2})).expect("request should parse");
        assert!(normalize_ingest_request(request).is_err());
    }

    #[test]
    fn ingest_response_maps_onto_task_environment() {
        let response = IngestResponse {
            message: INGEST_SUCCESS_MESSAGE.to_string(),
            bucket: "pipeline".to_string(),
            key: "input/2024-03-01T12:00:00.000Z.json".to_string(),
            num1: "10".to_string(),
            num2: "-3".to_string(),
        };

        let plan = plan_task(&response.task_environment("us-east-1")).expect("plan should pass");
        assert_eq!(plan.output_key, "output/2024-03-01T12:00:00.000Z.json");
        assert_eq!(plan.body(), "7");
    }
}
