use chrono::{SecondsFormat, Utc};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use sum_task_core::contract::IngestResponse;
use sum_task_runtime::adapters::s3::S3ObjectStore;
use sum_task_runtime::handlers::ingest::{handle_ingest_event, IngestHandlerConfig};

async fn handle_request(event: LambdaEvent<Value>) -> Result<IngestResponse, Error> {
    let bucket = std::env::var("S3_BUCKET").ok();
    let config = IngestHandlerConfig {
        bucket: bucket.clone(),
        event_time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    let store = S3ObjectStore::from_env(bucket.unwrap_or_default()).await;

    handle_ingest_event(event.payload, &config, &store).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
