use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use sum_task_core::contract::{validate_region, TaskError};

use crate::adapters::object_store::ObjectStore;

#[derive(Clone)]
pub struct S3ObjectStore {
    bucket: String,
    s3_client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(bucket: impl Into<String>, s3_client: aws_sdk_s3::Client) -> Self {
        Self {
            bucket: bucket.into(),
            s3_client,
        }
    }

    /// Builds a client pinned to `region`. Must run on a multi-threaded tokio
    /// runtime.
    pub fn connect(region: &str, bucket: &str) -> Result<Self, TaskError> {
        validate_region(region)?;

        let region = Region::new(region.to_string());
        let aws_config = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                aws_config::defaults(BehaviorVersion::latest())
                    .region(region)
                    .load()
                    .await
            })
        });

        Ok(Self::new(bucket, aws_sdk_s3::Client::new(&aws_config)))
    }

    /// Uses the ambient region and credentials of the execution environment.
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(bucket, aws_sdk_s3::Client::new(&aws_config))
    }
}

impl ObjectStore for S3ObjectStore {
    fn write_object(
        &self,
        key: &str,
        body: &[u8],
        content_type: Option<&str>,
    ) -> Result<(), String> {
        let bucket = self.bucket.clone();
        let object_key = key.to_string();
        let body_bytes = body.to_vec();
        let content_type = content_type.map(str::to_string);
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_object()
                    .bucket(bucket)
                    .key(object_key)
                    .set_content_type(content_type)
                    .body(ByteStream::from(body_bytes))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to write object to s3: {error}"))
            })
        })
    }
}
