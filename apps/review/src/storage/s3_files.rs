use async_trait::async_trait;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::debug;

use crate::storage::{FileStore, StorageError};

/// File store backed by a single S3 (or MinIO) bucket. Paths are object keys.
#[derive(Clone)]
pub struct S3FileStore {
    client: Client,
    bucket: String,
}

impl S3FileStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    async fn read(&self, path: &str) -> Result<Option<Bytes>, StorageError> {
        let key = path.trim_start_matches('/');
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    debug!("s3://{}/{} does not exist", self.bucket, key);
                    return Ok(None);
                }
                return Err(StorageError::File(format!("S3 read failed: {e}")));
            }
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::File(format!("S3 body read failed: {e}")))?;
        Ok(Some(data.into_bytes()))
    }
}
