//! Narrow interfaces over the remote stores the review page reads from.
//!
//! Both stores are read-only from this service's point of view. `Ok(None)`
//! means the record or object does not exist; `Err` is reserved for the
//! store itself misbehaving.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[cfg(test)]
pub mod memory;
pub mod redis_kv;
pub mod s3_files;

pub use redis_kv::RedisKeyValueStore;
pub use s3_files::S3FileStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("key-value store error: {0}")]
    KeyValue(#[from] redis::RedisError),

    #[error("file store error: {0}")]
    File(String),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Every `(key, value)` whose key starts with `prefix`, ordered by key.
    async fn list(&self, prefix: &str) -> Result<Vec<(String, String)>, StorageError>;
}

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn read(&self, path: &str) -> Result<Option<Bytes>, StorageError>;
}
