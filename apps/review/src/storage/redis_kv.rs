use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use crate::storage::{KeyValueStore, StorageError};

/// Key-value store backed by Redis `GET`.
#[derive(Clone)]
pub struct RedisKeyValueStore {
    client: redis::Client,
}

impl RedisKeyValueStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        debug!("Redis GET {key}: {}", if value.is_some() { "hit" } else { "miss" });
        Ok(value)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<(String, String)>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let mut keys: Vec<String> = Vec::new();
        {
            let pattern = format!("{}*", escape_glob(prefix));
            let mut iter = conn.scan_match::<_, String>(pattern).await?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }
        keys.sort();
        keys.dedup();

        // Sequential GETs; a key deleted between SCAN and GET is skipped.
        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            let value: Option<String> = conn.get(&key).await?;
            if let Some(value) = value {
                entries.push((key, value));
            }
        }
        debug!("Redis SCAN {prefix}*: {} entries", entries.len());
        Ok(entries)
    }
}

/// Escapes Redis glob metacharacters so `prefix` matches literally.
fn escape_glob(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len());
    for ch in prefix.chars() {
        if matches!(ch, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
