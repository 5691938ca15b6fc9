use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::storage::{FileStore, KeyValueStore, StorageError};

/// In-process stores for handler tests.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    files: Mutex<HashMap<String, Bytes>>,
    failing: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_value(&self, key: &str, value: impl Into<String>) {
        self.values.lock().unwrap().insert(key.to_string(), value.into());
    }

    pub fn put_file(&self, path: &str, bytes: impl Into<Bytes>) {
        self.files.lock().unwrap().insert(path.to_string(), bytes.into());
    }

    /// Makes every subsequent read fail with a store error.
    pub fn fail_reads(&self) {
        *self.failing.lock().unwrap() = true;
    }

    fn check(&self) -> Result<(), StorageError> {
        if *self.failing.lock().unwrap() {
            Err(StorageError::File("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<(String, String)>, StorageError> {
        self.check()?;
        let mut entries: Vec<(String, String)> = self
            .values
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort();
        Ok(entries)
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn read(&self, path: &str) -> Result<Option<Bytes>, StorageError> {
        self.check()?;
        Ok(self.files.lock().unwrap().get(path).cloned())
    }
}
