//! Short-lived URLs for fetched resume files.
//!
//! Every registered blob is owned by exactly one `ObjectUrl`. Dropping the
//! lease releases the bytes, so a view that goes away (or replaces a blob
//! with a newer fetch) can never leak them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct BlobRegistry {
    inner: Arc<Mutex<HashMap<Uuid, StoredBlob>>>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` and returns the lease that keeps them reachable.
    pub fn register(&self, bytes: Bytes, content_type: &str) -> ObjectUrl {
        let id = Uuid::new_v4();
        self.lock().insert(
            id,
            StoredBlob {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        debug!("Registered blob {id} ({content_type})");
        ObjectUrl {
            id,
            registry: self.clone(),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<StoredBlob> {
        self.lock().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn release(&self, id: Uuid) {
        if self.lock().remove(&id).is_some() {
            debug!("Released blob {id}");
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, StoredBlob>> {
        // A poisoned map only means a panic elsewhere mid-insert; the data is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Lease on a registered blob, served at `/blobs/<id>` while alive.
#[derive(Debug)]
pub struct ObjectUrl {
    id: Uuid,
    registry: BlobRegistry,
}

impl ObjectUrl {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn href(&self) -> String {
        format!("/blobs/{}", self.id)
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lease_keeps_blob_reachable() {
        let registry = BlobRegistry::new();
        let url = registry.register(Bytes::from_static(b"%PDF"), "application/pdf");
        let blob = registry.get(url.id()).unwrap();
        assert_eq!(blob.content_type, "application/pdf");
        assert_eq!(blob.bytes.as_ref(), b"%PDF");
        assert_eq!(url.href(), format!("/blobs/{}", url.id()));
    }

    #[test]
    fn test_drop_releases_blob() {
        let registry = BlobRegistry::new();
        let url = registry.register(Bytes::from_static(b"png"), "image/png");
        let id = url.id();
        drop(url);
        assert!(registry.get(id).is_none());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_replacing_lease_releases_previous() {
        let registry = BlobRegistry::new();
        let mut slot = Some(registry.register(Bytes::from_static(b"old"), "image/png"));
        let old_id = slot.as_ref().unwrap().id();
        slot = Some(registry.register(Bytes::from_static(b"new"), "image/png"));
        assert!(registry.get(old_id).is_none());
        assert_eq!(registry.len(), 1);
        drop(slot);
        assert_eq!(registry.len(), 0);
    }
}
