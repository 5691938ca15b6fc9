use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::storage::{FileStore, KeyValueStore};
use crate::views::blobs::BlobRegistry;
use crate::views::load::ResumeLoader;
use crate::views::session::ViewRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub kv: Arc<dyn KeyValueStore>,
    pub files: Arc<dyn FileStore>,
    pub auth: Arc<dyn AuthProvider>,
    /// Bytes behind live `/blobs/<id>` URLs.
    pub blobs: BlobRegistry,
    pub views: ViewRegistry,
}

impl AppState {
    pub fn loader(&self) -> ResumeLoader<'_> {
        ResumeLoader {
            kv: self.kv.as_ref(),
            files: self.files.as_ref(),
            blobs: &self.blobs,
        }
    }
}
