//! Sequential load of everything a review page needs: the stored record,
//! the resume file, its preview image, then normalized feedback.
//!
//! A missing record or file stops the load quietly and leaves the view in
//! its loading state. Any other failure is logged and replaced by the
//! minimal default feedback so the page still renders.

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

use crate::feedback::{self, DisplayFeedback};
use crate::models::resume::{resume_key, ResumeRecord};
use crate::storage::{FileStore, KeyValueStore, StorageError};
use crate::views::blobs::{BlobRegistry, ObjectUrl};

#[derive(Debug, Default)]
pub struct LoadedResume {
    pub heading: Option<String>,
    pub resume_url: Option<ObjectUrl>,
    pub image_url: Option<ObjectUrl>,
    pub feedback: Option<DisplayFeedback>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("stored resume record is not valid JSON: {0}")]
    Record(#[from] serde_json::Error),
}

/// Which step found nothing to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Missing {
    Record,
    ResumeFile,
    PreviewImage,
}

pub struct ResumeLoader<'a> {
    pub kv: &'a dyn KeyValueStore,
    pub files: &'a dyn FileStore,
    pub blobs: &'a BlobRegistry,
}

impl ResumeLoader<'_> {
    /// Never fails: errors degrade to the minimal default feedback.
    pub async fn load(&self, resume_id: &str) -> LoadedResume {
        let mut loaded = LoadedResume::default();
        match self.load_into(resume_id, &mut loaded).await {
            Ok(None) => info!("Loaded resume {resume_id}"),
            Ok(Some(missing)) => {
                info!("Resume {resume_id}: {missing:?} not found; view stays loading")
            }
            Err(e) => {
                warn!("Loading resume {resume_id} failed: {e}; using default feedback");
                loaded.feedback = Some(DisplayFeedback::minimal_default());
            }
        }
        loaded
    }

    async fn load_into(
        &self,
        resume_id: &str,
        loaded: &mut LoadedResume,
    ) -> Result<Option<Missing>, LoadError> {
        let Some(raw) = self.kv.get(&resume_key(resume_id)).await? else {
            return Ok(Some(Missing::Record));
        };
        let record: ResumeRecord = serde_json::from_str(&raw)?;
        loaded.heading = heading_of(&record);

        let Some(resume) = self.read(record.resume_path.as_deref()).await? else {
            return Ok(Some(Missing::ResumeFile));
        };
        loaded.resume_url = Some(self.blobs.register(resume, "application/pdf"));

        let Some(image_path) = record.image_path.as_deref() else {
            return Ok(Some(Missing::PreviewImage));
        };
        let Some(image) = self.read(Some(image_path)).await? else {
            return Ok(Some(Missing::PreviewImage));
        };
        loaded.image_url = Some(self.blobs.register(image, image_content_type(image_path)));

        loaded.feedback = Some(feedback::normalize(&record.feedback));
        Ok(None)
    }

    async fn read(&self, path: Option<&str>) -> Result<Option<Bytes>, StorageError> {
        match path {
            Some(p) if !p.is_empty() => self.files.read(p).await,
            _ => Ok(None),
        }
    }
}

fn heading_of(record: &ResumeRecord) -> Option<String> {
    match (record.company_name.as_deref(), record.job_title.as_deref()) {
        (Some(company), Some(title)) => Some(format!("{company} - {title}")),
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    }
}

fn image_content_type(path: &str) -> &'static str {
    let ext = path.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
