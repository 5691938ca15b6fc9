use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::disclosure::{DisclosureCoordinator, DisclosureSnapshot};
use crate::feedback::presentation::DETAIL_CATEGORIES;
use crate::feedback::{DisplayFeedback, FeedbackView};
use crate::views::blobs::ObjectUrl;
use crate::views::load::LoadedResume;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Loading,
    Ready,
}

/// One open review page. Owns its blob leases and its accordion state;
/// dropping the session releases both.
#[derive(Debug)]
pub struct ViewSession {
    pub id: Uuid,
    pub resume_id: String,
    /// Token of the caller that opened the view; a later open by the same
    /// caller for the same resume supersedes this session.
    owner: Option<String>,
    pub heading: Option<String>,
    pub resume_url: Option<ObjectUrl>,
    pub image_url: Option<ObjectUrl>,
    pub feedback: Option<DisplayFeedback>,
    pub disclosure: DisclosureCoordinator,
    pub created_at: DateTime<Utc>,
    pub last_access: DateTime<Utc>,
}

impl ViewSession {
    fn new(
        resume_id: String,
        owner: Option<String>,
        loaded: LoadedResume,
        now: DateTime<Utc>,
    ) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            resume_id,
            owner,
            heading: None,
            resume_url: None,
            image_url: None,
            feedback: None,
            disclosure: DisclosureCoordinator::with_items(
                DETAIL_CATEGORIES.iter().map(|c| c.item_id()),
            ),
            created_at: now,
            last_access: now,
        };
        session.apply(loaded);
        session
    }

    /// Replaces everything fetched so far. Previous leases are released as
    /// they are overwritten; the accordion resets to nothing open.
    fn apply(&mut self, loaded: LoadedResume) {
        self.heading = loaded.heading;
        self.resume_url = loaded.resume_url;
        self.image_url = loaded.image_url;
        self.feedback = loaded.feedback;
        self.disclosure.close_all();
    }

    pub fn state(&self) -> ViewState {
        if self.feedback.is_some() {
            ViewState::Ready
        } else {
            ViewState::Loading
        }
    }

    /// The preview is only shown once both the file and its image exist.
    pub fn preview(&self) -> Option<(&ObjectUrl, &ObjectUrl)> {
        Some((self.resume_url.as_ref()?, self.image_url.as_ref()?))
    }

    pub fn view_model(&self) -> ViewModel {
        ViewModel {
            view_id: self.id,
            resume_id: self.resume_id.clone(),
            state: self.state(),
            heading: self.heading.clone(),
            resume_url: self.resume_url.as_ref().map(ObjectUrl::href),
            image_url: self.image_url.as_ref().map(ObjectUrl::href),
            feedback: self.feedback.as_ref().map(FeedbackView::new),
            disclosure: self.disclosure.snapshot(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub view_id: Uuid,
    pub resume_id: String,
    pub state: ViewState,
    pub heading: Option<String>,
    pub resume_url: Option<String>,
    pub image_url: Option<String>,
    pub feedback: Option<FeedbackView>,
    pub disclosure: DisclosureSnapshot,
}

pub const DEFAULT_MAX_VIEWS: usize = 256;

/// All live view sessions, at most `capacity` of them. The lock is never
/// held across an await.
#[derive(Debug, Clone)]
pub struct ViewRegistry {
    inner: Arc<Mutex<HashMap<Uuid, ViewSession>>>,
    capacity: usize,
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_VIEWS)
    }
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::default(),
            capacity: capacity.max(1),
        }
    }

    /// Opens a view that no other caller can supersede.
    pub fn create(&self, resume_id: &str, loaded: LoadedResume) -> Uuid {
        self.open(resume_id, None, loaded)
    }

    /// Opens a view of `resume_id` for `owner`. If that owner already has a
    /// view of the same resume, its content is superseded in place and its
    /// id is returned. Otherwise a new session is added, evicting the least
    /// recently used ones when the registry is full.
    pub fn open(&self, resume_id: &str, owner: Option<&str>, loaded: LoadedResume) -> Uuid {
        let now = Utc::now();
        let mut released: Vec<ViewSession> = Vec::new();
        let mut stale: Option<(Option<ObjectUrl>, Option<ObjectUrl>)> = None;

        let id = {
            let mut views = self.lock();
            let existing = owner.and_then(|o| {
                views
                    .values()
                    .find(|s| s.resume_id == resume_id && s.owner.as_deref() == Some(o))
                    .map(|s| s.id)
            });

            if let Some(session) = existing.and_then(|id| views.get_mut(&id)) {
                session.last_access = now;
                stale = Some((session.resume_url.take(), session.image_url.take()));
                session.apply(loaded);
                info!("Reopened view {} for resume {resume_id}", session.id);
                session.id
            } else {
                while views.len() >= self.capacity {
                    let Some(oldest) = views
                        .values()
                        .min_by_key(|s| s.last_access)
                        .map(|s| s.id)
                    else {
                        break;
                    };
                    if let Some(evicted) = views.remove(&oldest) {
                        released.push(evicted);
                    }
                }
                let session =
                    ViewSession::new(resume_id.to_string(), owner.map(str::to_string), loaded, now);
                let id = session.id;
                views.insert(id, session);
                info!("Opened view {id} for resume {resume_id}");
                id
            }
        };

        if !released.is_empty() {
            info!("Evicted {} least recently used views", released.len());
        }
        drop(stale);
        drop(released);
        id
    }

    /// Runs `f` against a live session, marking it as recently used.
    pub fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut ViewSession) -> R) -> Option<R> {
        let mut views = self.lock();
        let session = views.get_mut(&id)?;
        session.last_access = Utc::now();
        Some(f(session))
    }

    pub fn resume_id(&self, id: Uuid) -> Option<String> {
        self.lock().get(&id).map(|s| s.resume_id.clone())
    }

    /// Supersedes a session's content with a newer load.
    pub fn replace(&self, id: Uuid, loaded: LoadedResume) -> bool {
        let stale = {
            let mut views = self.lock();
            let Some(session) = views.get_mut(&id) else {
                return false;
            };
            session.last_access = Utc::now();
            let stale = (session.resume_url.take(), session.image_url.take());
            session.apply(loaded);
            stale
        };
        drop(stale);
        true
    }

    /// Tears a session down, releasing everything it holds.
    pub fn remove(&self, id: Uuid) -> bool {
        let removed = self.lock().remove(&id);
        match removed {
            Some(session) => {
                info!("Closed view {id} for resume {}", session.resume_id);
                true
            }
            None => false,
        }
    }

    /// Tears down sessions idle for longer than `ttl`. Returns how many.
    pub fn sweep_idle(&self, ttl: Duration, now: DateTime<Utc>) -> usize {
        let expired: Vec<ViewSession> = {
            let mut views = self.lock();
            let ids: Vec<Uuid> = views
                .values()
                .filter(|s| now - s.last_access > ttl)
                .map(|s| s.id)
                .collect();
            ids.iter().filter_map(|id| views.remove(id)).collect()
        };
        if !expired.is_empty() {
            info!("Swept {} idle views", expired.len());
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, ViewSession>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
