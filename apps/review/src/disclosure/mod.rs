//! Disclosure (accordion) coordination: at most one panel open at a time.
//!
//! A coordinator owns a fixed set of item ids. Headers and bodies are
//! short-lived bindings borrowed from it, so they always read the current
//! open item and never hold state of their own. Asking for a binding or a
//! toggle on an id the coordinator does not own is a contract violation
//! and fails immediately.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisclosureError {
    #[error("disclosure item '{0}' is not owned by this coordinator")]
    OutsideCoordinator(String),
}

#[derive(Debug, Clone, Default)]
pub struct DisclosureCoordinator {
    items: Vec<String>,
    open_id: Option<String>,
}

impl DisclosureCoordinator {
    /// Creates a coordinator owning `ids`, with nothing open.
    pub fn with_items<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut items: Vec<String> = Vec::new();
        for id in ids {
            let id = id.into();
            if !items.contains(&id) {
                items.push(id);
            }
        }
        Self {
            items,
            open_id: None,
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn open_id(&self) -> Option<&str> {
        self.open_id.as_deref()
    }

    pub fn owns(&self, id: &str) -> bool {
        self.items.iter().any(|i| i == id)
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open_id.as_deref() == Some(id)
    }

    /// Opens `id`, or closes it if it is already open. Opening one item
    /// implicitly closes any other.
    pub fn toggle(&mut self, id: &str) -> Result<(), DisclosureError> {
        self.ensure_owned(id)?;
        if self.is_open(id) {
            self.open_id = None;
        } else {
            self.open_id = Some(id.to_string());
        }
        Ok(())
    }

    pub fn close_all(&mut self) {
        self.open_id = None;
    }

    pub fn header<'a>(&'a self, id: &'a str) -> Result<DisclosureHeader<'a>, DisclosureError> {
        self.ensure_owned(id)?;
        Ok(DisclosureHeader {
            coordinator: self,
            item_id: id,
        })
    }

    pub fn body<'a>(&'a self, id: &'a str) -> Result<DisclosureBody<'a>, DisclosureError> {
        self.ensure_owned(id)?;
        Ok(DisclosureBody {
            coordinator: self,
            item_id: id,
        })
    }

    /// Snapshot of every item's state, in registration order.
    pub fn snapshot(&self) -> DisclosureSnapshot {
        DisclosureSnapshot {
            open_item: self.open_id.clone(),
            items: self
                .items
                .iter()
                .map(|id| ItemState {
                    id: id.clone(),
                    expanded: self.is_open(id),
                })
                .collect(),
        }
    }

    fn ensure_owned(&self, id: &str) -> Result<(), DisclosureError> {
        if self.owns(id) {
            Ok(())
        } else {
            Err(DisclosureError::OutsideCoordinator(id.to_string()))
        }
    }
}

/// Header binding: reports expansion and names the id a click toggles.
#[derive(Debug, Clone, Copy)]
pub struct DisclosureHeader<'a> {
    coordinator: &'a DisclosureCoordinator,
    item_id: &'a str,
}

impl<'a> DisclosureHeader<'a> {
    pub fn item_id(&self) -> &'a str {
        self.item_id
    }

    pub fn expanded(&self) -> bool {
        self.coordinator.is_open(self.item_id)
    }
}

/// Body binding: content is rendered only while its item is open.
#[derive(Debug, Clone, Copy)]
pub struct DisclosureBody<'a> {
    coordinator: &'a DisclosureCoordinator,
    item_id: &'a str,
}

impl<'a> DisclosureBody<'a> {
    pub fn item_id(&self) -> &'a str {
        self.item_id
    }

    pub fn visible(&self) -> bool {
        self.coordinator.is_open(self.item_id)
    }

    /// Runs `render` only when the body is visible.
    pub fn render_with<T>(&self, render: impl FnOnce() -> T) -> Option<T> {
        self.visible().then(render)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ItemState {
    pub id: String,
    pub expanded: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DisclosureSnapshot {
    pub open_item: Option<String>,
    pub items: Vec<ItemState>,
}
