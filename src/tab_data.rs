/// Data structures exchanged with the browser
use serde::{Deserialize, Serialize};

pub type TabId = i32;
pub type WindowId = i32;

/// Snapshot of a browser tab as reported by `tabs.query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    pub id: TabId,
    pub window_id: WindowId,
    pub index: i32,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Container (contextual identity) the tab belongs to
    #[serde(default)]
    pub cookie_store_id: Option<String>,
}

impl TabRecord {
    pub fn new(id: TabId, window_id: WindowId, index: i32, url: &str, title: &str) -> TabRecord {
        TabRecord {
            id,
            window_id,
            index,
            pinned: false,
            active: false,
            status: Some(STATUS_COMPLETE.to_string()),
            title: Some(title.to_string()),
            url: Some(url.to_string()),
            cookie_store_id: None,
        }
    }

    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn is_complete(&self) -> bool {
        self.status.as_deref() == Some(STATUS_COMPLETE)
    }
}

pub const STATUS_COMPLETE: &str = "complete";

/// A container as reported by `contextualIdentities.query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerInfo {
    pub cookie_store_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Filter for `tabs.query`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabQuery {
    pub pinned: bool,
    pub window_id: WindowId,
}
