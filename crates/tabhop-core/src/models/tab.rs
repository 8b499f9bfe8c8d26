use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub i64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An open browser tab as reported by the tab service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    /// Owning window; filled in by the backend, not stored per tab in the session file
    #[serde(skip, default = "unset_window")]
    pub window_id: WindowId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub active: bool,
}

fn unset_window() -> WindowId {
    WindowId(-1)
}

impl Tab {
    pub fn new(id: TabId, window_id: WindowId, title: &str, url: &str) -> Self {
        Self {
            id,
            window_id,
            title: (!title.is_empty()).then(|| title.to_string()),
            url: (!url.is_empty()).then(|| url.to_string()),
            active: false,
        }
    }
}

/// A browser window and its tabs, in tab-strip order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub id: WindowId,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

/// Partial update applied by `TabService::update_tab`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabUpdate {
    pub url: Option<String>,
    pub active: Option<bool>,
}

impl TabUpdate {
    pub fn navigate(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            active: None,
        }
    }

    pub fn activate() -> Self {
        Self {
            url: None,
            active: Some(true),
        }
    }
}
