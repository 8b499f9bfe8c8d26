use crate::models::{TabId, WindowId};

/// Failures raised by the browser collaborator services.
///
/// Not-found variants are raised where the missing entity is detected and
/// caught by the nearest caller, which logs and abandons that one action.
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("tab not found: {0}")]
    TabNotFound(TabId),

    #[error("window not found: {0}")]
    WindowNotFound(WindowId),

    #[error("selected entry ({0}) is a folder, or has no url")]
    NoUrl(String),

    #[error("no active tab in the last focused window")]
    NoActiveTab,

    #[error("session I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed session data: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("failed to write preferences: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}
