//! Application-wide constants
//!
//! Centralized location for magic strings and tuning values
//! that are used across multiple modules.

/// Rows moved by PageUp / PageDown
pub const PAGE_SIZE: usize = 25;

/// Maximum length (in chars) of the URL-derived fallback title for untitled tabs
pub const FALLBACK_TITLE_MAX_CHARS: usize = 50;

/// Well-known id of the bookmarks bar folder in Chromium bookmark trees
pub const BOOKMARKS_BAR_ID: &str = "1";

/// Display title of the bookmarks bar folder
pub const BOOKMARKS_BAR_TITLE: &str = "Bookmarks bar";

/// Display titles of the other Chromium bookmark roots
pub const OTHER_BOOKMARKS_TITLE: &str = "Other bookmarks";
pub const MOBILE_BOOKMARKS_TITLE: &str = "Mobile bookmarks";

/// Directory name under the platform config dir
pub const APP_DIR_NAME: &str = "tabhop";

// File names inside the data dir
pub const PREFERENCES_FILE: &str = "preferences.json";
pub const SESSION_FILE: &str = "session.json";
