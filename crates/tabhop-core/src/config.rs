use std::path::{Path, PathBuf};

use crate::constants::{APP_DIR_NAME, PREFERENCES_FILE, SESSION_FILE};

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    /// Session snapshot (windows and tabs) the browser services read and write
    pub session_path: PathBuf,
    /// Chromium `Bookmarks` file; no bookmarks are offered when unset
    pub bookmarks_path: Option<PathBuf>,
}

impl CoreConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            session_path: data_dir.join(SESSION_FILE),
            bookmarks_path: default_bookmarks_path(),
            data_dir,
        }
    }

    pub fn with_session_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.session_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_bookmarks_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.bookmarks_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join(PREFERENCES_FILE)
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        let data_dir = dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(APP_DIR_NAME));
        Self::new(data_dir)
    }
}

/// Chromium's default profile bookmarks file, if it exists on this machine
fn default_bookmarks_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?
        .join("google-chrome")
        .join("Default")
        .join("Bookmarks");
    path.exists().then_some(path)
}
