//! File-backed browser session.
//!
//! Windows and tabs live in a JSON session snapshot kept in memory behind a
//! mutex and written back after every mutation. Bookmarks are read from a
//! Chromium `Bookmarks` file on every `bookmark_tree` call.

use std::path::PathBuf;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{chrome_bookmarks, BookmarkService, TabService, WindowService};
use crate::config::CoreConfig;
use crate::error::BrowserError;
use crate::models::{BookmarkNode, Tab, TabId, TabUpdate, Window, WindowId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub windows: Vec<Window>,
}

impl SessionSnapshot {
    pub fn new(windows: Vec<Window>) -> Self {
        let mut session = Self { windows };
        session.link_tabs();
        session
    }

    pub fn parse(contents: &str) -> Result<Self, BrowserError> {
        let mut session: SessionSnapshot = serde_json::from_str(contents)?;
        session.link_tabs();
        Ok(session)
    }

    /// Stamp every tab with the id of the window that holds it
    fn link_tabs(&mut self) {
        for window in &mut self.windows {
            for tab in &mut window.tabs {
                tab.window_id = window.id;
            }
        }
    }

    /// The focused window, or the first one when none is marked focused
    fn last_focused_window(&self) -> Option<usize> {
        self.windows
            .iter()
            .position(|w| w.focused)
            .or_else(|| (!self.windows.is_empty()).then_some(0))
    }

    fn find_tab(&self, id: TabId) -> Option<(usize, usize)> {
        self.windows.iter().enumerate().find_map(|(wi, window)| {
            window
                .tabs
                .iter()
                .position(|t| t.id == id)
                .map(|ti| (wi, ti))
        })
    }

    fn next_tab_id(&self) -> TabId {
        let max = self
            .windows
            .iter()
            .flat_map(|w| w.tabs.iter())
            .map(|t| t.id.0)
            .max()
            .unwrap_or(0);
        TabId(max + 1)
    }

    fn next_window_id(&self) -> WindowId {
        WindowId(self.windows.iter().map(|w| w.id.0).max().unwrap_or(0) + 1)
    }

    fn activate(&mut self, window_index: usize, tab_index: usize) {
        for (i, tab) in self.windows[window_index].tabs.iter_mut().enumerate() {
            tab.active = i == tab_index;
        }
    }

    fn focus(&mut self, window_index: usize) {
        for (i, window) in self.windows.iter_mut().enumerate() {
            window.focused = i == window_index;
        }
    }
}

pub struct SnapshotBrowser {
    session_path: Option<PathBuf>,
    bookmarks_path: Option<PathBuf>,
    session: Mutex<SessionSnapshot>,
    bookmarks: Option<BookmarkNode>,
}

impl SnapshotBrowser {
    /// In-memory browser; nothing is written to disk
    pub fn new(session: SessionSnapshot, bookmarks: Option<BookmarkNode>) -> Self {
        Self {
            session_path: None,
            bookmarks_path: None,
            session: Mutex::new(session),
            bookmarks,
        }
    }

    /// Open the session and bookmarks files named by `config`.
    ///
    /// A missing session file starts an empty session that is created on the
    /// first mutation. A malformed one is an error.
    pub fn open(config: &CoreConfig) -> Result<Self, BrowserError> {
        let session = match std::fs::read_to_string(&config.session_path) {
            Ok(contents) => SessionSnapshot::parse(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    "No session snapshot at {}, starting empty",
                    config.session_path.display()
                );
                SessionSnapshot::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            session_path: Some(config.session_path.clone()),
            bookmarks_path: config.bookmarks_path.clone(),
            session: Mutex::new(session),
            bookmarks: None,
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().clone()
    }

    fn persist(&self, session: &SessionSnapshot) {
        let Some(path) = &self.session_path else {
            return;
        };
        let result = serde_json::to_string_pretty(session)
            .map_err(BrowserError::from)
            .and_then(|json| {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, json).map_err(BrowserError::from)
            });
        if let Err(e) = result {
            warn!("Failed to write session snapshot {}: {}", path.display(), e);
        }
    }

    /// Apply `f` to the session under the lock, then write it back
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut SessionSnapshot) -> Result<T, BrowserError>,
    ) -> Result<T, BrowserError> {
        let mut session = self.session.lock();
        let result = f(&mut session)?;
        self.persist(&session);
        Ok(result)
    }
}

impl TabService for SnapshotBrowser {
    async fn query_tabs(&self) -> Result<Vec<Tab>, BrowserError> {
        let session = self.session.lock();
        Ok(session
            .windows
            .iter()
            .flat_map(|w| w.tabs.iter().cloned())
            .collect())
    }

    async fn active_tab(&self) -> Result<Option<Tab>, BrowserError> {
        let session = self.session.lock();
        Ok(session
            .last_focused_window()
            .and_then(|wi| session.windows[wi].tabs.iter().find(|t| t.active))
            .cloned())
    }

    async fn update_tab(&self, id: TabId, update: TabUpdate) -> Result<Tab, BrowserError> {
        self.mutate(|session| {
            let (wi, ti) = session.find_tab(id).ok_or(BrowserError::TabNotFound(id))?;
            if let Some(url) = update.url {
                let tab = &mut session.windows[wi].tabs[ti];
                tab.url = Some(url);
                // The page title belongs to the old document
                tab.title = None;
            }
            if update.active == Some(true) {
                session.activate(wi, ti);
            }
            Ok(session.windows[wi].tabs[ti].clone())
        })
    }

    async fn create_tab(&self, url: &str, active: bool) -> Result<Tab, BrowserError> {
        self.mutate(|session| {
            let id = session.next_tab_id();
            let wi = match session.last_focused_window() {
                Some(wi) => wi,
                None => {
                    let window_id = session.next_window_id();
                    session.windows.push(Window {
                        id: window_id,
                        focused: true,
                        tabs: Vec::new(),
                    });
                    session.windows.len() - 1
                }
            };

            let window = &mut session.windows[wi];
            let mut tab = Tab::new(id, window.id, "", url);
            tab.active = active || window.tabs.is_empty();
            window.tabs.push(tab);
            let ti = window.tabs.len() - 1;
            if active {
                session.activate(wi, ti);
            }
            Ok(session.windows[wi].tabs[ti].clone())
        })
    }

    async fn remove_tab(&self, id: TabId) -> Result<(), BrowserError> {
        self.mutate(|session| {
            let (wi, ti) = session.find_tab(id).ok_or(BrowserError::TabNotFound(id))?;
            let removed = session.windows[wi].tabs.remove(ti);

            let remaining = session.windows[wi].tabs.len();
            if remaining == 0 {
                // Closing the last tab closes its window
                session.windows.remove(wi);
            } else if removed.active {
                session.activate(wi, ti.min(remaining - 1));
            }
            Ok(())
        })
    }
}

impl BookmarkService for SnapshotBrowser {
    async fn bookmark_tree(&self) -> Result<Vec<BookmarkNode>, BrowserError> {
        if let Some(tree) = &self.bookmarks {
            return Ok(vec![tree.clone()]);
        }
        let Some(path) = &self.bookmarks_path else {
            return Ok(Vec::new());
        };
        let contents = tokio::fs::read_to_string(path).await?;
        Ok(vec![chrome_bookmarks::parse(&contents)?])
    }
}

impl WindowService for SnapshotBrowser {
    async fn focus_window(&self, id: WindowId) -> Result<(), BrowserError> {
        self.mutate(|session| {
            let wi = session
                .windows
                .iter()
                .position(|w| w.id == id)
                .ok_or(BrowserError::WindowNotFound(id))?;
            session.focus(wi);
            Ok(())
        })
    }

    async fn create_window(&self, url: &str) -> Result<WindowId, BrowserError> {
        self.mutate(|session| {
            let window_id = session.next_window_id();
            let mut tab = Tab::new(session.next_tab_id(), window_id, "", url);
            tab.active = true;
            session.windows.push(Window {
                id: window_id,
                focused: false,
                tabs: vec![tab],
            });
            session.focus(session.windows.len() - 1);
            Ok(window_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn two_windows() -> SessionSnapshot {
        let mut gh = Tab::new(TabId(1), WindowId(1), "GitHub", "https://github.com");
        gh.active = true;
        let docs = Tab::new(TabId(2), WindowId(1), "Docs", "https://docs.rs");
        let mut news = Tab::new(TabId(3), WindowId(2), "News", "https://news.ycombinator.com");
        news.active = true;
        SessionSnapshot::new(vec![
            Window { id: WindowId(1), focused: false, tabs: vec![gh, docs] },
            Window { id: WindowId(2), focused: true, tabs: vec![news] },
        ])
    }

    #[tokio::test]
    async fn test_query_tabs_in_window_order() {
        let browser = SnapshotBrowser::new(two_windows(), None);
        let ids: Vec<TabId> = browser.query_tabs().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TabId(1), TabId(2), TabId(3)]);
    }

    #[tokio::test]
    async fn test_active_tab_comes_from_focused_window() {
        let browser = SnapshotBrowser::new(two_windows(), None);
        let active = browser.active_tab().await.unwrap().unwrap();
        assert_eq!(active.id, TabId(3));
        assert_eq!(active.window_id, WindowId(2));
    }

    #[tokio::test]
    async fn test_update_missing_tab_fails() {
        let browser = SnapshotBrowser::new(two_windows(), None);
        let err = browser.update_tab(TabId(99), TabUpdate::activate()).await.unwrap_err();
        assert!(matches!(err, BrowserError::TabNotFound(TabId(99))));
    }

    #[tokio::test]
    async fn test_activate_tab_deactivates_siblings() {
        let browser = SnapshotBrowser::new(two_windows(), None);
        browser.update_tab(TabId(2), TabUpdate::activate()).await.unwrap();

        let session = browser.snapshot();
        assert!(!session.windows[0].tabs[0].active);
        assert!(session.windows[0].tabs[1].active);
    }

    #[tokio::test]
    async fn test_create_tab_in_focused_window() {
        let browser = SnapshotBrowser::new(two_windows(), None);
        let tab = browser.create_tab("https://example.com", false).await.unwrap();
        assert_eq!(tab.id, TabId(4));
        assert_eq!(tab.window_id, WindowId(2));
        assert!(!tab.active);
    }

    #[tokio::test]
    async fn test_remove_last_tab_closes_window() {
        let browser = SnapshotBrowser::new(two_windows(), None);
        browser.remove_tab(TabId(3)).await.unwrap();
        assert_eq!(browser.snapshot().windows.len(), 1);

        let err = browser.remove_tab(TabId(3)).await.unwrap_err();
        assert!(matches!(err, BrowserError::TabNotFound(_)));
    }

    #[tokio::test]
    async fn test_create_window_takes_focus() {
        let browser = SnapshotBrowser::new(two_windows(), None);
        let id = browser.create_window("https://example.com").await.unwrap();
        assert_eq!(id, WindowId(3));

        let active = browser.active_tab().await.unwrap().unwrap();
        assert_eq!(active.url.as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn test_focus_unknown_window_fails() {
        let browser = SnapshotBrowser::new(two_windows(), None);
        let err = browser.focus_window(WindowId(42)).await.unwrap_err();
        assert!(matches!(err, BrowserError::WindowNotFound(WindowId(42))));
    }

    #[tokio::test]
    async fn test_mutations_written_back() {
        let dir = tempdir().unwrap();
        let config = CoreConfig::new(dir.path());
        std::fs::write(
            &config.session_path,
            serde_json::to_string(&two_windows()).unwrap(),
        )
        .unwrap();

        let browser = SnapshotBrowser::open(&config).unwrap();
        browser.remove_tab(TabId(1)).await.unwrap();

        let reopened = SnapshotBrowser::open(&config).unwrap();
        let ids: Vec<TabId> = reopened.query_tabs().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TabId(2), TabId(3)]);
    }

    #[tokio::test]
    async fn test_missing_session_starts_empty() {
        let dir = tempdir().unwrap();
        let config = CoreConfig::new(dir.path());
        let browser = SnapshotBrowser::open(&config).unwrap();
        assert!(browser.query_tabs().await.unwrap().is_empty());
        assert!(browser.active_tab().await.unwrap().is_none());
    }
}
