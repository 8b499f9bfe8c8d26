//! Recording fake browser shared by the core's unit tests.

use std::collections::HashSet;

use parking_lot::Mutex;

use crate::browser::{BookmarkService, PopupHost, TabService, WindowService};
use crate::error::BrowserError;
use crate::models::{BookmarkNode, Tab, TabId, TabUpdate, WindowId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Update(TabId, TabUpdate),
    Create { url: String, active: bool },
    Remove(TabId),
    FocusWindow(WindowId),
    CreateWindow(String),
}

#[derive(Default)]
pub struct FakeBrowser {
    tabs: Mutex<Vec<Tab>>,
    bookmarks: Vec<BookmarkNode>,
    fail_bookmarks: bool,
    fail_removals: HashSet<TabId>,
    calls: Mutex<Vec<Call>>,
}

impl FakeBrowser {
    pub fn with_tabs(tabs: Vec<Tab>) -> Self {
        Self {
            tabs: Mutex::new(tabs),
            ..Default::default()
        }
    }

    pub fn with_bookmarks(mut self, tree: Vec<BookmarkNode>) -> Self {
        self.bookmarks = tree;
        self
    }

    pub fn failing_bookmarks(mut self) -> Self {
        self.fail_bookmarks = true;
        self
    }

    pub fn failing_removal_of(mut self, id: TabId) -> Self {
        self.fail_removals.insert(id);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn removed(&self) -> Vec<TabId> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                Call::Remove(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

impl TabService for FakeBrowser {
    async fn query_tabs(&self) -> Result<Vec<Tab>, BrowserError> {
        Ok(self.tabs.lock().clone())
    }

    async fn active_tab(&self) -> Result<Option<Tab>, BrowserError> {
        Ok(self.tabs.lock().iter().find(|t| t.active).cloned())
    }

    async fn update_tab(&self, id: TabId, update: TabUpdate) -> Result<Tab, BrowserError> {
        self.record(Call::Update(id, update.clone()));
        let mut tabs = self.tabs.lock();
        let tab = tabs
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(BrowserError::TabNotFound(id))?;
        if let Some(url) = update.url {
            tab.url = Some(url);
        }
        Ok(tab.clone())
    }

    async fn create_tab(&self, url: &str, active: bool) -> Result<Tab, BrowserError> {
        self.record(Call::Create {
            url: url.to_string(),
            active,
        });
        let mut tabs = self.tabs.lock();
        let id = TabId(tabs.iter().map(|t| t.id.0).max().unwrap_or(0) + 1);
        let tab = Tab::new(id, WindowId(1), "", url);
        tabs.push(tab.clone());
        Ok(tab)
    }

    async fn remove_tab(&self, id: TabId) -> Result<(), BrowserError> {
        self.record(Call::Remove(id));
        if self.fail_removals.contains(&id) {
            return Err(BrowserError::TabNotFound(id));
        }
        let mut tabs = self.tabs.lock();
        let index = tabs
            .iter()
            .position(|t| t.id == id)
            .ok_or(BrowserError::TabNotFound(id))?;
        let removed = tabs.remove(index);
        // Like a real browser, the neighbour takes over an active tab
        if removed.active && !tabs.is_empty() {
            let next = index.min(tabs.len() - 1);
            tabs[next].active = true;
        }
        Ok(())
    }
}

impl BookmarkService for FakeBrowser {
    async fn bookmark_tree(&self) -> Result<Vec<BookmarkNode>, BrowserError> {
        if self.fail_bookmarks {
            return Err(BrowserError::Io(std::io::Error::other("bookmarks unavailable")));
        }
        Ok(self.bookmarks.clone())
    }
}

impl WindowService for FakeBrowser {
    async fn focus_window(&self, id: WindowId) -> Result<(), BrowserError> {
        self.record(Call::FocusWindow(id));
        Ok(())
    }

    async fn create_window(&self, url: &str) -> Result<WindowId, BrowserError> {
        self.record(Call::CreateWindow(url.to_string()));
        Ok(WindowId(2))
    }
}

#[derive(Debug, Default)]
pub struct FakePopup {
    pub closed: bool,
}

impl PopupHost for FakePopup {
    fn close_popup(&mut self) {
        self.closed = true;
    }
}
