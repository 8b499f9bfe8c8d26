//! Browser collaborator services.
//!
//! The core never talks to a browser directly. It goes through these traits:
//! - `TabService`: list, query, mutate, create and remove tabs
//! - `BookmarkService`: read the bookmark tree
//! - `WindowService`: focus or open windows
//! - `PopupHost`: close the popup once a commit has been carried out
//!
//! `SnapshotBrowser` implements the first three over a JSON session snapshot
//! and a Chromium bookmarks file.

#![allow(async_fn_in_trait)]

pub mod chrome_bookmarks;
pub mod snapshot;

pub use snapshot::{SessionSnapshot, SnapshotBrowser};

use crate::error::BrowserError;
use crate::models::{BookmarkNode, Tab, TabId, TabUpdate, WindowId};

pub trait TabService {
    /// All tabs across all windows, windows in order, tabs in tab-strip order
    async fn query_tabs(&self) -> Result<Vec<Tab>, BrowserError>;

    /// The active tab of the last focused window
    async fn active_tab(&self) -> Result<Option<Tab>, BrowserError>;

    async fn update_tab(&self, id: TabId, update: TabUpdate) -> Result<Tab, BrowserError>;

    /// Open `url` in a new tab of the last focused window
    async fn create_tab(&self, url: &str, active: bool) -> Result<Tab, BrowserError>;

    async fn remove_tab(&self, id: TabId) -> Result<(), BrowserError>;
}

pub trait BookmarkService {
    /// The whole bookmark tree, starting at the nameless root node(s)
    async fn bookmark_tree(&self) -> Result<Vec<BookmarkNode>, BrowserError>;
}

pub trait WindowService {
    async fn focus_window(&self, id: WindowId) -> Result<(), BrowserError>;

    /// Open `url` in a new, focused window
    async fn create_window(&self, url: &str) -> Result<WindowId, BrowserError>;
}

/// Owner of the popup surface; closing it is the terminal step of every commit
pub trait PopupHost {
    fn close_popup(&mut self);
}
