//! Commit handling: turns a committed row plus the resolved open target into
//! browser navigation, closes marked tabs, then closes the popup.
//!
//! Side effects are fire-and-forget from the user's point of view: failures
//! are logged and never stop the close sweep or the popup from closing.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::browser::{PopupHost, TabService, WindowService};
use crate::error::BrowserError;
use crate::list::{RenderedList, RenderedRow};
use crate::models::{TabId, TabUpdate, WindowId};

/// How a committed row should be opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenTarget {
    /// Focus a tab row's tab; open a bookmark in the current tab
    Default,
    NewTab { background: bool },
    NewWindow,
    /// Replace the current tab's URL, closing the row's own tab afterwards
    ForceCurrentTab,
}

/// The navigation that was actually carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Focused(TabId),
    ReplacedCurrent(TabId),
    OpenedTab(TabId),
    OpenedWindow(WindowId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Target after close-mark redirection
    pub target: Option<OpenTarget>,
    /// `None` when the primary navigation failed
    pub navigation: Option<Navigation>,
    pub closed: Vec<TabId>,
    pub failed_closes: Vec<TabId>,
}

pub struct ActionDispatcher<B> {
    browser: Arc<B>,
    current_tab: Option<TabId>,
}

impl<B> ActionDispatcher<B>
where
    B: TabService + WindowService,
{
    /// `current_tab` is the tab the popup was opened over, if known
    pub fn new(browser: Arc<B>, current_tab: Option<TabId>) -> Self {
        Self {
            browser,
            current_tab,
        }
    }

    /// Resolve the final target for `row`, applying close-mark rules.
    ///
    /// Returns the target and the row's own tab when it must be closed
    /// once the navigation succeeded.
    fn resolve(
        &self,
        list: &mut RenderedList,
        row: &RenderedRow,
        requested: OpenTarget,
    ) -> (OpenTarget, Option<TabId>) {
        let row_tab = row.tab_id();

        // Both of these load the URL into the current tab, which therefore
        // can't be closed by the same commit
        let reuses_current = match requested {
            OpenTarget::ForceCurrentTab => true,
            OpenTarget::Default => row_tab.is_none(),
            _ => false,
        };
        if reuses_current {
            list.unmark_current_tab();
        }

        if requested == OpenTarget::ForceCurrentTab {
            let close = row_tab.filter(|id| Some(*id) != self.current_tab);
            return (OpenTarget::ForceCurrentTab, close);
        }

        match row_tab {
            Some(id) if row.marked_for_close => {
                (OpenTarget::NewTab { background: false }, Some(id))
            }
            _ => (requested, None),
        }
    }

    /// Commit the row at `index` with the requested target.
    ///
    /// Does nothing for an out-of-range index. Otherwise the popup is always
    /// closed at the end, whatever failed along the way.
    pub async fn commit<H: PopupHost>(
        &self,
        list: &mut RenderedList,
        index: usize,
        requested: OpenTarget,
        host: &mut H,
    ) -> CommitReport {
        let Some(row) = list.get(index).cloned() else {
            debug!("Commit on empty selection ignored");
            return CommitReport::default();
        };

        let (target, close_row_tab) = self.resolve(list, &row, requested);
        let mut report = CommitReport {
            target: Some(target),
            ..Default::default()
        };

        // The tab that received the URL may have come from `active_tab()`
        // rather than the list, so it is never closed by this commit
        let mut replaced = None;
        match self.navigate(&row, target).await {
            Ok(navigation) => {
                info!("Committed '{}' as {:?}", row.item.title, navigation);
                report.navigation = Some(navigation);
                if let Navigation::ReplacedCurrent(id) = navigation {
                    replaced = Some(id);
                }
                if let Some(id) = close_row_tab.filter(|id| Some(*id) != replaced) {
                    self.close_best_effort(id, &mut report).await;
                }
            }
            Err(e) => error!("Failed to open '{}': {}", row.item.url, e),
        }

        for id in list.marked_tab_ids(Some(index)) {
            if Some(id) != close_row_tab && Some(id) != replaced {
                self.close_best_effort(id, &mut report).await;
            }
        }

        host.close_popup();
        report
    }

    async fn navigate(
        &self,
        row: &RenderedRow,
        target: OpenTarget,
    ) -> Result<Navigation, BrowserError> {
        let url = row.item.url.as_str();
        if url.is_empty() {
            return Err(BrowserError::NoUrl(row.item.title.clone()));
        }
        match target {
            OpenTarget::Default => match row.tab_id() {
                Some(id) => self.focus_tab(id).await.map(|_| Navigation::Focused(id)),
                None => self.replace_current(url).await.map(Navigation::ReplacedCurrent),
            },
            OpenTarget::NewTab { background } => {
                let tab = self.browser.create_tab(url, !background).await?;
                Ok(Navigation::OpenedTab(tab.id))
            }
            OpenTarget::NewWindow => {
                let window = self.browser.create_window(url).await?;
                Ok(Navigation::OpenedWindow(window))
            }
            OpenTarget::ForceCurrentTab => {
                self.replace_current(url).await.map(Navigation::ReplacedCurrent)
            }
        }
    }

    /// Activate an existing tab and bring its window to the front.
    /// The tab's URL is left alone.
    pub async fn focus_tab(&self, id: TabId) -> Result<(), BrowserError> {
        let tab = self.browser.update_tab(id, TabUpdate::activate()).await?;
        self.browser.focus_window(tab.window_id).await
    }

    /// Point the current tab at `url`, returning the tab that was changed
    async fn replace_current(&self, url: &str) -> Result<TabId, BrowserError> {
        let id = match self.current_tab {
            Some(id) => id,
            None => {
                self.browser
                    .active_tab()
                    .await?
                    .ok_or(BrowserError::NoActiveTab)?
                    .id
            }
        };
        self.browser.update_tab(id, TabUpdate::navigate(url)).await?;
        Ok(id)
    }

    async fn close_best_effort(&self, id: TabId, report: &mut CommitReport) {
        match self.browser.remove_tab(id).await {
            Ok(()) => report.closed.push(id),
            Err(e) => {
                warn!("Failed to close tab {}: {}", id, e);
                report.failed_closes.push(id);
            }
        }
    }

    /// Close the tab behind the row at `index` and drop the row, promoting
    /// its neighbour when it was active.
    ///
    /// Returns `Ok(None)` for bookmark rows. A tab that is already gone still
    /// has its row removed. Closing the current tab forgets it, so later
    /// commits that reuse the current tab ask the browser for the active one.
    pub async fn close_and_promote(
        &mut self,
        list: &mut RenderedList,
        index: usize,
    ) -> Result<Option<TabId>, BrowserError> {
        let Some(id) = list.get(index).and_then(|row| row.tab_id()) else {
            return Ok(None);
        };

        match self.browser.remove_tab(id).await {
            Ok(()) => {}
            Err(BrowserError::TabNotFound(_)) => {
                debug!("Tab {} already closed", id);
            }
            Err(e) => return Err(e),
        }

        if self.current_tab == Some(id) {
            debug!("Current tab {} closed", id);
            self.current_tab = None;
        }
        list.remove(index);
        Ok(Some(id))
    }
}
