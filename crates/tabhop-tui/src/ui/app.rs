use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use ratatui::layout::Rect;
use tabhop_core::browser::{PopupHost, SnapshotBrowser};
use tabhop_core::dispatcher::{ActionDispatcher, CommitReport, OpenTarget};
use tabhop_core::list::RenderedList;
use tabhop_core::models::{Item, KeyboardMode, PreferencesStorage, TabId};
use tabhop_core::navigator::{self, Movement};
use tabhop_core::search;
use tracing::{debug, error, info, warn};

use crate::ui::help::{HelpOutcome, HelpOverlay};
use crate::ui::scheduler::FilterScheduler;
use crate::ui::theme::Palette;
use crate::ui::viewport::Viewport;

/// Whether the popup is still showing. Closing it ends the event loop.
#[derive(Debug)]
pub struct PopupState {
    open: bool,
}

impl PopupHost for PopupState {
    fn close_popup(&mut self) {
        self.open = false;
    }
}

pub struct App {
    /// Everything loaded at startup, in display order
    items: Vec<Item>,
    /// Tabs closed with Ctrl+W; excluded from every later filter pass
    closed_tabs: HashSet<TabId>,
    pub query: String,
    pub list: RenderedList,
    pub viewport: Viewport,
    pub scheduler: FilterScheduler,
    dispatcher: ActionDispatcher<SnapshotBrowser>,
    prefs: PreferencesStorage,
    pub mode: KeyboardMode,
    pub help: Option<HelpOverlay>,
    pub palette: Palette,
    pub status: Option<String>,
    /// Where the rows were last drawn, for mouse hit-testing
    pub list_area: Rect,
    pub last_commit: Option<CommitReport>,
    popup: PopupState,
}

impl App {
    /// `mode_override` replaces the saved keyboard mode for this run only
    pub fn new(
        browser: Arc<SnapshotBrowser>,
        items: Vec<Item>,
        prefs: PreferencesStorage,
        mode_override: Option<KeyboardMode>,
    ) -> Self {
        let current_tab = items
            .iter()
            .find(|item| item.is_current_tab)
            .and_then(Item::tab_id);
        let list = search::render(&items, "");
        let mode = mode_override.unwrap_or_else(|| prefs.keyboard_mode());
        let palette = Palette::for_theme(prefs.theme());

        info!(
            "Popup opened with {} items, current tab {:?}, {} mode",
            items.len(),
            current_tab,
            mode.label()
        );

        Self {
            items,
            closed_tabs: HashSet::new(),
            query: String::new(),
            list,
            viewport: Viewport::default(),
            scheduler: FilterScheduler::default(),
            dispatcher: ActionDispatcher::new(browser, current_tab),
            prefs,
            mode,
            help: None,
            palette,
            status: None,
            list_area: Rect::default(),
            last_commit: None,
            popup: PopupState { open: true },
        }
    }

    pub fn is_open(&self) -> bool {
        self.popup.open
    }

    pub fn close(&mut self) {
        debug!("Popup dismissed");
        self.popup.close_popup();
    }

    pub fn set_status(&mut self, msg: &str) {
        self.status = Some(msg.to_string());
    }

    pub fn item_count(&self) -> usize {
        self.items.len().saturating_sub(self.closed_tabs.len())
    }

    // ===== Query editing =====

    pub fn enter_char(&mut self, c: char) {
        self.query.push(c);
        self.scheduler.schedule(Instant::now());
    }

    pub fn delete_char(&mut self) {
        if self.query.pop().is_some() {
            self.scheduler.schedule(Instant::now());
        }
    }

    /// Run the pending filter pass if its deadline has passed
    pub fn run_due_filter(&mut self, now: Instant) -> bool {
        match self.scheduler.take_due(now) {
            Some(generation) => {
                debug!("Filter pass {} for {:?}", generation, self.query);
                self.apply_filter();
                true
            }
            None => false,
        }
    }

    /// Run any pending filter pass right away, so actions see the list
    /// for the query on screen.
    pub fn flush_filter(&mut self) {
        if self.scheduler.flush().is_some() {
            self.apply_filter();
        }
    }

    fn apply_filter(&mut self) {
        let closed = &self.closed_tabs;
        let open_items = self
            .items
            .iter()
            .filter(|item| item.tab_id().map_or(true, |id| !closed.contains(&id)));
        self.list = search::render(open_items, &self.query);
        self.viewport.reset();
    }

    // ===== List actions =====

    pub fn move_cursor(&mut self, movement: Movement) {
        self.flush_filter();
        if let Some(moved) = navigator::move_active(&mut self.list, movement) {
            self.viewport
                .scroll_into_view(moved.index, moved.align, self.list.len());
        }
    }

    pub fn toggle_close_mark(&mut self) {
        self.flush_filter();
        let Some(index) = self.list.active_index() else {
            return;
        };
        match self.list.toggle_close_mark(index) {
            Some(marked) => debug!("Row {} close mark: {}", index, marked),
            None => self.set_status("Only tabs can be marked for closing"),
        }
    }

    /// Commit the active row. An empty list does nothing.
    pub async fn commit_active(&mut self, target: OpenTarget) {
        self.flush_filter();
        if let Some(index) = self.list.active_index() {
            self.commit_row(index, target).await;
        }
    }

    pub async fn commit_row(&mut self, index: usize, target: OpenTarget) {
        let report = self
            .dispatcher
            .commit(&mut self.list, index, target, &mut self.popup)
            .await;
        self.closed_tabs.extend(report.closed.iter().copied());
        if !report.failed_closes.is_empty() {
            warn!("{} tab(s) could not be closed", report.failed_closes.len());
        }
        self.last_commit = Some(report);
    }

    /// Close the active row's tab immediately and keep the popup open
    pub async fn close_active_tab(&mut self) {
        self.flush_filter();
        let Some(index) = self.list.active_index() else {
            return;
        };

        match self.dispatcher.close_and_promote(&mut self.list, index).await {
            Ok(Some(id)) => {
                self.closed_tabs.insert(id);
                if let Some(active) = self.list.active_index() {
                    self.viewport.scroll_into_view(
                        active,
                        navigator::ScrollAlign::Nearest,
                        self.list.len(),
                    );
                }
            }
            Ok(None) => self.set_status("Only tabs can be closed"),
            Err(e) => {
                error!("Failed to close tab: {}", e);
                self.set_status(&format!("Failed to close tab: {}", e));
            }
        }
    }

    // ===== Preferences & overlays =====

    pub fn toggle_keyboard_mode(&mut self) {
        self.mode = self.mode.toggled();
        if let Err(e) = self.prefs.set_keyboard_mode(self.mode) {
            error!("Failed to save preferences: {}", e);
            self.set_status("Keyboard mode changed but could not be saved");
            return;
        }
        self.set_status(&format!("Keyboard mode: {}", self.mode.label()));
    }

    pub fn open_help(&mut self) {
        self.help = Some(HelpOverlay::new(self.mode));
    }

    /// Route a key to the help overlay. Returns false when no overlay is open.
    pub fn handle_help_key(&mut self, key: crossterm::event::KeyCode) -> bool {
        let Some(help) = self.help.as_mut() else {
            return false;
        };
        if help.handle_key(key) == HelpOutcome::Close {
            self.help = None;
        }
        true
    }

    /// List row under a terminal cell, if any
    pub fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.list_area;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if !inside {
            return None;
        }
        let index = self.viewport.offset + (row - area.y) as usize;
        (index < self.list.len()).then_some(index)
    }
}
