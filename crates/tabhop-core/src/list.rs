//! The rendered row list: display projection of the item list plus the
//! transient per-row UI state (active cursor, close marks).
//!
//! Invariant: when the list is non-empty exactly one row is active.

use crate::models::{Item, TabId};

/// A piece of a row title, either plain text or a query match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleFragment {
    pub text: String,
    pub matched: bool,
}

impl TitleFragment {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            matched: false,
        }
    }

    pub fn matched(text: &str) -> Self {
        Self {
            text: text.to_string(),
            matched: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub item: Item,
    pub active: bool,
    /// Only ever set on Tab rows
    pub marked_for_close: bool,
    pub fragments: Vec<TitleFragment>,
}

impl RenderedRow {
    pub fn new(item: Item, fragments: Vec<TitleFragment>) -> Self {
        Self {
            item,
            active: false,
            marked_for_close: false,
            fragments,
        }
    }

    pub fn tab_id(&self) -> Option<TabId> {
        self.item.tab_id()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedList {
    rows: Vec<RenderedRow>,
}

impl RenderedList {
    /// Wrap freshly rendered rows; the first row becomes active
    pub fn from_rows(mut rows: Vec<RenderedRow>) -> Self {
        for (i, row) in rows.iter_mut().enumerate() {
            row.active = i == 0;
            row.marked_for_close = false;
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[RenderedRow] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&RenderedRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.rows.iter().position(|r| r.active)
    }

    pub fn active_row(&self) -> Option<&RenderedRow> {
        self.rows.iter().find(|r| r.active)
    }

    /// Move the active flag to `index`. Out-of-range indices are ignored.
    pub fn set_active(&mut self, index: usize) -> bool {
        if index >= self.rows.len() {
            return false;
        }
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.active = i == index;
        }
        true
    }

    /// Flip the close mark of a Tab row; returns the new state, or `None`
    /// for bookmark rows and bad indices.
    pub fn toggle_close_mark(&mut self, index: usize) -> Option<bool> {
        let row = self.rows.get_mut(index).filter(|r| r.item.is_tab())?;
        row.marked_for_close = !row.marked_for_close;
        Some(row.marked_for_close)
    }

    /// Clear the close mark on the row showing the current tab, if present
    pub fn unmark_current_tab(&mut self) {
        for row in self.rows.iter_mut().filter(|r| r.item.is_current_tab) {
            row.marked_for_close = false;
        }
    }

    /// Tab ids of every marked row except the one at `skip`
    pub fn marked_tab_ids(&self, skip: Option<usize>) -> Vec<TabId> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(i, row)| row.marked_for_close && Some(*i) != skip)
            .filter_map(|(_, row)| row.tab_id())
            .collect()
    }

    /// Remove the row at `index`. If it was active, the next row (or the
    /// previous one when it was last) takes over.
    pub fn remove(&mut self, index: usize) -> Option<RenderedRow> {
        if index >= self.rows.len() {
            return None;
        }
        let removed = self.rows.remove(index);
        if removed.active && !self.rows.is_empty() {
            let promoted = index.min(self.rows.len() - 1);
            self.rows[promoted].active = true;
        }
        Some(removed)
    }
}
