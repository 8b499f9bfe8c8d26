use super::{BookmarkId, TabId, WindowId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Tab,
    Bookmark,
}

impl ItemKind {
    /// Single-letter marker shown in front of each row
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Tab => "t",
            Self::Bookmark => "b",
        }
    }
}

/// External identifier used for side effects, never displayed
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemId {
    Tab { tab: TabId, window: WindowId },
    Bookmark(BookmarkId),
}

/// One searchable entry: an open tab or a bookmarks-bar bookmark
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub kind: ItemKind,
    pub title: String,
    pub url: String,
    pub id: Option<ItemId>,
    pub is_current_tab: bool,
}

impl Item {
    pub fn tab(tab: TabId, window: WindowId, title: &str, url: &str) -> Self {
        Self {
            kind: ItemKind::Tab,
            title: title.to_string(),
            url: url.to_string(),
            id: Some(ItemId::Tab { tab, window }),
            is_current_tab: false,
        }
    }

    pub fn bookmark(id: BookmarkId, title: &str, url: &str) -> Self {
        Self {
            kind: ItemKind::Bookmark,
            title: title.to_string(),
            url: url.to_string(),
            id: Some(ItemId::Bookmark(id)),
            is_current_tab: false,
        }
    }

    pub fn is_tab(&self) -> bool {
        self.kind == ItemKind::Tab
    }

    pub fn tab_id(&self) -> Option<TabId> {
        match self.id {
            Some(ItemId::Tab { tab, .. }) => Some(tab),
            _ => None,
        }
    }

    pub fn window_id(&self) -> Option<WindowId> {
        match self.id {
            Some(ItemId::Tab { window, .. }) => Some(window),
            _ => None,
        }
    }
}
