//! Reader for Chromium's on-disk `Bookmarks` JSON file.
//!
//! The file keeps three roots (`bookmark_bar`, `other`, `synced`). They are
//! exposed under a single nameless root node, the same shape the extension
//! bookmarks API hands out.

use serde::Deserialize;

use crate::constants::{BOOKMARKS_BAR_TITLE, MOBILE_BOOKMARKS_TITLE, OTHER_BOOKMARKS_TITLE};
use crate::error::BrowserError;
use crate::models::BookmarkNode;

#[derive(Debug, Deserialize)]
struct BookmarksFile {
    roots: Roots,
}

#[derive(Debug, Deserialize)]
struct Roots {
    bookmark_bar: Option<RawNode>,
    other: Option<RawNode>,
    synced: Option<RawNode>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    children: Vec<RawNode>,
}

impl RawNode {
    fn into_node(self, fallback_title: Option<&str>) -> BookmarkNode {
        let title = match fallback_title {
            Some(fallback) if self.name.is_empty() => fallback.to_string(),
            _ => self.name,
        };

        if self.kind == "url" {
            BookmarkNode {
                id: self.id.into(),
                title,
                url: self.url,
                children: None,
            }
        } else {
            let children = self
                .children
                .into_iter()
                .map(|child| child.into_node(None))
                .collect();
            BookmarkNode {
                id: self.id.into(),
                title,
                url: None,
                children: Some(children),
            }
        }
    }
}

/// Parse the contents of a `Bookmarks` file into a single-root tree
pub fn parse(contents: &str) -> Result<BookmarkNode, BrowserError> {
    let file: BookmarksFile = serde_json::from_str(contents)?;
    let roots = [
        (file.roots.bookmark_bar, BOOKMARKS_BAR_TITLE),
        (file.roots.other, OTHER_BOOKMARKS_TITLE),
        (file.roots.synced, MOBILE_BOOKMARKS_TITLE),
    ];

    let children = roots
        .into_iter()
        .filter_map(|(root, title)| root.map(|r| r.into_node(Some(title))))
        .collect();

    Ok(BookmarkNode::folder("0", "", children))
}
