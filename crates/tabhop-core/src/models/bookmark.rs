use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(pub String);

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BookmarkId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for BookmarkId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One node of the bookmark tree.
///
/// Folders carry `children` and no `url`; bookmarks carry a `url`. The tree
/// root is a nameless node whose children are the bar, "other" and mobile roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkNode {
    pub id: BookmarkId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
}

impl BookmarkNode {
    pub fn bookmark(id: &str, title: &str, url: &str) -> Self {
        Self {
            id: id.into(),
            title: title.to_string(),
            url: Some(url.to_string()),
            children: None,
        }
    }

    pub fn folder(id: &str, title: &str, children: Vec<BookmarkNode>) -> Self {
        Self {
            id: id.into(),
            title: title.to_string(),
            url: None,
            children: Some(children),
        }
    }

    pub fn children(&self) -> &[BookmarkNode] {
        self.children.as_deref().unwrap_or_default()
    }
}
