//! Builds the flat, searchable item list for one popup session.
//!
//! Tabs come first in their native query order, then bookmarks-bar entries in
//! depth-first order. The list is built once and replaced wholesale on reload.

use tracing::debug;

use crate::browser::{BookmarkService, TabService};
use crate::constants::{BOOKMARKS_BAR_ID, BOOKMARKS_BAR_TITLE, FALLBACK_TITLE_MAX_CHARS};
use crate::error::BrowserError;
use crate::models::{BookmarkNode, Item, Tab};

/// Query tabs, the current tab and the bookmark tree concurrently and
/// combine them. Any failed query fails the whole load.
pub async fn load<S>(services: &S) -> Result<Vec<Item>, BrowserError>
where
    S: TabService + BookmarkService,
{
    let (tabs, current, tree) = tokio::try_join!(
        services.query_tabs(),
        services.active_tab(),
        services.bookmark_tree(),
    )?;

    let current_id = current.map(|t| t.id);
    let mut items: Vec<Item> = tabs
        .iter()
        .filter_map(|tab| {
            let mut item = tab_item(tab)?;
            item.is_current_tab = Some(tab.id) == current_id;
            Some(item)
        })
        .collect();
    let tab_count = items.len();

    if let Some(bar) = find_bookmarks_bar(&tree) {
        flatten_bookmarks(bar.children(), "", &mut items);
    }

    debug!(
        "Loaded {} tabs and {} bookmarks",
        tab_count,
        items.len() - tab_count
    );
    Ok(items)
}

/// Tab item, or `None` for tabs without a URL
fn tab_item(tab: &Tab) -> Option<Item> {
    let url = tab.url.as_deref().filter(|u| !u.is_empty())?;
    let title = match tab.title.as_deref() {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => fallback_title(url),
    };
    Some(Item::tab(tab.id, tab.window_id, &title, url))
}

/// URL without its http(s) scheme, cut to `FALLBACK_TITLE_MAX_CHARS` chars
pub fn fallback_title(url: &str) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    stripped.chars().take(FALLBACK_TITLE_MAX_CHARS).collect()
}

/// Locate the bookmarks bar among the children of the tree root(s).
/// Other roots (other bookmarks, mobile bookmarks) are never searched.
fn find_bookmarks_bar(tree: &[BookmarkNode]) -> Option<&BookmarkNode> {
    let candidates = || tree.iter().flat_map(|root| root.children());
    candidates()
        .find(|node| node.id.0 == BOOKMARKS_BAR_ID)
        .or_else(|| candidates().find(|node| node.title.eq_ignore_ascii_case(BOOKMARKS_BAR_TITLE)))
}

/// Depth-first flatten: folders contribute their title to the path prefix,
/// only URL-bearing nodes become items.
fn flatten_bookmarks(nodes: &[BookmarkNode], prefix: &str, items: &mut Vec<Item>) {
    for node in nodes {
        let path = format!("{}/{}", prefix, node.title);
        match &node.url {
            Some(url) => items.push(Item::bookmark(node.id.clone(), &path, url)),
            None => flatten_bookmarks(node.children(), &path, items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemKind, TabId, WindowId};
    use crate::test_support::FakeBrowser;

    fn tree() -> Vec<BookmarkNode> {
        vec![BookmarkNode::folder(
            "0",
            "",
            vec![
                BookmarkNode::folder(
                    "1",
                    "Bookmarks bar",
                    vec![
                        BookmarkNode::bookmark("10", "Rust", "https://rust-lang.org"),
                        BookmarkNode::folder(
                            "11",
                            "Work",
                            vec![
                                BookmarkNode::folder(
                                    "12",
                                    "CI",
                                    vec![BookmarkNode::bookmark("13", "Builds", "https://ci.example.com")],
                                ),
                                BookmarkNode::bookmark("14", "Wiki", "https://wiki.example.com"),
                            ],
                        ),
                        BookmarkNode::folder("15", "Empty", vec![]),
                    ],
                ),
                BookmarkNode::folder(
                    "2",
                    "Other bookmarks",
                    vec![BookmarkNode::bookmark("20", "Hidden", "https://other.example.com")],
                ),
            ],
        )]
    }

    #[tokio::test]
    async fn test_tabs_precede_bookmarks() {
        let browser = FakeBrowser::with_tabs(vec![
            Tab::new(TabId(1), WindowId(1), "GitHub", "https://github.com"),
            Tab::new(TabId(2), WindowId(1), "Docs", "https://docs.rs"),
        ])
        .with_bookmarks(tree());

        let items = load(&browser).await.unwrap();
        let kinds: Vec<ItemKind> = items.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ItemKind::Tab,
                ItemKind::Tab,
                ItemKind::Bookmark,
                ItemKind::Bookmark,
                ItemKind::Bookmark
            ]
        );
    }

    #[tokio::test]
    async fn test_bookmarks_flattened_with_paths() {
        let browser = FakeBrowser::with_tabs(vec![]).with_bookmarks(tree());
        let items = load(&browser).await.unwrap();
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["/Rust", "/Work/CI/Builds", "/Work/Wiki"]);
    }

    #[tokio::test]
    async fn test_other_roots_excluded() {
        let browser = FakeBrowser::with_tabs(vec![]).with_bookmarks(tree());
        let items = load(&browser).await.unwrap();
        assert!(items.iter().all(|i| i.url != "https://other.example.com"));
    }

    #[tokio::test]
    async fn test_bar_found_by_title() {
        let tree = vec![BookmarkNode::folder(
            "root",
            "",
            vec![BookmarkNode::folder(
                "bar",
                "Bookmarks Bar",
                vec![BookmarkNode::bookmark("b1", "Home", "https://example.com")],
            )],
        )];
        let browser = FakeBrowser::with_tabs(vec![]).with_bookmarks(tree);
        let items = load(&browser).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "/Home");
    }

    #[tokio::test]
    async fn test_tabs_without_url_skipped_and_untitled_fallback() {
        let long = format!("https://example.com/{}", "a".repeat(80));
        let browser = FakeBrowser::with_tabs(vec![
            Tab::new(TabId(1), WindowId(1), "Blank", ""),
            Tab::new(TabId(2), WindowId(1), "", "http://localhost:8080/app"),
            Tab::new(TabId(3), WindowId(1), "", &long),
        ]);

        let items = load(&browser).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "localhost:8080/app");
        assert_eq!(items[1].title.chars().count(), 50);
        assert!(items[1].title.starts_with("example.com/"));
    }

    #[tokio::test]
    async fn test_current_tab_flagged() {
        let mut current = Tab::new(TabId(2), WindowId(1), "Docs", "https://docs.rs");
        current.active = true;
        let browser = FakeBrowser::with_tabs(vec![
            Tab::new(TabId(1), WindowId(1), "GitHub", "https://github.com"),
            current,
        ]);

        let items = load(&browser).await.unwrap();
        assert!(!items[0].is_current_tab);
        assert!(items[1].is_current_tab);
    }

    #[tokio::test]
    async fn test_query_failure_propagates() {
        let browser = FakeBrowser::with_tabs(vec![]).failing_bookmarks();
        assert!(load(&browser).await.is_err());
    }

    #[test]
    fn test_fallback_title_strips_scheme() {
        assert_eq!(fallback_title("https://github.com"), "github.com");
        assert_eq!(fallback_title("http://github.com"), "github.com");
        assert_eq!(fallback_title("file:///tmp/x"), "file:///tmp/x");
    }
}
