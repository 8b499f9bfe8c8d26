//! Filter engine: substring filtering and match highlighting.
//!
//! Provides the popup's search semantics:
//! - Query normalization (lower-cased, leading whitespace trimmed)
//! - Case-insensitive plain substring containment (no fuzzy, no tokens)
//! - Non-overlapping, left-to-right highlight ranges over the original title

use std::ops::Range;

use crate::list::{RenderedList, RenderedRow, TitleFragment};
use crate::models::Item;

/// Normalize a raw query: lower-cased, leading whitespace trimmed.
///
/// # Examples
/// - "Git" -> "git"
/// - "  rust  " -> "rust  "
/// - "" -> ""
pub fn normalize_query(query: &str) -> String {
    // Same per-char folding as titles
    Lowered::new(query.trim_start()).text
}

/// Lower-cased text plus, for every byte of it, the byte range of the
/// original char it came from. Lower-casing can change byte lengths, so
/// offsets into the lowered text can't be used on the original directly.
struct Lowered {
    text: String,
    origin: Vec<(usize, usize)>,
}

impl Lowered {
    fn new(original: &str) -> Self {
        let mut text = String::with_capacity(original.len());
        let mut origin = Vec::with_capacity(original.len());
        for (start, ch) in original.char_indices() {
            let end = start + ch.len_utf8();
            for lower in ch.to_lowercase() {
                // Final sigma compares equal to the medial form
                let lower = if lower == 'ς' { 'σ' } else { lower };
                text.push(lower);
                origin.extend(std::iter::repeat((start, end)).take(lower.len_utf8()));
            }
        }
        Self { text, origin }
    }
}

/// Check if `title` contains the already-normalized `query`
pub fn title_matches(title: &str, query: &str) -> bool {
    query.is_empty() || Lowered::new(title).text.contains(query)
}

/// Byte ranges of `title` covered by each occurrence of the normalized
/// `query`, scanning left to right without overlap.
pub fn match_ranges(title: &str, query: &str) -> Vec<Range<usize>> {
    if query.is_empty() {
        return Vec::new();
    }

    let lowered = Lowered::new(title);
    let mut ranges: Vec<Range<usize>> = Vec::new();
    let mut from = 0;

    while let Some(pos) = lowered.text[from..].find(query) {
        let start = from + pos;
        let end = start + query.len();
        let range = lowered.origin[start].0..lowered.origin[end - 1].1;

        // Two matches can land inside one original char when its lowercase
        // form expands to several chars; keep the earlier one.
        let overlaps = ranges.last().is_some_and(|last| range.start < last.end);
        if !overlaps {
            ranges.push(range);
        }
        from = end;
    }

    ranges
}

/// Split `title` into plain and matched fragments around every occurrence
/// of the normalized `query`. The fragments concatenate back to `title`.
pub fn highlight(title: &str, query: &str) -> Vec<TitleFragment> {
    let mut fragments = Vec::new();
    let mut last_end = 0;

    for range in match_ranges(title, query) {
        if range.start > last_end {
            fragments.push(TitleFragment::plain(&title[last_end..range.start]));
        }
        fragments.push(TitleFragment::matched(&title[range.clone()]));
        last_end = range.end;
    }

    if last_end < title.len() || fragments.is_empty() {
        fragments.push(TitleFragment::plain(&title[last_end..]));
    }

    fragments
}

/// Produce the rows to display for `query`.
///
/// An empty query keeps every item in order with no highlights. Otherwise
/// only items whose lower-cased title contains the query survive. The first
/// row starts active; no state from a previous rendering carries over.
pub fn render<'a, I>(items: I, query: &str) -> RenderedList
where
    I: IntoIterator<Item = &'a Item>,
{
    let query = normalize_query(query);
    let rows = items
        .into_iter()
        .filter(|item| title_matches(&item.title, &query))
        .map(|item| RenderedRow::new(item.clone(), highlight(&item.title, &query)))
        .collect();
    RenderedList::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemKind, TabId, WindowId};

    fn joined(fragments: &[TitleFragment]) -> String {
        fragments.iter().map(|f| f.text.as_str()).collect()
    }

    fn matched(fragments: &[TitleFragment]) -> Vec<&str> {
        fragments
            .iter()
            .filter(|f| f.matched)
            .map(|f| f.text.as_str())
            .collect()
    }

    fn items() -> Vec<Item> {
        vec![
            Item::tab(TabId(1), WindowId(1), "GitHub", "https://github.com"),
            Item::bookmark("7".into(), "Docs/API", "https://docs.example.com"),
            Item::tab(TabId(2), WindowId(1), "gitlab merge requests", "https://gitlab.com"),
        ]
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("Git"), "git");
        assert_eq!(normalize_query("  Rust  "), "rust  ");
        assert_eq!(normalize_query(""), "");
    }

    #[test]
    fn test_empty_query_keeps_everything_in_order() {
        let items = items();
        let list = render(&items, "");
        assert_eq!(list.len(), 3);
        for (row, item) in list.rows().iter().zip(&items) {
            assert_eq!(&row.item, item);
            assert!(row.fragments.iter().all(|f| !f.matched));
            assert_eq!(joined(&row.fragments), item.title);
        }
        assert_eq!(list.active_index(), Some(0));
    }

    #[test]
    fn test_git_keeps_only_matching_titles() {
        let items = items();
        let list = render(&items[..2], "git");
        assert_eq!(list.len(), 1);

        let row = &list.rows()[0];
        assert_eq!(row.item.kind, ItemKind::Tab);
        assert_eq!(matched(&row.fragments), vec!["Git"]);
        assert_eq!(joined(&row.fragments), "GitHub");
        assert!(row.active);
    }

    #[test]
    fn test_query_case_and_leading_space_ignored() {
        let items = items();
        assert_eq!(render(&items, "  GIT").len(), 2);
        // Trailing whitespace is significant
        assert_eq!(render(&items, "git ").len(), 0);
        assert_eq!(render(&items, "gitlab ").len(), 1);
    }

    #[test]
    fn test_no_match_gives_empty_list() {
        let items = items();
        let list = render(&items, "zzz");
        assert!(list.is_empty());
        assert_eq!(list.active_index(), None);
    }

    #[test]
    fn test_every_occurrence_highlighted() {
        let fragments = highlight("Banana bandana", "an");
        assert_eq!(matched(&fragments), vec!["an", "an", "an", "an"]);
        assert_eq!(joined(&fragments), "Banana bandana");
    }

    #[test]
    fn test_highlight_ranges_do_not_overlap() {
        assert_eq!(match_ranges("aaaa", "aa"), vec![0..2, 2..4]);
        assert_eq!(match_ranges("aaa", "aa"), vec![0..2]);
    }

    #[test]
    fn test_highlight_preserves_original_case() {
        let fragments = highlight("Rust RUST rust", "rust");
        assert_eq!(matched(&fragments), vec!["Rust", "RUST", "rust"]);
        assert_eq!(joined(&fragments), "Rust RUST rust");
    }

    #[test]
    fn test_highlight_non_ascii_reconstructs_title() {
        let title = "İstanbul Straße İzmir";
        let fragments = highlight(title, "i");
        assert_eq!(joined(&fragments), title);
        assert_eq!(matched(&fragments), vec!["İ", "İ", "i"]);

        let fragments = highlight("STRASSE straße", "straße");
        assert_eq!(matched(&fragments), vec!["straße"]);
    }

    #[test]
    fn test_final_sigma_folds_like_title() {
        let items = vec![Item::tab(TabId(5), WindowId(1), "ΟΔΟΣ", "https://odos.example.com")];
        assert_eq!(render(&items, "ΟΔΟΣ").len(), 1);
        assert_eq!(render(&items, "οδος").len(), 1);
        assert_eq!(render(&items, "οδοσ").len(), 1);
        assert_eq!(normalize_query("ΟΔΟΣ"), "οδοσ");
        assert_eq!(normalize_query("οδος"), "οδοσ");

        let list = render(&items, "ΔΟΣ");
        assert_eq!(matched(&list.rows()[0].fragments), vec!["ΔΟΣ"]);
    }

    #[test]
    fn test_render_is_idempotent() {
        let items = items();
        assert_eq!(render(&items, "git"), render(&items, "git"));
        assert_eq!(render(&items, ""), render(&items, ""));
    }

    #[test]
    fn test_render_filters_any_iterator() {
        let items = items();
        let open: Vec<&Item> = items.iter().filter(|i| i.tab_id() != Some(TabId(2))).collect();
        let list = render(open, "git");
        assert_eq!(list.len(), 1);
    }
}
