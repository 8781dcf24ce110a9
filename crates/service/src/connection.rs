/// Page request: window size plus the opaque cursor returned by the
/// previous page. Cursors are only valid against the exact ordered result
/// set that produced them.
#[derive(Debug, Clone, Default)]
pub struct PageArgs {
    pub first: usize,
    pub after: Option<String>,
}

impl PageArgs {
    pub fn first(first: usize) -> Self {
        Self {
            first,
            after: None,
        }
    }

    pub fn after(first: usize, cursor: impl Into<String>) -> Self {
        Self {
            first,
            after: Some(cursor.into()),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct PageWindow {
    pub start: usize,
    pub end: usize,
    pub next_cursor: Option<String>,
    pub has_next_page: bool,
}

/// Cursor paging over an ordered list of sort keys. An empty, absent, or
/// unknown cursor defaults to the start rather than erroring, so a stale
/// cursor degrades to the first page.
pub(crate) fn page_window(sort_keys: &[&str], after: Option<&str>, first: usize) -> PageWindow {
    let start = after
        .filter(|cursor| !cursor.is_empty())
        .and_then(|cursor| sort_keys.iter().position(|key| *key == cursor))
        .unwrap_or(0);
    let has_next_page = sort_keys.len() > start + first;
    PageWindow {
        start,
        end: (start + first).min(sort_keys.len()),
        next_cursor: has_next_page.then(|| sort_keys[start + first].to_string()),
        has_next_page,
    }
}
