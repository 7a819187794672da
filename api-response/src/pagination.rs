//! Paginated results
//!
//! [`ApiResponse::pagination`](crate::responses::ApiResponse::pagination)
//! accepts anything implementing [`Paginated`]: a page of items plus a map of
//! metadata. The map mirrors the items under a `"data"` key, which the
//! response drops so the items appear only once.
//!
//! Three paginators ship with the crate. Their metadata uses the same field
//! names most JSON APIs built on length-aware, simple and cursor pagination
//! already expose:
//!
//! - [`LengthAwarePaginator`] - knows the total item count and the last page
//! - [`SimplePaginator`] - only knows whether another page follows
//! - [`CursorPaginator`] - navigates with opaque cursors instead of page
//!   numbers
//!
//! ## Example
//!
//! ```rust
//! use api_response::pagination::{LengthAwarePaginator, Paginated};
//!
//! let page = LengthAwarePaginator::new(vec!["a", "b"], 5, 2, 1).with_path("/letters");
//! let meta = page.to_map().unwrap();
//!
//! assert_eq!(meta["last_page"], 3);
//! assert_eq!(meta["next_page_url"], "/letters?page=2");
//! ```

use std::ops::RangeInclusive;

use serde::Serialize;
use serde_json::{Map, Value};

const DEFAULT_PATH: &str = "/";
const DEFAULT_PAGE_NAME: &str = "page";
const DEFAULT_CURSOR_NAME: &str = "cursor";

const LINKS_ON_EACH_SIDE: u32 = 3;
const PREVIOUS_LABEL: &str = "&laquo; Previous";
const NEXT_LABEL: &str = "Next &raquo;";
const ELLIPSIS_LABEL: &str = "...";

/// A page of items plus its metadata
pub trait Paginated {
    /// Item type held by the page
    type Item: Serialize;

    /// Items of the current page, in order
    fn items(&self) -> &[Self::Item];

    /// All pagination fields, including `"data"` mirroring [`items`]
    ///
    /// [`items`]: Paginated::items
    fn to_map(&self) -> serde_json::Result<Map<String, Value>>;
}

fn page_url(path: &str, name: &str, value: impl std::fmt::Display) -> String {
    format!("{path}?{name}={value}")
}

/// 1-based positions of the first and last item on a page
fn item_range(current_page: u32, per_page: u32, len: usize) -> (Value, Value) {
    if len == 0 {
        return (Value::Null, Value::Null);
    }
    let from = u64::from(current_page.saturating_sub(1)) * u64::from(per_page) + 1;
    let to = from + len as u64 - 1;
    (Value::from(from), Value::from(to))
}

// ============================================================================
// Length-aware pagination
// ============================================================================

/// A page that knows the total number of items
#[derive(Debug, Clone, PartialEq)]
pub struct LengthAwarePaginator<T> {
    items: Vec<T>,
    total: u64,
    per_page: u32,
    current_page: u32,
    path: String,
    page_name: String,
}

impl<T> LengthAwarePaginator<T> {
    /// Create a page from its items, the total item count, the page size and
    /// the 1-based page number
    ///
    /// A zero page size or page number is treated as 1.
    pub fn new(items: Vec<T>, total: u64, per_page: u32, current_page: u32) -> Self {
        Self {
            items,
            total,
            per_page: per_page.max(1),
            current_page: current_page.max(1),
            path: DEFAULT_PATH.to_string(),
            page_name: DEFAULT_PAGE_NAME.to_string(),
        }
    }

    /// Base path used for page URLs
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Query parameter carrying the page number (defaults to `page`)
    #[must_use]
    pub fn with_page_name(mut self, page_name: impl Into<String>) -> Self {
        self.page_name = page_name.into();
        self
    }

    /// Total number of items across all pages
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of the last page; never less than 1
    #[must_use]
    pub fn last_page(&self) -> u32 {
        let per_page = u64::from(self.per_page);
        let pages = self.total.div_ceil(per_page).max(1);
        pages.min(u64::from(u32::MAX)) as u32
    }

    /// Check if a page follows this one
    #[must_use]
    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page()
    }

    /// URL of the given page
    #[must_use]
    pub fn url(&self, page: u32) -> String {
        page_url(&self.path, &self.page_name, page.max(1))
    }

    /// Take the items out of the page
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    fn next_page_url(&self) -> Option<String> {
        if !self.has_more_pages() {
            return None;
        }
        self.current_page.checked_add(1).map(|page| self.url(page))
    }

    fn prev_page_url(&self) -> Option<String> {
        (self.current_page > 1).then(|| self.url(self.current_page - 1))
    }

    /// Page numbers to render, split into blocks separated by `...`
    ///
    /// Short page counts list every page. Longer ones keep the first and last
    /// two pages plus a window around the current page.
    fn page_blocks(&self) -> Vec<RangeInclusive<u32>> {
        let last = self.last_page();
        let current = self.current_page;
        let window = LINKS_ON_EACH_SIDE + 4;

        if last < LINKS_ON_EACH_SIDE * 2 + 8 {
            return vec![1..=last];
        }

        let start = 1..=2;
        let finish = last - 1..=last;

        if current <= window {
            vec![1..=window + LINKS_ON_EACH_SIDE, finish]
        } else if current > last - window {
            vec![start, last - (window + LINKS_ON_EACH_SIDE - 1)..=last]
        } else {
            vec![
                start,
                current - LINKS_ON_EACH_SIDE..=current + LINKS_ON_EACH_SIDE,
                finish,
            ]
        }
    }

    /// Navigation links: previous, the page window, next
    fn links(&self, prev: Option<String>, next: Option<String>) -> Value {
        let mut entries = vec![link(prev, PREVIOUS_LABEL.to_string(), false)];

        for (i, block) in self.page_blocks().into_iter().enumerate() {
            if i > 0 {
                entries.push(link(None, ELLIPSIS_LABEL.to_string(), false));
            }
            entries.extend(block.map(|page| {
                link(Some(self.url(page)), page.to_string(), page == self.current_page)
            }));
        }

        entries.push(link(next, NEXT_LABEL.to_string(), false));
        Value::Array(entries)
    }
}

fn link(url: Option<String>, label: String, active: bool) -> Value {
    let mut entry = Map::new();
    entry.insert("url".into(), url.into());
    entry.insert("label".into(), label.into());
    entry.insert("active".into(), active.into());
    Value::Object(entry)
}

impl<T: Serialize> Paginated for LengthAwarePaginator<T> {
    type Item = T;

    fn items(&self) -> &[T] {
        &self.items
    }

    fn to_map(&self) -> serde_json::Result<Map<String, Value>> {
        let last_page = self.last_page();
        let (from, to) = item_range(self.current_page, self.per_page, self.items.len());
        let next = self.next_page_url();
        let prev = self.prev_page_url();

        let mut map = Map::new();
        map.insert("current_page".into(), self.current_page.into());
        map.insert("data".into(), serde_json::to_value(&self.items)?);
        map.insert("first_page_url".into(), self.url(1).into());
        map.insert("from".into(), from);
        map.insert("last_page".into(), last_page.into());
        map.insert("last_page_url".into(), self.url(last_page).into());
        map.insert("links".into(), self.links(prev.clone(), next.clone()));
        map.insert("next_page_url".into(), next.into());
        map.insert("path".into(), self.path.clone().into());
        map.insert("per_page".into(), self.per_page.into());
        map.insert("prev_page_url".into(), prev.into());
        map.insert("to".into(), to);
        map.insert("total".into(), self.total.into());
        Ok(map)
    }
}

// ============================================================================
// Simple pagination
// ============================================================================

/// A page that only knows whether more items follow
///
/// Give it up to `per_page + 1` items: the extra one signals that a next page
/// exists and is dropped from the page itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplePaginator<T> {
    items: Vec<T>,
    per_page: u32,
    current_page: u32,
    has_more: bool,
    path: String,
    page_name: String,
}

impl<T> SimplePaginator<T> {
    /// Create the first page from the fetched items and the page size
    pub fn new(mut items: Vec<T>, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let has_more = items.len() > per_page as usize;
        items.truncate(per_page as usize);

        Self {
            items,
            per_page,
            current_page: 1,
            has_more,
            path: DEFAULT_PATH.to_string(),
            page_name: DEFAULT_PAGE_NAME.to_string(),
        }
    }

    /// Set the 1-based page number
    #[must_use]
    pub fn with_current_page(mut self, current_page: u32) -> Self {
        self.current_page = current_page.max(1);
        self
    }

    /// Base path used for page URLs
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Query parameter carrying the page number (defaults to `page`)
    #[must_use]
    pub fn with_page_name(mut self, page_name: impl Into<String>) -> Self {
        self.page_name = page_name.into();
        self
    }

    /// Check if a page follows this one
    #[must_use]
    pub fn has_more_pages(&self) -> bool {
        self.has_more
    }

    /// URL of the given page
    #[must_use]
    pub fn url(&self, page: u32) -> String {
        page_url(&self.path, &self.page_name, page.max(1))
    }

    /// Take the items out of the page
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T: Serialize> Paginated for SimplePaginator<T> {
    type Item = T;

    fn items(&self) -> &[T] {
        &self.items
    }

    fn to_map(&self) -> serde_json::Result<Map<String, Value>> {
        let (from, to) = item_range(self.current_page, self.per_page, self.items.len());
        let next = if self.has_more {
            self.current_page.checked_add(1).map(|page| self.url(page))
        } else {
            None
        };
        let prev = (self.current_page > 1).then(|| self.url(self.current_page - 1));

        let mut map = Map::new();
        map.insert("current_page".into(), self.current_page.into());
        map.insert("data".into(), serde_json::to_value(&self.items)?);
        map.insert("first_page_url".into(), self.url(1).into());
        map.insert("from".into(), from);
        map.insert("next_page_url".into(), next.into());
        map.insert("path".into(), self.path.clone().into());
        map.insert("per_page".into(), self.per_page.into());
        map.insert("prev_page_url".into(), prev.into());
        map.insert("to".into(), to);
        Ok(map)
    }
}

// ============================================================================
// Cursor pagination
// ============================================================================

/// A page navigated with opaque cursors
///
/// Cursors are produced by the caller (usually an encoded sort key) and are
/// put into URLs as they are, so they should already be URL-safe.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorPaginator<T> {
    items: Vec<T>,
    per_page: u32,
    next_cursor: Option<String>,
    prev_cursor: Option<String>,
    path: String,
    cursor_name: String,
}

impl<T> CursorPaginator<T> {
    /// Create a page from the fetched items and the page size
    ///
    /// Items beyond `per_page` are dropped.
    pub fn new(mut items: Vec<T>, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        items.truncate(per_page as usize);

        Self {
            items,
            per_page,
            next_cursor: None,
            prev_cursor: None,
            path: DEFAULT_PATH.to_string(),
            cursor_name: DEFAULT_CURSOR_NAME.to_string(),
        }
    }

    /// Cursor pointing at the next page
    #[must_use]
    pub fn with_next_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.next_cursor = Some(cursor.into());
        self
    }

    /// Cursor pointing at the previous page
    #[must_use]
    pub fn with_prev_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.prev_cursor = Some(cursor.into());
        self
    }

    /// Base path used for page URLs
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Query parameter carrying the cursor (defaults to `cursor`)
    #[must_use]
    pub fn with_cursor_name(mut self, cursor_name: impl Into<String>) -> Self {
        self.cursor_name = cursor_name.into();
        self
    }

    /// Check if a page follows this one
    #[must_use]
    pub fn has_more_pages(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// URL of the page the cursor points at
    #[must_use]
    pub fn url(&self, cursor: &str) -> String {
        page_url(&self.path, &self.cursor_name, cursor)
    }

    /// Take the items out of the page
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T: Serialize> Paginated for CursorPaginator<T> {
    type Item = T;

    fn items(&self) -> &[T] {
        &self.items
    }

    fn to_map(&self) -> serde_json::Result<Map<String, Value>> {
        let next_url = self.next_cursor.as_deref().map(|c| self.url(c));
        let prev_url = self.prev_cursor.as_deref().map(|c| self.url(c));

        let mut map = Map::new();
        map.insert("data".into(), serde_json::to_value(&self.items)?);
        map.insert("path".into(), self.path.clone().into());
        map.insert("per_page".into(), self.per_page.into());
        map.insert("next_cursor".into(), self.next_cursor.clone().into());
        map.insert("next_page_url".into(), next_url.into());
        map.insert("prev_cursor".into(), self.prev_cursor.clone().into());
        map.insert("prev_page_url".into(), prev_url.into());
        Ok(map)
    }
}
