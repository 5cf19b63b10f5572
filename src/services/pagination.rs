//! Page arithmetic for the filtered dataset list.

use std::fmt;

use serde::Serialize;

/// Page sizes the user can choose from.
pub const PAGE_SIZES: [usize; 4] = [10, 20, 50, 100];

/// Maximum number of entries in the page-number navigation.
const MAX_PAGE_LINKS: usize = 7;

/// A page size from the allowed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageSize(usize);

impl PageSize {
    pub const DEFAULT: PageSize = PageSize(20);

    /// Accept only sizes from [`PAGE_SIZES`].
    pub fn new(size: usize) -> Option<Self> {
        PAGE_SIZES.contains(&size).then_some(Self(size))
    }

    /// Use the requested size if allowed, otherwise the default.
    pub fn or_default(size: Option<usize>) -> Self {
        size.and_then(Self::new).unwrap_or_default()
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of paginating a filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    /// 1-indexed page actually shown.
    pub effective_page: usize,
    /// First row index (inclusive).
    pub start: usize,
    /// Last row index (exclusive).
    pub end: usize,
    /// Always at least 1, so an empty result reads "Page 1 of 1".
    pub total_pages: usize,
    pub total_rows: usize,
    pub page_size: PageSize,
}

/// Compute the visible slice for a requested page.
///
/// Requests outside `1..=total_pages` fall back to page 1.
pub fn paginate(total_rows: usize, page_size: PageSize, requested_page: usize) -> Page {
    let size = page_size.get();
    let total_pages = total_rows.div_ceil(size).max(1);

    let effective_page = if (1..=total_pages).contains(&requested_page) {
        requested_page
    } else {
        1
    };

    let start = ((effective_page - 1) * size).min(total_rows);
    let end = (start + size).min(total_rows);

    Page {
        effective_page,
        start,
        end,
        total_pages,
        total_rows,
        page_size,
    }
}

impl Page {
    /// Number of rows on this page.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn has_previous(&self) -> bool {
        self.effective_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.effective_page < self.total_pages
    }

    /// The page's rows out of the full filtered list.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let end = self.end.min(rows.len());
        let start = self.start.min(end);
        &rows[start..end]
    }

    pub fn links(&self) -> Vec<PageLink> {
        page_links(self.effective_page, self.total_pages)
    }
}

/// One entry of the page-number navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageLink {
    Page { number: usize, current: bool },
    Ellipsis,
}

/// Page numbers to show around the current page.
///
/// Small result sets list every page. Larger ones show the first and last
/// pages, the current page with its neighbours, and ellipses for the gaps.
pub fn page_links(current: usize, total_pages: usize) -> Vec<PageLink> {
    let page = |number: usize| PageLink::Page {
        number,
        current: number == current,
    };

    if total_pages <= MAX_PAGE_LINKS {
        return (1..=total_pages).map(page).collect();
    }

    let mut links = vec![page(1)];
    if current > 3 {
        links.push(PageLink::Ellipsis);
    }

    let first = current.saturating_sub(1).max(2);
    let last = (current + 1).min(total_pages - 1);
    links.extend((first..=last).map(page));

    if current + 2 < total_pages {
        links.push(PageLink::Ellipsis);
    }
    links.push(page(total_pages));
    links
}
