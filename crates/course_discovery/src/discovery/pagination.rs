//! Page arithmetic for the discovery grid.

use serde::Serialize;

/// Numbered page links shown at once.
pub const MAX_PAGES_TO_SHOW: usize = 5;

/// Number of pages needed for `item_count` items; 0 when there are none.
pub fn total_pages(item_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    item_count.div_ceil(page_size)
}

/// Items on 1-based `page`. Page 0 and pages past the end are empty.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// "Showing first - last of total" header for the results grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRange {
    /// 1-based index of the first item shown
    pub first: usize,
    /// 1-based index of the last item shown
    pub last: usize,
    pub total: usize,
}

impl PageRange {
    /// `None` when the requested page holds nothing.
    pub fn compute(item_count: usize, page: usize, page_size: usize) -> Option<Self> {
        if page == 0 || page_size == 0 {
            return None;
        }
        let start = (page - 1).checked_mul(page_size)?;
        if start >= item_count {
            return None;
        }
        Some(Self {
            first: start + 1,
            last: (start + page_size).min(item_count),
            total: item_count,
        })
    }
}

impl std::fmt::Display for PageRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Showing {} - {} of {} courses", self.first, self.last, self.total)
    }
}

/// Sliding window of page links around the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub pages: Vec<usize>,
    pub current: usize,
    pub leading_ellipsis: bool,
    pub trailing_ellipsis: bool,
    /// First / previous links enabled
    pub has_previous: bool,
    /// Next / last links enabled
    pub has_next: bool,
}

impl PageWindow {
    /// Builds the window; empty when there is at most one page.
    pub fn compute(current: usize, total_pages: usize) -> Self {
        if total_pages <= 1 {
            return Self {
                pages: Vec::new(),
                current,
                leading_ellipsis: false,
                trailing_ellipsis: false,
                has_previous: false,
                has_next: false,
            };
        }

        let half = MAX_PAGES_TO_SHOW / 2;
        let mut start = current.saturating_sub(half).max(1);
        let end = start
            .saturating_add(MAX_PAGES_TO_SHOW - 1)
            .min(total_pages);
        if (end + 1).saturating_sub(start) < MAX_PAGES_TO_SHOW {
            start = (end + 1).saturating_sub(MAX_PAGES_TO_SHOW).max(1);
        }

        Self {
            pages: (start..=end).collect(),
            current,
            leading_ellipsis: start > 1,
            trailing_ellipsis: end < total_pages,
            has_previous: current != 1,
            has_next: current != total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
