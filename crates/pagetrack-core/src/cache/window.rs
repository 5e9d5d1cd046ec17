//! Cache window arithmetic.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// The contiguous run of logical pages held by the local item cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheWindow {
    /// First page covered.
    pub first_page: usize,
    /// Number of pages covered. Zero only before the first fetch.
    pub page_count: usize,
}

impl CacheWindow {
    /// A window that covers nothing, so the first request always fetches.
    pub const EMPTY: CacheWindow = CacheWindow {
        first_page: 0,
        page_count: 0,
    };

    /// Compute the window satisfied by `item_count` items anchored at
    /// `page_number`.
    ///
    /// A slice shorter than one page still covers the requested page.
    pub fn compute(page_number: usize, item_count: usize, items_per_page: usize) -> Self {
        let number_of_pages = if items_per_page == 0 {
            0
        } else {
            item_count / items_per_page
        };

        CacheWindow {
            first_page: page_number,
            page_count: number_of_pages.max(1),
        }
    }

    pub fn contains(&self, page_number: usize) -> bool {
        self.pages().contains(&page_number)
    }

    pub fn pages(&self) -> Range<usize> {
        self.first_page..self.first_page.saturating_add(self.page_count)
    }

    pub fn is_empty(&self) -> bool {
        self.page_count == 0
    }

    /// Logical index of the first cached item, saturating for page numbers
    /// past any real collection.
    pub fn offset(&self, items_per_page: usize) -> usize {
        self.first_page.saturating_mul(items_per_page)
    }
}

impl Default for CacheWindow {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Number of pages needed for `total_items` (rounded up).
pub fn total_pages(total_items: usize, items_per_page: usize) -> usize {
    if items_per_page == 0 {
        return 0;
    }
    total_items.div_ceil(items_per_page)
}

/// Half-open logical item range of `page_number`, clipped to `total_items`.
pub fn page_item_range(page_number: usize, items_per_page: usize, total_items: usize) -> Range<usize> {
    let first = page_number.saturating_mul(items_per_page).min(total_items);
    let last = first.saturating_add(items_per_page).min(total_items);
    first..last
}

/// Run of at most `pages_to_show` page numbers centred on `page_number`.
pub fn page_links(page_number: usize, total_pages: usize, pages_to_show: usize) -> Range<usize> {
    if total_pages == 0 || pages_to_show == 0 {
        return 0..0;
    }
    let shown = pages_to_show.min(total_pages);
    let start = page_number.saturating_sub(shown / 2);
    let end = start.saturating_add(shown).min(total_pages);
    end - shown..end
}
