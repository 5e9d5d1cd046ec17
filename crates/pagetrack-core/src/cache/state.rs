//! Bookkeeping state for one paginated view.

use super::window::{self, CacheWindow};
use crate::fetch::FetchedPage;
use std::ops::Range;
use tracing::debug;

/// Cache bookkeeping for a single paginated view.
///
/// All mutation goes through [`PageCacheState::commit`] and
/// [`PageCacheState::select_cached_page`], which keep the offset and window
/// consistent with the cached items.
#[derive(Debug, Clone)]
pub(crate) struct PageCacheState<T> {
    items_per_page: usize,
    page_number: usize,
    total_item_count: usize,
    cached_items: Vec<T>,
    window: CacheWindow,
    cache_offset: usize,
}

impl<T> PageCacheState<T> {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            items_per_page,
            page_number: 0,
            total_item_count: 0,
            cached_items: Vec::new(),
            window: CacheWindow::EMPTY,
            cache_offset: 0,
        }
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn total_item_count(&self) -> usize {
        self.total_item_count
    }

    pub fn cached_items(&self) -> &[T] {
        &self.cached_items
    }

    pub fn cached_page_indices(&self) -> Range<usize> {
        self.window.pages()
    }

    pub fn cache_offset(&self) -> usize {
        self.cache_offset
    }

    /// Whether `page_number` can be served without fetching.
    pub fn covers(&self, page_number: usize) -> bool {
        self.window.contains(page_number)
    }

    /// Switch to a page already held in the cache. The window is untouched.
    pub fn select_cached_page(&mut self, page_number: usize) {
        debug_assert!(self.covers(page_number));
        self.page_number = page_number;
    }

    /// Commit a fetched slice, optionally switching to a new page size first.
    pub fn commit(&mut self, page: FetchedPage<T>, items_per_page: Option<usize>) {
        if let Some(size) = items_per_page {
            self.items_per_page = size;
        }

        self.window = CacheWindow::compute(page.page_number, page.items.len(), self.items_per_page);
        self.cache_offset = self.window.offset(self.items_per_page);
        self.page_number = page.page_number;
        self.total_item_count = page.total_number_of_items;
        self.cached_items = page.items;

        debug!(
            "Cached pages {:?} (offset {}, {} items, {} total)",
            self.window.pages(),
            self.cache_offset,
            self.cached_items.len(),
            self.total_item_count
        );
    }

    pub fn total_pages(&self) -> usize {
        window::total_pages(self.total_item_count, self.items_per_page)
    }

    pub fn is_first_page(&self) -> bool {
        self.page_number == 0
    }

    pub fn is_last_page(&self) -> bool {
        self.page_number == self.total_pages().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.total_item_count == 0
    }

    /// Logical item range of the current page.
    pub fn item_range(&self) -> Range<usize> {
        window::page_item_range(self.page_number, self.items_per_page, self.total_item_count)
    }

    /// The items of the current page, taken from the cache.
    ///
    /// Empty when the current page lies outside the cached data.
    pub fn visible_items(&self) -> &[T] {
        let range = self.item_range();
        let len = self.cached_items.len();
        let start = range.start.saturating_sub(self.cache_offset).min(len);
        let end = range.end.saturating_sub(self.cache_offset).clamp(start, len);
        &self.cached_items[start..end]
    }
}
