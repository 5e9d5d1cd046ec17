//! Page tracker.
//!
//! One [`PageTracker`] exists per paginated view. It decides, for each page
//! request, whether the cached items already cover the page or whether the
//! fetch collaborator has to be asked, and keeps the cache bookkeeping
//! consistent after every fetch.
//!
//! # Example
//!
//! ```rust,ignore
//! use pagetrack::{PageTracker, PaginationOptions, SliceFetcher};
//!
//! let tracker = PageTracker::builder()
//!     .options(PaginationOptions::default().with_items_per_page(50))
//!     .fetcher(SliceFetcher::new(rows).with_prefetch_pages(3))
//!     .build()
//!     .await?;
//!
//! tracker.next_page().await?; // served from cache
//! println!("{:?}", tracker.items());
//! ```

use crate::cache::window;
use crate::cache::PageCacheState;
use crate::config::{insert_sorted, PaginationDefaults, PaginationOptions};
use crate::error::{PageTrackError, Result};
use crate::fetch::{DynItemFetcher, EmptyFetcher, FetchedPage, ItemFetcher};
use crate::generation::{RequestGeneration, Ticket};
use crate::store::{store_items_per_page, stored_items_per_page, DynPreferenceStore, MemoryStore};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Per-request options for [`PageTracker::go_to_page`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoToPageOptions {
    /// Fetch even if the page is already cached.
    pub force_cache_update: bool,
    /// Page size for this fetch only.
    pub items_per_page: Option<usize>,
}

impl GoToPageOptions {
    /// Options that bypass the cache.
    pub fn forced() -> Self {
        Self {
            force_cache_update: true,
            items_per_page: None,
        }
    }

    pub fn with_items_per_page(mut self, items_per_page: usize) -> Self {
        self.items_per_page = Some(items_per_page);
        self
    }
}

/// Half-open item indices of the visible page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRange {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

/// Read-only view of a tracker, suitable for rendering or serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot<T> {
    pub items: Vec<T>,
    pub page_number: usize,
    pub items_per_page: usize,
    pub total_item_count: usize,
    pub total_pages: usize,
    pub is_first_page: bool,
    pub is_last_page: bool,
    pub is_empty: bool,
    pub page_links: Vec<usize>,
    pub item_range: ItemRange,
    pub item_size_list: Vec<usize>,
    pub show_all: bool,
}

/// Paginated item cache for one view.
pub struct PageTracker<T> {
    state: RwLock<PageCacheState<T>>,
    item_size_list: Vec<usize>,
    persist_items_per_page: bool,
    pages_to_show: usize,
    show_all: bool,
    fetcher: DynItemFetcher<T>,
    store: DynPreferenceStore,
    generation: RequestGeneration,
}

impl<T> PageTracker<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn builder() -> PageTrackerBuilder<T> {
        PageTrackerBuilder::new()
    }

    /// Create a tracker and load its first page.
    ///
    /// The page size is the explicit option if given, else a stored
    /// preference that is a member of the size list, else the default.
    pub async fn initialize(
        options: PaginationOptions,
        fetcher: DynItemFetcher<T>,
        store: DynPreferenceStore,
    ) -> Result<Self> {
        let mut item_size_list = options.item_size_list;

        let items_per_page = match options.items_per_page {
            Some(size) => size,
            None => stored_items_per_page(store.as_ref(), &item_size_list)
                .unwrap_or(PaginationDefaults::ITEMS_PER_PAGE),
        };

        if items_per_page == 0 {
            return Err(PageTrackError::validation(
                "items_per_page",
                "must be greater than zero",
            ));
        }

        insert_sorted(&mut item_size_list, items_per_page);

        let tracker = Self {
            state: RwLock::new(PageCacheState::new(items_per_page)),
            item_size_list,
            persist_items_per_page: options.persist_items_per_page,
            pages_to_show: options.pages_to_show,
            show_all: options.show_all,
            fetcher,
            store,
            generation: RequestGeneration::new(),
        };

        tracker.go_to_page(0, GoToPageOptions::default()).await?;

        info!(
            "Page tracker ready: {} items, {} per page",
            tracker.total_item_count(),
            items_per_page
        );
        Ok(tracker)
    }

    /// Make `page_number` the current page.
    ///
    /// Served from the cache when possible; otherwise the fetch collaborator
    /// is asked and the cache window is rebuilt from its response. Page
    /// numbers are not range-checked.
    pub async fn go_to_page(
        &self,
        page_number: usize,
        options: GoToPageOptions,
    ) -> Result<FetchedPage<T>> {
        if options.items_per_page == Some(0) {
            return Err(PageTrackError::validation(
                "items_per_page",
                "must be greater than zero",
            ));
        }

        // Tickets are only issued under the state lock.
        let (ticket, fetch_size) = {
            let mut state = self.write_state();
            let ticket = self.generation.next_ticket();

            if !options.force_cache_update && state.covers(page_number) {
                state.select_cached_page(page_number);
                debug!("Page {} served from cache", page_number);
                return Ok(FetchedPage {
                    items: state.cached_items().to_vec(),
                    page_number,
                    total_number_of_items: state.total_item_count(),
                });
            }

            (
                ticket,
                options.items_per_page.unwrap_or(state.items_per_page()),
            )
        };

        self.fetch_and_commit(ticket, page_number, fetch_size, None)
            .await
    }

    /// Switch to a new page size.
    ///
    /// Page 0 is fetched at the new size first; the size is committed (and
    /// persisted) only once that fetch succeeds.
    pub async fn set_items_per_page(&self, num_items: usize) -> Result<FetchedPage<T>> {
        if num_items == 0 {
            return Err(PageTrackError::validation(
                "items_per_page",
                "must be greater than zero",
            ));
        }

        let ticket = {
            let _state = self.write_state();
            self.generation.next_ticket()
        };
        let page = self
            .fetch_and_commit(ticket, 0, num_items, Some(num_items))
            .await?;

        if self.persist_items_per_page {
            if let Err(e) = store_items_per_page(self.store.as_ref(), num_items) {
                warn!("Failed to persist page size {}: {}", num_items, e);
            }
        }

        debug!("Page size set to {}", num_items);
        Ok(page)
    }

    /// Fetch fresh data for page 0, or for the current page.
    pub async fn refresh(&self, stay_on_current_page: bool) -> Result<FetchedPage<T>> {
        let target = if stay_on_current_page {
            self.page_number()
        } else {
            0
        };
        self.go_to_page(target, GoToPageOptions::forced()).await
    }

    pub async fn next_page(&self) -> Result<FetchedPage<T>> {
        let target = self.page_number().saturating_add(1).min(self.last_page_index());
        self.go_to_page(target, GoToPageOptions::default()).await
    }

    pub async fn previous_page(&self) -> Result<FetchedPage<T>> {
        let target = self.page_number().saturating_sub(1);
        self.go_to_page(target, GoToPageOptions::default()).await
    }

    pub async fn first_page(&self) -> Result<FetchedPage<T>> {
        self.go_to_page(0, GoToPageOptions::default()).await
    }

    pub async fn last_page(&self) -> Result<FetchedPage<T>> {
        self.go_to_page(self.last_page_index(), GoToPageOptions::default())
            .await
    }

    async fn fetch_and_commit(
        &self,
        ticket: Ticket,
        page_number: usize,
        fetch_size: usize,
        new_items_per_page: Option<usize>,
    ) -> Result<FetchedPage<T>> {
        debug!("Fetching page {} ({} per page)", page_number, fetch_size);
        let page = self.fetcher.fetch(page_number, fetch_size).await?;
        let response = page.clone();

        // The check and the commit share one lock acquisition.
        let mut state = self.write_state();
        if !self.generation.is_current(ticket) {
            debug!(
                "Discarding response for page {} (request {} superseded)",
                page_number,
                ticket.value()
            );
            return Err(PageTrackError::Superseded { page_number });
        }
        state.commit(page, new_items_per_page);
        Ok(response)
    }

    /// The items of the current page.
    pub fn items(&self) -> Vec<T> {
        self.read_state().visible_items().to_vec()
    }

    /// Run `f` against the current page's items without cloning them.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(self.read_state().visible_items())
    }

    pub fn snapshot(&self) -> PageSnapshot<T> {
        let state = self.read_state();
        let range = state.item_range();
        let total_pages = state.total_pages();

        PageSnapshot {
            items: state.visible_items().to_vec(),
            page_number: state.page_number(),
            items_per_page: state.items_per_page(),
            total_item_count: state.total_item_count(),
            total_pages,
            is_first_page: state.is_first_page(),
            is_last_page: state.is_last_page(),
            is_empty: state.is_empty(),
            page_links: window::page_links(state.page_number(), total_pages, self.pages_to_show)
                .collect(),
            item_range: ItemRange {
                start: range.start,
                end: range.end,
                total: state.total_item_count(),
            },
            item_size_list: self.item_size_list.clone(),
            show_all: self.show_all,
        }
    }
}

impl<T> PageTracker<T> {
    fn read_state(&self) -> RwLockReadGuard<'_, PageCacheState<T>> {
        // Commits replace whole fields, so a poisoned lock still holds consistent state.
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, PageCacheState<T>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn page_number(&self) -> usize {
        self.read_state().page_number()
    }

    pub fn items_per_page(&self) -> usize {
        self.read_state().items_per_page()
    }

    pub fn total_item_count(&self) -> usize {
        self.read_state().total_item_count()
    }

    pub fn total_pages(&self) -> usize {
        self.read_state().total_pages()
    }

    pub fn is_first_page(&self) -> bool {
        self.read_state().is_first_page()
    }

    pub fn is_last_page(&self) -> bool {
        self.read_state().is_last_page()
    }

    pub fn is_empty(&self) -> bool {
        self.read_state().is_empty()
    }

    /// Pages currently satisfied by the cache.
    pub fn cached_page_indices(&self) -> Range<usize> {
        self.read_state().cached_page_indices()
    }

    pub fn cache_offset(&self) -> usize {
        self.read_state().cache_offset()
    }

    pub fn cached_item_count(&self) -> usize {
        self.read_state().cached_items().len()
    }

    pub fn item_size_list(&self) -> &[usize] {
        &self.item_size_list
    }

    pub fn pages_to_show(&self) -> usize {
        self.pages_to_show
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    pub fn persist_items_per_page(&self) -> bool {
        self.persist_items_per_page
    }

    /// Page numbers to render as links around the current page.
    pub fn page_links(&self) -> Range<usize> {
        let state = self.read_state();
        window::page_links(state.page_number(), state.total_pages(), self.pages_to_show)
    }

    pub fn item_range(&self) -> ItemRange {
        let state = self.read_state();
        let range = state.item_range();
        ItemRange {
            start: range.start,
            end: range.end,
            total: state.total_item_count(),
        }
    }

    fn last_page_index(&self) -> usize {
        self.total_pages().saturating_sub(1)
    }
}

/// Builder for [`PageTracker`].
///
/// Without a fetcher the tracker uses [`EmptyFetcher`]; without a store it
/// uses a fresh [`MemoryStore`].
pub struct PageTrackerBuilder<T> {
    options: PaginationOptions,
    fetcher: Option<DynItemFetcher<T>>,
    store: Option<DynPreferenceStore>,
}

impl<T> PageTrackerBuilder<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            options: PaginationOptions::default(),
            fetcher: None,
            store: None,
        }
    }

    pub fn options(mut self, options: PaginationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn fetcher(mut self, fetcher: impl ItemFetcher<T> + 'static) -> Self {
        let fetcher: DynItemFetcher<T> = Arc::new(fetcher);
        self.fetcher = Some(fetcher);
        self
    }

    pub fn shared_fetcher(mut self, fetcher: DynItemFetcher<T>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn store(mut self, store: DynPreferenceStore) -> Self {
        self.store = Some(store);
        self
    }

    pub async fn build(self) -> Result<PageTracker<T>> {
        let fetcher = self
            .fetcher
            .unwrap_or_else(|| Arc::new(EmptyFetcher) as DynItemFetcher<T>);
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as DynPreferenceStore);
        PageTracker::initialize(self.options, fetcher, store).await
    }
}

impl<T> Default for PageTrackerBuilder<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::SliceFetcher;

    fn rows(n: u32) -> Vec<u32> {
        (0..n).collect()
    }

    async fn tracker(n: u32, per_page: usize, prefetch: usize) -> PageTracker<u32> {
        PageTracker::builder()
            .options(PaginationOptions::default().with_items_per_page(per_page))
            .fetcher(SliceFetcher::new(rows(n)).with_prefetch_pages(prefetch))
            .build()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initialize_loads_first_page() {
        let tracker = tracker(22, 3, 1).await;
        assert_eq!(tracker.page_number(), 0);
        assert_eq!(tracker.items(), vec![0, 1, 2]);
        assert_eq!(tracker.total_pages(), 8);
        assert!(tracker.is_first_page());
        assert!(!tracker.is_last_page());
        assert_eq!(tracker.item_size_list(), &[3, 50, 200, 350, 500]);
    }

    #[tokio::test]
    async fn test_default_fetcher_is_empty() {
        let tracker: PageTracker<String> = PageTracker::builder().build().await.unwrap();
        assert!(tracker.is_empty());
        assert_eq!(tracker.total_pages(), 0);
        assert_eq!(tracker.items_per_page(), 200);
        assert!(tracker.is_last_page());
        assert_eq!(tracker.cached_page_indices(), 0..1);
    }

    #[tokio::test]
    async fn test_zero_page_size_rejected() {
        let result: Result<PageTracker<u32>> = PageTracker::builder()
            .options(PaginationOptions::default().with_items_per_page(0))
            .build()
            .await;
        assert!(matches!(result, Err(PageTrackError::Validation { .. })));

        let tracker = tracker(10, 5, 1).await;
        assert!(tracker.set_items_per_page(0).await.is_err());
        assert!(tracker
            .go_to_page(1, GoToPageOptions::default().with_items_per_page(0))
            .await
            .is_err());
        assert_eq!(tracker.items_per_page(), 5);
    }

    #[tokio::test]
    async fn test_navigation_helpers_clamp() {
        let tracker = tracker(22, 3, 1).await;

        tracker.previous_page().await.unwrap();
        assert_eq!(tracker.page_number(), 0);

        tracker.last_page().await.unwrap();
        assert_eq!(tracker.page_number(), 7);
        assert_eq!(tracker.items(), vec![21]);
        assert!(tracker.is_last_page());

        tracker.next_page().await.unwrap();
        assert_eq!(tracker.page_number(), 7);

        tracker.previous_page().await.unwrap();
        assert_eq!(tracker.items(), vec![18, 19, 20]);

        tracker.first_page().await.unwrap();
        assert!(tracker.is_first_page());
    }

    #[tokio::test]
    async fn test_page_links_and_item_range() {
        let tracker = tracker(100, 5, 1).await;
        assert_eq!(tracker.page_links(), 0..5);

        tracker
            .go_to_page(10, GoToPageOptions::default())
            .await
            .unwrap();
        assert_eq!(tracker.page_links(), 8..13);
        assert_eq!(
            tracker.item_range(),
            ItemRange {
                start: 50,
                end: 55,
                total: 100
            }
        );

        tracker
            .go_to_page(19, GoToPageOptions::default())
            .await
            .unwrap();
        assert_eq!(tracker.page_links(), 15..20);
    }

    #[tokio::test]
    async fn test_snapshot() {
        let tracker = tracker(7, 3, 3).await;
        tracker.next_page().await.unwrap();

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.items, vec![3, 4, 5]);
        assert_eq!(snapshot.page_number, 1);
        assert_eq!(snapshot.total_pages, 3);
        assert_eq!(snapshot.page_links, vec![0, 1, 2]);
        assert!(!snapshot.is_first_page);
        assert!(!snapshot.is_last_page);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["pageNumber"], 1);
        assert_eq!(json["itemRange"]["start"], 3);
    }

    #[tokio::test]
    async fn test_refresh_stays_or_resets() {
        let tracker = tracker(30, 10, 1).await;
        tracker
            .go_to_page(2, GoToPageOptions::default())
            .await
            .unwrap();

        tracker.refresh(true).await.unwrap();
        assert_eq!(tracker.page_number(), 2);
        assert_eq!(tracker.items(), (20..30).collect::<Vec<u32>>());

        tracker.refresh(false).await.unwrap();
        assert_eq!(tracker.page_number(), 0);
    }

    #[tokio::test]
    async fn test_with_items_borrows() {
        let tracker = tracker(10, 4, 1).await;
        let sum: u32 = tracker.with_items(|items| items.iter().sum());
        assert_eq!(sum, 6);
    }
}
