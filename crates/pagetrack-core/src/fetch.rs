//! Fetch collaborators.
//!
//! The tracker never talks to a data source directly. It asks an
//! [`ItemFetcher`] for a page and caches whatever slice comes back, which may
//! span more than one page when the source prefetches.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// One response from a fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedPage<T> {
    /// Items starting at the first item of `page_number`.
    pub items: Vec<T>,
    /// The page the slice is anchored to.
    pub page_number: usize,
    /// Size of the whole collection.
    pub total_number_of_items: usize,
}

impl<T> FetchedPage<T> {
    pub fn empty(page_number: usize) -> Self {
        Self {
            items: Vec::new(),
            page_number,
            total_number_of_items: 0,
        }
    }
}

/// Retrieves items from the true data source.
#[async_trait]
pub trait ItemFetcher<T>: Send + Sync {
    /// Fetch the items for `page_number` at `items_per_page`.
    ///
    /// Implementations may return more than one page of items.
    async fn fetch(&self, page_number: usize, items_per_page: usize) -> Result<FetchedPage<T>>;
}

/// Shared, type-erased fetcher.
pub type DynItemFetcher<T> = Arc<dyn ItemFetcher<T>>;

/// Fetcher used when none is supplied. Always returns no items.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyFetcher;

#[async_trait]
impl<T: Send + 'static> ItemFetcher<T> for EmptyFetcher {
    async fn fetch(&self, page_number: usize, _items_per_page: usize) -> Result<FetchedPage<T>> {
        Ok(FetchedPage::empty(page_number))
    }
}

/// Serves pages out of an in-memory collection.
///
/// Each fetch returns up to `prefetch_pages` pages starting at the requested
/// page, so neighbouring pages are cached along with it.
#[derive(Debug, Clone)]
pub struct SliceFetcher<T> {
    items: Arc<Vec<T>>,
    prefetch_pages: usize,
}

impl<T> SliceFetcher<T> {
    pub fn new(items: impl Into<Vec<T>>) -> Self {
        Self {
            items: Arc::new(items.into()),
            prefetch_pages: 1,
        }
    }

    /// Return `pages` pages per fetch (minimum 1).
    pub fn with_prefetch_pages(mut self, pages: usize) -> Self {
        self.prefetch_pages = pages.max(1);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> ItemFetcher<T> for SliceFetcher<T> {
    async fn fetch(&self, page_number: usize, items_per_page: usize) -> Result<FetchedPage<T>> {
        let total = self.items.len();
        let start = page_number.saturating_mul(items_per_page).min(total);
        let end = start
            .saturating_add(items_per_page.saturating_mul(self.prefetch_pages))
            .min(total);

        Ok(FetchedPage {
            items: self.items[start..end].to_vec(),
            page_number,
            total_number_of_items: total,
        })
    }
}

/// Adapts an async closure into an [`ItemFetcher`].
pub struct FnFetcher<F, T> {
    func: F,
    _item: PhantomData<fn() -> T>,
}

impl<F, T> FnFetcher<F, T> {
    pub fn new(func: F) -> Self {
        Self {
            func,
            _item: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut, T> ItemFetcher<T> for FnFetcher<F, T>
where
    F: Fn(usize, usize) -> Fut + Send + Sync,
    Fut: Future<Output = Result<FetchedPage<T>>> + Send,
    T: Send + 'static,
{
    async fn fetch(&self, page_number: usize, items_per_page: usize) -> Result<FetchedPage<T>> {
        (self.func)(page_number, items_per_page).await
    }
}
