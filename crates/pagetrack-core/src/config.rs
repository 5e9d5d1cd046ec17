//! Centralized configuration for pagetrack.
//!
//! Constant tables for pagination defaults and persistence, plus the
//! serde-backed [`PaginationOptions`] each tracker is built from.

use crate::error::{PageTrackError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pagination defaults.
pub struct PaginationDefaults;

impl PaginationDefaults {
    pub const ITEMS_PER_PAGE: usize = 200;
    pub const ITEM_SIZE_LIST: [usize; 4] = [50, 200, 350, 500];
    pub const PERSIST_ITEMS_PER_PAGE: bool = true;
    pub const PAGES_TO_SHOW: usize = 5;
    pub const SHOW_ALL: bool = false;
}

/// Persistence keys and file names.
pub struct StoreConfig;

impl StoreConfig {
    /// The only key the tracker reads or writes.
    pub const ITEMS_PER_PAGE_KEY: &'static str = "itemsPerPage";
    pub const DEFAULT_NAMESPACE: &'static str = "pagetrack";
    pub const JSON_FILENAME: &'static str = "preferences.json";
    pub const SQLITE_FILENAME: &'static str = "preferences.sqlite";
}

/// Options recognized when creating a tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaginationOptions {
    /// Requested page size. `None` defers to the persisted preference, then
    /// to [`PaginationDefaults::ITEMS_PER_PAGE`].
    pub items_per_page: Option<usize>,
    /// Page-size choices offered to the user.
    pub item_size_list: Vec<usize>,
    /// Remember page-size changes in the preference store.
    pub persist_items_per_page: bool,
    /// Number of page links to render.
    pub pages_to_show: usize,
    /// Suppress the pagination controls entirely.
    pub show_all: bool,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            items_per_page: None,
            item_size_list: PaginationDefaults::ITEM_SIZE_LIST.to_vec(),
            persist_items_per_page: PaginationDefaults::PERSIST_ITEMS_PER_PAGE,
            pages_to_show: PaginationDefaults::PAGES_TO_SHOW,
            show_all: PaginationDefaults::SHOW_ALL,
        }
    }
}

impl PaginationOptions {
    /// Parse options from a JSON object. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PageTrackError::Json {
            message: format!("Failed to parse pagination options: {}", e),
            source: Some(e),
        })
    }

    /// Load options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| PageTrackError::io_with_path(e, path))?;
        Self::from_json_str(&contents)
    }

    pub fn with_items_per_page(mut self, items_per_page: usize) -> Self {
        self.items_per_page = Some(items_per_page);
        self
    }

    pub fn with_item_size_list(mut self, sizes: impl Into<Vec<usize>>) -> Self {
        self.item_size_list = sizes.into();
        self
    }

    pub fn with_persist_items_per_page(mut self, persist: bool) -> Self {
        self.persist_items_per_page = persist;
        self
    }

    pub fn with_pages_to_show(mut self, pages_to_show: usize) -> Self {
        self.pages_to_show = pages_to_show;
        self
    }

    pub fn with_show_all(mut self, show_all: bool) -> Self {
        self.show_all = show_all;
        self
    }
}

/// Insert `value` into an ascending list unless it is already present.
///
/// The new value goes before the first element that is not smaller than it.
pub fn insert_sorted(list: &mut Vec<usize>, value: usize) {
    if list.contains(&value) {
        return;
    }
    let index = list.iter().position(|&size| size >= value).unwrap_or(list.len());
    list.insert(index, value);
}
