//! pagetrack - paginated item-cache bookkeeping.
//!
//! A [`PageTracker`] sits between a paginated view and its data source. It
//! remembers which pages of the collection are held locally, serves those
//! without fetching, and asks an injected [`ItemFetcher`] for anything else.
//! The user's page size is remembered through an injected
//! [`PreferenceStore`].
//!
//! # Example
//!
//! ```rust,ignore
//! use pagetrack::{GoToPageOptions, PageTracker, PaginationOptions, SliceFetcher};
//!
//! #[tokio::main]
//! async fn main() -> pagetrack::Result<()> {
//!     let rows: Vec<String> = (0..1_000).map(|i| format!("row {}", i)).collect();
//!
//!     let tracker = PageTracker::builder()
//!         .options(PaginationOptions::default().with_items_per_page(50))
//!         .fetcher(SliceFetcher::new(rows).with_prefetch_pages(4))
//!         .build()
//!         .await?;
//!
//!     // Pages 0..4 arrived with the first fetch
//!     tracker.go_to_page(3, GoToPageOptions::default()).await?;
//!     println!("{} of {} pages", tracker.page_number() + 1, tracker.total_pages());
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod generation;
pub mod store;
pub mod tracker;

// Re-export commonly used types
pub use cache::CacheWindow;
pub use config::{PaginationDefaults, PaginationOptions, StoreConfig};
pub use error::{PageTrackError, Result};
pub use fetch::{DynItemFetcher, EmptyFetcher, FetchedPage, FnFetcher, ItemFetcher, SliceFetcher};
pub use generation::{RequestGeneration, Ticket};
pub use store::{DynPreferenceStore, JsonFileStore, MemoryStore, PreferenceStore, SqliteStore};
pub use tracker::{GoToPageOptions, ItemRange, PageSnapshot, PageTracker, PageTrackerBuilder};
