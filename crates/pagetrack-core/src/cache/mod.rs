//! Paginated item cache.
//!
//! Tracks which logical pages of a larger collection are held locally so
//! that navigation inside the cached window needs no fetch:
//! - [`CacheWindow`] is the pure window/offset arithmetic
//! - `PageCacheState` is the per-view bookkeeping built on it, owned by
//!   the tracker
//!
//! Only the tracker may mutate the cache state:
//!
//! ```compile_fail
//! use pagetrack::cache::PageCacheState;
//! ```

mod state;
pub mod window;

pub(crate) use state::PageCacheState;
pub use window::CacheWindow;
