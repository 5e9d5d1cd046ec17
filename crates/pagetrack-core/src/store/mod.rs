//! Preference persistence.
//!
//! The tracker remembers the user's page size through a [`PreferenceStore`]
//! handed to it at construction:
//! - [`MemoryStore`] for a single process
//! - [`JsonFileStore`] for a small JSON file written atomically
//! - [`SqliteStore`] for a shared SQLite database with per-namespace isolation

mod json_file;
mod memory;
mod sqlite;
mod traits;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{
    store_items_per_page, stored_items_per_page, DynPreferenceStore, PreferenceStore,
};
