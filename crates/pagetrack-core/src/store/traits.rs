//! Preference store trait.

use crate::config::StoreConfig;
use crate::error::Result;
use std::sync::Arc;
use tracing::{debug, warn};

/// String key-value persistence used to remember user preferences across
/// tracker instances.
pub trait PreferenceStore: Send + Sync {
    /// Read a value. Returns `None` if the key was never written.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// Shared, type-erased store.
pub type DynPreferenceStore = Arc<dyn PreferenceStore>;

/// Read the persisted page size, if one is stored and usable.
///
/// Missing keys, unparseable values, values outside `allowed` and store
/// failures all count as "no preference".
pub fn stored_items_per_page(store: &dyn PreferenceStore, allowed: &[usize]) -> Option<usize> {
    let raw = match store.get_item(StoreConfig::ITEMS_PER_PAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("Failed to read stored page size: {}", e);
            return None;
        }
    };

    match raw.trim().parse::<usize>() {
        Ok(size) if allowed.contains(&size) => Some(size),
        Ok(size) => {
            debug!("Ignoring stored page size {} (not in {:?})", size, allowed);
            None
        }
        Err(_) => {
            debug!("Ignoring unparseable stored page size {:?}", raw);
            None
        }
    }
}

/// Persist a page size choice.
pub fn store_items_per_page(store: &dyn PreferenceStore, items_per_page: usize) -> Result<()> {
    store.set_item(StoreConfig::ITEMS_PER_PAGE_KEY, &items_per_page.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Holds a single value, whatever the key.
    struct SingleSlotStore(Mutex<Option<String>>);

    impl PreferenceStore for SingleSlotStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Ok(self.0.lock().unwrap().clone())
        }

        fn set_item(&self, _key: &str, value: &str) -> Result<()> {
            *self.0.lock().unwrap() = Some(value.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_get_and_set_are_enough_for_a_store() {
        let store: DynPreferenceStore = Arc::new(SingleSlotStore(Mutex::new(None)));
        assert_eq!(stored_items_per_page(store.as_ref(), &[50, 200]), None);

        store_items_per_page(store.as_ref(), 50).unwrap();
        assert_eq!(stored_items_per_page(store.as_ref(), &[50, 200]), Some(50));
    }
}
