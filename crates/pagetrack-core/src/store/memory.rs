//! In-memory preference store.

use super::traits::PreferenceStore;
use crate::error::{PageTrackError, Result};
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-local store. Values live as long as the store does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read().map_err(|_| PageTrackError::Store {
            message: "Failed to acquire read lock for preferences".to_string(),
        })?;
        Ok(values.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| PageTrackError::Store {
            message: "Failed to acquire write lock for preferences".to_string(),
        })?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{store_items_per_page, stored_items_per_page};

    #[test]
    fn test_set_get() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("k").unwrap(), None);

        store.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));

        store.set_item("k", "w").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("w"));
    }

    #[test]
    fn test_stored_items_per_page() {
        let allowed = [50, 200, 350, 500];

        let store = MemoryStore::new();
        assert_eq!(stored_items_per_page(&store, &allowed), None);

        store_items_per_page(&store, 350).unwrap();
        assert_eq!(stored_items_per_page(&store, &allowed), Some(350));

        store.set_item("itemsPerPage", "75").unwrap();
        assert_eq!(stored_items_per_page(&store, &allowed), None);

        store.set_item("itemsPerPage", "lots").unwrap();
        assert_eq!(stored_items_per_page(&store, &allowed), None);

        store.set_item("itemsPerPage", " 50 ").unwrap();
        assert_eq!(stored_items_per_page(&store, &allowed), Some(50));
    }
}
