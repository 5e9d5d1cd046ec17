//! SQLite-based preference store.

use super::traits::PreferenceStore;
use crate::config::StoreConfig;
use crate::error::{PageTrackError, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// SQLite-based preference store.
///
/// Several views or applications can share one database; each store instance
/// reads and writes only its own namespace.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    namespace: String,
}

impl SqliteStore {
    /// Open (or create) a store at `db_path` in the default namespace.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        Self::with_namespace(db_path, StoreConfig::DEFAULT_NAMESPACE)
    }

    /// Open (or create) a store at `db_path` in `namespace`.
    pub fn with_namespace(db_path: impl AsRef<Path>, namespace: impl Into<String>) -> Result<Self> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PageTrackError::Io {
                message: format!("Failed to create preferences directory: {}", e),
                path: Some(parent.to_path_buf()),
                source: Some(e),
            })?;
        }

        let conn = Connection::open(db_path).map_err(|e| PageTrackError::Database {
            message: format!("Failed to open preferences database: {}", e),
            source: Some(e),
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| PageTrackError::Database {
                message: format!("Failed to set pragmas: {}", e),
                source: Some(e),
            })?;

        Self::from_connection(conn, namespace)
    }

    /// In-memory database, mostly useful for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, StoreConfig::DEFAULT_NAMESPACE)
    }

    fn from_connection(conn: Connection, namespace: impl Into<String>) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            namespace: namespace.into(),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS preferences (
                namespace TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (namespace, key)
            );
            "#,
        )
        .map_err(|e| PageTrackError::Database {
            message: format!("Failed to initialize preferences schema: {}", e),
            source: Some(e),
        })?;

        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| PageTrackError::Database {
            message: format!("Failed to lock database: {}", e),
            source: None,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// When `key` was last written.
    pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let conn = self.lock()?;

        let raw: Option<String> = conn
            .query_row(
                "SELECT updated_at FROM preferences WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| PageTrackError::Database {
                message: format!("Failed to query preference timestamp: {}", e),
                source: Some(e),
            })?;

        Ok(raw.and_then(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        }))
    }
}

impl PreferenceStore for SqliteStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;

        conn.query_row(
            "SELECT value FROM preferences WHERE namespace = ?1 AND key = ?2",
            params![self.namespace, key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| PageTrackError::Database {
            message: format!("Failed to query preference: {}", e),
            source: Some(e),
        })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            r#"
            INSERT INTO preferences (namespace, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(namespace, key) DO UPDATE SET
                value = ?3,
                updated_at = ?4
            "#,
            params![self.namespace, key, value, now],
        )
        .map_err(|e| PageTrackError::Database {
            message: format!("Failed to store preference {}: {}", key, e),
            source: Some(e),
        })?;

        debug!("Stored preference {}/{}", self.namespace, key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, SqliteStore) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("prefs.sqlite");
        let store = SqliteStore::new(&db_path).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_set_and_get() {
        let (_temp, store) = create_test_store();

        store.set_item("itemsPerPage", "350").unwrap();
        assert_eq!(
            store.get_item("itemsPerPage").unwrap().as_deref(),
            Some("350")
        );
        assert!(store.updated_at("itemsPerPage").unwrap().is_some());
    }

    #[test]
    fn test_overwrite() {
        let (_temp, store) = create_test_store();

        store.set_item("itemsPerPage", "50").unwrap();
        store.set_item("itemsPerPage", "500").unwrap();
        assert_eq!(
            store.get_item("itemsPerPage").unwrap().as_deref(),
            Some("500")
        );
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("prefs.sqlite");

        let orders = SqliteStore::with_namespace(&db_path, "orders").unwrap();
        let users = SqliteStore::with_namespace(&db_path, "users").unwrap();

        orders.set_item("itemsPerPage", "50").unwrap();
        assert_eq!(users.get_item("itemsPerPage").unwrap(), None);
        assert_eq!(orders.namespace(), "orders");
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("prefs.sqlite");

        {
            let store = SqliteStore::new(&db_path).unwrap();
            store.set_item("itemsPerPage", "200").unwrap();
        }

        let store = SqliteStore::new(&db_path).unwrap();
        assert_eq!(
            store.get_item("itemsPerPage").unwrap().as_deref(),
            Some("200")
        );
    }

    #[test]
    fn test_set_item_overwrites() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.updated_at("k").unwrap(), None);

        store.set_item("k", "v").unwrap();
        store.set_item("k", "w").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("w"));
        assert!(store.updated_at("k").unwrap().is_some());
    }
}
