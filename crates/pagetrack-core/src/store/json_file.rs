//! JSON file preference store.
//!
//! Preferences are a single JSON object on disk. Writes are atomic:
//! 1. Serialize to a temp file with a PID+TID suffix
//! 2. fsync so the data reaches disk
//! 3. Optionally copy the previous file to `.bak`
//! 4. Rename the temp file over the target

use super::traits::PreferenceStore;
use crate::error::{PageTrackError, Result};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;
use std::thread;
use tracing::{debug, warn};

type Preferences = BTreeMap<String, String>;

/// Store backed by a JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    keep_backup: bool,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            keep_backup: false,
            write_lock: Mutex::new(()),
        }
    }

    /// Keep a `.bak` copy of the previous file on every write.
    pub fn with_backup(mut self, keep_backup: bool) -> Self {
        self.keep_backup = keep_backup;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Preferences> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|_| PageTrackError::Store {
            message: format!("Failed to acquire write lock for {}", self.path.display()),
        })
    }
}

impl PreferenceStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _lock = self.lock()?;
        let mut prefs = self.load()?;
        prefs.insert(key.to_string(), value.to_string());
        write_json(&self.path, &prefs, self.keep_backup)
    }
}

/// Read and parse the preferences file. `None` if it doesn't exist.
fn read_json(path: &Path) -> Result<Option<Preferences>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|e| PageTrackError::Io {
        message: format!("Failed to read {}", path.display()),
        path: Some(path.to_path_buf()),
        source: Some(e),
    })?;

    let data = serde_json::from_str(&contents).map_err(|e| PageTrackError::Json {
        message: format!("Failed to parse {}: {}", path.display(), e),
        source: Some(e),
    })?;

    Ok(Some(data))
}

fn write_json(path: &Path, data: &Preferences, keep_backup: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| PageTrackError::Io {
                message: format!("Failed to create directory {}", parent.display()),
                path: Some(parent.to_path_buf()),
                source: Some(e),
            })?;
        }
    }

    let temp_path = path.with_extension(format!("json.{}.{}.tmp", process::id(), thread_id()));

    let serialized = serde_json::to_string_pretty(data).map_err(|e| PageTrackError::Json {
        message: format!("Failed to serialize preferences: {}", e),
        source: Some(e),
    })?;

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| PageTrackError::io_with_path(e, &temp_path))?;

        file.write_all(serialized.as_bytes())
            .map_err(|e| PageTrackError::io_with_path(e, &temp_path))?;
        file.sync_all()
            .map_err(|e| PageTrackError::io_with_path(e, &temp_path))?;
    }

    if keep_backup && path.exists() {
        let backup_path = path.with_extension("json.bak");
        if let Err(e) = fs::copy(path, &backup_path) {
            warn!("Failed to create backup {}: {}", backup_path.display(), e);
        } else {
            debug!("Created backup: {}", backup_path.display());
        }
    }

    fs::rename(&temp_path, path).map_err(|e| PageTrackError::Io {
        message: format!(
            "Failed to rename {} to {}",
            temp_path.display(),
            path.display()
        ),
        path: Some(path.to_path_buf()),
        source: Some(e),
    })?;

    debug!("Atomically wrote {}", path.display());
    Ok(())
}

fn thread_id() -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    format!("{:?}", thread::current().id()).hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("prefs.json"));
        assert_eq!(store.get_item("itemsPerPage").unwrap(), None);
    }

    #[test]
    fn test_write_and_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/prefs.json");

        let store = JsonFileStore::new(&path);
        store.set_item("itemsPerPage", "350").unwrap();
        assert!(path.exists());

        let reopened = JsonFileStore::new(&path);
        assert_eq!(
            reopened.get_item("itemsPerPage").unwrap().as_deref(),
            Some("350")
        );
    }

    #[test]
    fn test_set_item_keeps_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("prefs.json"));

        store.set_item("a", "1").unwrap();
        store.set_item("b", "2").unwrap();
        store.set_item("a", "3").unwrap();
        assert_eq!(store.get_item("a").unwrap().as_deref(), Some("3"));
        assert_eq!(store.get_item("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_backup_created() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        let store = JsonFileStore::new(&path).with_backup(true);

        store.set_item("itemsPerPage", "50").unwrap();
        store.set_item("itemsPerPage", "200").unwrap();

        assert!(path.with_extension("json.bak").exists());
        assert_eq!(store.get_item("itemsPerPage").unwrap().as_deref(), Some("200"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        fs::write(&path, "{oops").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.get_item("itemsPerPage"),
            Err(PageTrackError::Json { .. })
        ));
    }
}
