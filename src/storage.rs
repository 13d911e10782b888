//! On-disk storage for smarttask
//!
//! Everything lives in one data directory:
//!
//! ```text
//! <data dir>/
//!   smarttask.toml          # Optional configuration
//!   smartTasks.json         # Task snapshot (one file per store key)
//!   smartTasks.json.lock    # Lock file guarding the snapshot
//! ```

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};
use crate::persist::KeyValueStore;

/// Name of the configuration file inside the data directory
pub const CONFIG_FILE: &str = "smarttask.toml";

const VALUE_EXTENSION: &str = "json";

/// File-backed key-value store: one file per key in a data directory
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
    lock_timeout_ms: u64,
}

impl FileKeyValueStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    /// Path to the file holding the value for `key`
    pub fn value_file(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{VALUE_EXTENSION}")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_file(key)?;
        lock::read_locked_optional(&path, self.lock_timeout_ms)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.value_file(key)?;
        lock::write_atomic_locked(&path, value.as_bytes(), self.lock_timeout_ms)
    }

    fn update(
        &mut self,
        key: &str,
        apply: &mut dyn FnMut(Option<String>) -> Result<Option<String>>,
    ) -> Result<()> {
        let path = self.value_file(key)?;
        lock::update_locked(&path, self.lock_timeout_ms, |current| apply(current))
    }
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "invalid store key '{key}' (use letters, digits, '-', '_' or '.')"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_key_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        assert_eq!(store.get("smartTasks").unwrap(), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut store = FileKeyValueStore::new(dir.path().join("data"));
        store.set("smartTasks", "[]").unwrap();
        assert_eq!(store.get("smartTasks").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("data").join("smartTasks.json").exists());

        store.set("smartTasks", "[1]").unwrap();
        assert_eq!(store.get("smartTasks").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn rejects_keys_that_escape_the_directory() {
        let dir = TempDir::new().unwrap();
        let mut store = FileKeyValueStore::new(dir.path());
        for key in ["", "../x", "a/b", ".hidden"] {
            assert!(matches!(
                store.set(key, "v"),
                Err(Error::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn update_sees_writes_from_other_handles() {
        let dir = TempDir::new().unwrap();
        let mut first = FileKeyValueStore::new(dir.path());
        let mut second = FileKeyValueStore::new(dir.path()).with_lock_timeout(500);

        first.set("smartTasks", "a").unwrap();
        second
            .update("smartTasks", &mut |current| {
                Ok(Some(format!("{}b", current.unwrap_or_default())))
            })
            .unwrap();
        assert_eq!(first.get("smartTasks").unwrap().as_deref(), Some("ab"));
        assert!(dir.path().join("smartTasks.json.lock").exists());
    }

    #[test]
    fn update_rejects_bad_keys_before_touching_disk() {
        let dir = TempDir::new().unwrap();
        let mut store = FileKeyValueStore::new(dir.path());
        let result = store.update("../x", &mut |_| Ok(Some("v".to_string())));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }
}
