//! Snapshot persistence.
//!
//! The task store saves its whole collection after every change and reads
//! it back once when opened. Storage itself is an opaque key-value store;
//! the snapshot lives under a single key as a JSON array.

use std::collections::HashMap;

use crate::error::Result;
use crate::model::Task;

/// Key the browser build of the tracker uses for its local storage record.
pub const DEFAULT_SNAPSHOT_KEY: &str = "smartTasks";

/// String store keyed by logical name.
pub trait KeyValueStore {
    /// `Ok(None)` when nothing has been stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key` in full.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Read the value under `key`, then store what `apply` returns for it.
    ///
    /// `apply` returning `None` leaves the value as it is. Stores shared
    /// between processes override this so no other writer can slip in
    /// between the read and the write.
    fn update(
        &mut self,
        key: &str,
        apply: &mut dyn FnMut(Option<String>) -> Result<Option<String>>,
    ) -> Result<()> {
        if let Some(next) = apply(self.get(key)?)? {
            self.set(key, &next)?;
        }
        Ok(())
    }
}

/// Load/save boundary used by [`TaskStore`](crate::store::TaskStore).
pub trait PersistenceAdapter {
    /// Saved tasks in order; empty when nothing was saved yet.
    fn load_snapshot(&self) -> Result<Vec<Task>>;

    /// Persist the full collection, replacing any previous snapshot.
    fn save_snapshot(&mut self, tasks: &[Task]) -> Result<()>;

    /// Apply `change` to the latest saved snapshot and save the result.
    ///
    /// `change` returns `false` when it changed nothing; the snapshot is
    /// then left unsaved. Returns the snapshot as it now stands.
    fn update_snapshot(
        &mut self,
        change: &mut dyn FnMut(&mut Vec<Task>) -> bool,
    ) -> Result<Vec<Task>> {
        let mut tasks = self.load_snapshot()?;
        if change(&mut tasks) {
            self.save_snapshot(&tasks)?;
        }
        Ok(tasks)
    }
}

/// In-process key-value store.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Snapshot adapter over any [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct KeyValueSnapshots<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KeyValueSnapshots<S> {
    /// Snapshots under [`DEFAULT_SNAPSHOT_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_SNAPSHOT_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> PersistenceAdapter for KeyValueSnapshots<S> {
    fn load_snapshot(&self) -> Result<Vec<Task>> {
        let Some(raw) = self.store.get(&self.key)? else {
            tracing::debug!(key = %self.key, "no saved snapshot");
            return Ok(Vec::new());
        };
        let tasks: Vec<Task> = serde_json::from_str(&raw)?;
        tracing::debug!(key = %self.key, tasks = tasks.len(), "loaded snapshot");
        Ok(tasks)
    }

    fn save_snapshot(&mut self, tasks: &[Task]) -> Result<()> {
        let raw = serde_json::to_string(tasks)?;
        self.store.set(&self.key, &raw)?;
        tracing::debug!(key = %self.key, tasks = tasks.len(), "saved snapshot");
        Ok(())
    }

    fn update_snapshot(
        &mut self,
        change: &mut dyn FnMut(&mut Vec<Task>) -> bool,
    ) -> Result<Vec<Task>> {
        let mut tasks = Vec::new();
        let mut saved = false;
        self.store.update(&self.key, &mut |raw: Option<String>| {
            tasks = match raw {
                Some(raw) => serde_json::from_str(&raw)?,
                None => Vec::new(),
            };
            saved = change(&mut tasks);
            if saved {
                Ok(Some(serde_json::to_string(&tasks)?))
            } else {
                Ok(None)
            }
        })?;
        tracing::debug!(key = %self.key, tasks = tasks.len(), saved, "updated snapshot");
        Ok(tasks)
    }
}
