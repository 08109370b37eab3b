//! In-memory forest store for tests and ephemeral sessions.
//!
//! [`InMemoryForestStore`] keeps a [`Forest`] behind a `RwLock`. Data is
//! lost when the store is dropped.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use kin_types::{ForestData, TreeData};

use crate::config::ForestConfig;
use crate::error::{StoreError, StoreResult};
use crate::forest::{Forest, ForestStats};
use crate::traits::ForestStore;

/// An in-memory implementation of [`ForestStore`].
#[derive(Debug)]
pub struct InMemoryForestStore {
    forest: RwLock<Forest>,
}

impl InMemoryForestStore {
    /// A store holding only the default sample tree.
    pub fn new() -> Self {
        Self::with_config(ForestConfig::default())
    }

    /// A store holding only the configured default tree.
    pub fn with_config(config: ForestConfig) -> Self {
        Self {
            forest: RwLock::new(Forest::new(config)),
        }
    }

    /// A store seeded with an existing document.
    pub fn from_data(data: ForestData, config: ForestConfig) -> Self {
        Self {
            forest: RwLock::new(Forest::from_data(data, config)),
        }
    }

    /// A copy of the current document.
    pub fn snapshot(&self) -> StoreResult<ForestData> {
        Ok(self.read()?.data().clone())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Forest>> {
        self.forest
            .read()
            .map_err(|e| StoreError::Serialization(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Forest>> {
        self.forest
            .write()
            .map_err(|e| StoreError::Serialization(format!("lock poisoned: {e}")))
    }
}

impl Default for InMemoryForestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ForestStore for InMemoryForestStore {
    fn load(&self, tree: &str) -> StoreResult<Option<TreeData>> {
        Ok(self.read()?.load(tree))
    }

    fn save(&self, tree: &str, data: &TreeData, set_active: bool) -> StoreResult<()> {
        self.write()?.save(tree, data, set_active)
    }

    fn create_tree(&self, name: &str, source: Option<&TreeData>) -> StoreResult<String> {
        self.write()?.create_tree(name, source)
    }

    fn delete_tree(&self, name: &str) -> StoreResult<()> {
        self.write()?.delete_tree(name)
    }

    fn rename_tree(&self, old: &str, new: &str) -> StoreResult<String> {
        self.write()?.rename_tree(old, new)
    }

    fn switch_to_tree(&self, name: &str) -> StoreResult<bool> {
        Ok(self.write()?.switch_to_tree(name))
    }

    fn tree_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.read()?.tree_names())
    }

    fn tree_exists(&self, name: &str) -> StoreResult<bool> {
        Ok(self.read()?.tree_exists(name))
    }

    fn selected_tree_name(&self) -> StoreResult<String> {
        Ok(self.read()?.selected_tree_name().to_string())
    }

    fn active_tree_data(&self) -> StoreResult<TreeData> {
        Ok(self.read()?.active_tree_data())
    }

    fn stats(&self) -> StoreResult<ForestStats> {
        Ok(self.read()?.stats())
    }

    fn reset_to_default(&self) -> StoreResult<()> {
        self.write()?.reset_to_default();
        Ok(())
    }
}
