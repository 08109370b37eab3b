//! JSON-file forest store.
//!
//! The whole forest is one JSON document. The file is read once when the
//! store is opened; every mutation is applied to a copy, written to a temp
//! file in the same directory, and moved over the original before the
//! in-memory copy is replaced.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use kin_types::{ForestData, TreeData};

use crate::config::ForestConfig;
use crate::error::{StoreError, StoreResult};
use crate::forest::{Forest, ForestStats};
use crate::traits::ForestStore;

/// A [`ForestStore`] persisted to a single JSON file.
#[derive(Debug)]
pub struct FileForestStore {
    path: PathBuf,
    forest: Mutex<Forest>,
}

impl FileForestStore {
    /// Open the store at `path` with the default sample tree.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with_config(path, ForestConfig::default())
    }

    /// Open the store at `path`.
    ///
    /// A missing file starts from the default forest, which is written out
    /// immediately. A file that is not a forest document is an error.
    pub fn open_with_config(path: impl AsRef<Path>, config: ForestConfig) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let forest = if path.exists() {
            let text = fs::read_to_string(&path)?;
            let data: ForestData = serde_json::from_str(&text).map_err(|e| {
                StoreError::Serialization(format!("{}: {e}", path.display()))
            })?;
            debug!(path = %path.display(), trees = data.trees.len(), "loaded forest");
            Forest::from_data(data, config)
        } else {
            let forest = Forest::new(config);
            write_atomic(&path, forest.data())?;
            info!(path = %path.display(), "initialised forest file");
            forest
        };

        Ok(Self {
            path,
            forest: Mutex::new(forest),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Forest>> {
        self.forest
            .lock()
            .map_err(|e| StoreError::Serialization(format!("lock poisoned: {e}")))
    }

    /// Apply `f` to a copy of the forest, persist the copy, then adopt it.
    fn mutate<T>(&self, f: impl FnOnce(&mut Forest) -> StoreResult<T>) -> StoreResult<T> {
        let mut guard = self.lock()?;
        let mut next = guard.clone();
        let out = f(&mut next)?;
        write_atomic(&self.path, next.data())?;
        *guard = next;
        Ok(out)
    }
}

fn write_atomic(path: &Path, data: &ForestData) -> StoreResult<()> {
    let text =
        serde_json::to_string_pretty(data).map_err(|e| StoreError::Serialization(e.to_string()))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;

    debug!(path = %path.display(), bytes = text.len(), "wrote forest file");
    Ok(())
}

impl ForestStore for FileForestStore {
    fn load(&self, tree: &str) -> StoreResult<Option<TreeData>> {
        Ok(self.lock()?.load(tree))
    }

    fn save(&self, tree: &str, data: &TreeData, set_active: bool) -> StoreResult<()> {
        self.mutate(|forest| forest.save(tree, data, set_active))
    }

    fn create_tree(&self, name: &str, source: Option<&TreeData>) -> StoreResult<String> {
        self.mutate(|forest| forest.create_tree(name, source))
    }

    fn delete_tree(&self, name: &str) -> StoreResult<()> {
        self.mutate(|forest| forest.delete_tree(name))
    }

    fn rename_tree(&self, old: &str, new: &str) -> StoreResult<String> {
        self.mutate(|forest| forest.rename_tree(old, new))
    }

    fn switch_to_tree(&self, name: &str) -> StoreResult<bool> {
        if !self.lock()?.tree_exists(name) {
            return Ok(false);
        }
        self.mutate(|forest| Ok(forest.switch_to_tree(name)))
    }

    fn tree_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.lock()?.tree_names())
    }

    fn tree_exists(&self, name: &str) -> StoreResult<bool> {
        Ok(self.lock()?.tree_exists(name))
    }

    fn selected_tree_name(&self) -> StoreResult<String> {
        Ok(self.lock()?.selected_tree_name().to_string())
    }

    fn active_tree_data(&self) -> StoreResult<TreeData> {
        Ok(self.lock()?.active_tree_data())
    }

    fn stats(&self) -> StoreResult<ForestStats> {
        Ok(self.lock()?.stats())
    }

    fn reset_to_default(&self) -> StoreResult<()> {
        self.mutate(|forest| {
            forest.reset_to_default();
            Ok(())
        })
    }
}
