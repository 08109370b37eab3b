//! The [`Forest`]: tree bookkeeping shared by every store backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use kin_types::{ForestData, TreeData};

use crate::config::ForestConfig;
use crate::error::{StoreError, StoreResult};
use crate::names::normalize_tree_name;

/// Per-tree entry of [`ForestStats`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeStats {
    pub person_count: usize,
    pub is_active: bool,
}

/// Summary of everything in a forest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForestStats {
    pub tree_count: usize,
    pub total_persons: usize,
    pub active_tree: String,
    pub trees: BTreeMap<String, TreeStats>,
}

/// A [`ForestData`] document together with the rules for changing it.
///
/// Backends keep one of these and decide where it lives; every naming and
/// selection rule is enforced here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Forest {
    data: ForestData,
    config: ForestConfig,
}

impl Forest {
    /// A fresh forest holding only the default tree.
    pub fn new(config: ForestConfig) -> Self {
        Self {
            data: config.initial_forest(),
            config,
        }
    }

    /// Wrap an existing document.
    pub fn from_data(data: ForestData, config: ForestConfig) -> Self {
        Self { data, config }
    }

    /// The underlying document.
    pub fn data(&self) -> &ForestData {
        &self.data
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// The selected tree, or the default tree if none is recorded.
    pub fn selected_tree_name(&self) -> &str {
        if self.data.selected_tree_name.is_empty() {
            &self.config.default_tree_name
        } else {
            &self.data.selected_tree_name
        }
    }

    /// Stored tree names in sorted order.
    pub fn tree_names(&self) -> Vec<String> {
        self.data.trees.keys().cloned().collect()
    }

    pub fn tree_exists(&self, name: &str) -> bool {
        self.data.trees.contains_key(name.trim())
    }

    /// Contents of a tree. The default tree always resolves, falling back to
    /// the configured default data when it is not stored.
    pub fn load(&self, name: &str) -> Option<TreeData> {
        let name = name.trim();
        match self.data.trees.get(name) {
            Some(tree) => Some(tree.clone()),
            None if name == self.config.default_tree_name => Some(self.config.default_data.clone()),
            None => None,
        }
    }

    /// Contents of the selected tree, or the default data if it is missing.
    pub fn active_tree_data(&self) -> TreeData {
        self.load(self.selected_tree_name())
            .unwrap_or_else(|| self.config.default_data.clone())
    }

    pub fn stats(&self) -> ForestStats {
        let active = self.selected_tree_name().to_string();
        let trees = self
            .data
            .trees
            .iter()
            .map(|(name, tree)| {
                let stats = TreeStats {
                    person_count: tree.len(),
                    is_active: *name == active,
                };
                (name.clone(), stats)
            })
            .collect();
        ForestStats {
            tree_count: self.data.trees.len(),
            total_persons: self.data.total_persons(),
            active_tree: active,
            trees,
        }
    }

    // ---------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------

    /// Store `tree` under `name`, creating or overwriting it, and optionally
    /// select it.
    pub fn save(&mut self, name: &str, tree: &TreeData, set_active: bool) -> StoreResult<()> {
        let name = normalize_tree_name(name)?;
        self.data.trees.insert(name.clone(), tree.clone());
        if set_active {
            self.data.selected_tree_name = name.clone();
        }
        debug!(tree = %name, persons = tree.len(), set_active, "saved tree");
        Ok(())
    }

    /// Create a tree, empty or copied from `source`. Returns the trimmed name.
    ///
    /// The new tree is not selected.
    pub fn create_tree(&mut self, name: &str, source: Option<&TreeData>) -> StoreResult<String> {
        let name = normalize_tree_name(name)?;
        if self.data.trees.contains_key(&name) {
            return Err(StoreError::NameExists { name });
        }
        let tree = source.cloned().unwrap_or_default();
        info!(tree = %name, persons = tree.len(), "created tree");
        self.data.trees.insert(name.clone(), tree);
        Ok(name)
    }

    pub fn delete_tree(&mut self, name: &str) -> StoreResult<()> {
        let name = name.trim();
        if name == self.config.default_tree_name {
            return Err(StoreError::CannotModifyReserved {
                name: name.to_string(),
            });
        }
        if self.data.trees.remove(name).is_none() {
            return Err(StoreError::NotFound {
                name: name.to_string(),
            });
        }

        if self.data.selected_tree_name == name {
            let default = self.config.default_tree_name.clone();
            self.data
                .trees
                .entry(default.clone())
                .or_insert_with(|| self.config.default_data.clone());
            self.data.selected_tree_name = default;
        }
        info!(tree = %name, selected = %self.data.selected_tree_name, "deleted tree");
        Ok(())
    }

    /// Rename a tree, keeping it selected if it was. Returns the trimmed new
    /// name. Renaming a tree to its own name does nothing.
    pub fn rename_tree(&mut self, old: &str, new: &str) -> StoreResult<String> {
        let new = normalize_tree_name(new)?;
        let old = old.trim();
        if old == new {
            return Ok(new);
        }
        if old == self.config.default_tree_name {
            return Err(StoreError::CannotModifyReserved {
                name: old.to_string(),
            });
        }
        if !self.data.trees.contains_key(old) {
            return Err(StoreError::NotFound {
                name: old.to_string(),
            });
        }
        if self.data.trees.contains_key(&new) {
            return Err(StoreError::NameExists { name: new });
        }

        if let Some(tree) = self.data.trees.remove(old) {
            self.data.trees.insert(new.clone(), tree);
        }
        if self.data.selected_tree_name == old {
            self.data.selected_tree_name = new.clone();
        }
        info!(from = %old, to = %new, "renamed tree");
        Ok(new)
    }

    /// Select an existing tree. Returns `false`, changing nothing, if there
    /// is no such tree.
    pub fn switch_to_tree(&mut self, name: &str) -> bool {
        let name = name.trim();
        if !self.data.trees.contains_key(name) {
            debug!(tree = %name, "switch to unknown tree ignored");
            return false;
        }
        self.data.selected_tree_name = name.to_string();
        debug!(tree = %name, "switched tree");
        true
    }

    /// Drop every tree and start over from the default tree.
    pub fn reset_to_default(&mut self) {
        self.data = self.config.initial_forest();
        info!(tree = %self.config.default_tree_name, "reset forest to default");
    }
}
