//! The [`ForestStore`] trait defining the forest storage interface.

use kin_types::TreeData;

use crate::error::StoreResult;
use crate::forest::ForestStats;

/// Storage backend for a forest of named trees.
///
/// Implementations must be thread-safe (`Send + Sync`). Every mutating call
/// is applied as a whole or not at all.
pub trait ForestStore: Send + Sync {
    /// Read a tree by name.
    ///
    /// Returns `Ok(None)` if the tree does not exist. The default tree
    /// always resolves.
    fn load(&self, tree: &str) -> StoreResult<Option<TreeData>>;

    /// Create or overwrite a tree, optionally selecting it.
    fn save(&self, tree: &str, data: &TreeData, set_active: bool) -> StoreResult<()>;

    /// Create a new tree, empty or copied from `source`.
    ///
    /// Returns the trimmed name the tree was stored under.
    fn create_tree(&self, name: &str, source: Option<&TreeData>) -> StoreResult<String>;

    /// Delete a tree. The default tree cannot be deleted.
    fn delete_tree(&self, name: &str) -> StoreResult<()>;

    /// Rename a tree, returning the trimmed new name.
    fn rename_tree(&self, old: &str, new: &str) -> StoreResult<String>;

    /// Select a tree. Returns `Ok(false)` if it does not exist.
    fn switch_to_tree(&self, name: &str) -> StoreResult<bool>;

    /// All stored tree names, sorted.
    fn tree_names(&self) -> StoreResult<Vec<String>>;

    fn tree_exists(&self, name: &str) -> StoreResult<bool>;

    /// Name of the selected tree.
    fn selected_tree_name(&self) -> StoreResult<String>;

    /// Contents of the selected tree.
    fn active_tree_data(&self) -> StoreResult<TreeData>;

    fn stats(&self) -> StoreResult<ForestStats>;

    /// Discard every tree and start from the default tree again.
    fn reset_to_default(&self) -> StoreResult<()>;
}
