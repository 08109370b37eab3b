//! Forest configuration.

use kin_types::{sample_family, ForestData, TreeData, SAMPLE_TREE_NAME};

/// The reserved default tree every forest starts from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForestConfig {
    /// Name of the reserved tree.
    pub default_tree_name: String,
    /// Contents the reserved tree is seeded with.
    pub default_data: TreeData,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            default_tree_name: SAMPLE_TREE_NAME.to_string(),
            default_data: sample_family(),
        }
    }
}

impl ForestConfig {
    /// Use `name` as the reserved tree, seeded with `data`.
    pub fn new(name: impl Into<String>, data: TreeData) -> Self {
        Self {
            default_tree_name: name.into(),
            default_data: data,
        }
    }

    /// A forest holding only the default tree, selected.
    pub fn initial_forest(&self) -> ForestData {
        ForestData::with_tree(self.default_tree_name.clone(), self.default_data.clone())
    }
}
