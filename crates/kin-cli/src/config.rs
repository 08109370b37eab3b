use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use kin_sdk::{sample_family, ForestConfig, MergeStrategy, SAMPLE_TREE_NAME};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "kinfold.toml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub data_file: PathBuf,
    pub default_tree: String,
    pub merge_strategy: String,
    pub update_references: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("kinfold.json"),
            default_tree: SAMPLE_TREE_NAME.to_string(),
            merge_strategy: MergeStrategy::default().to_string(),
            update_references: true,
        }
    }
}

impl CliConfig {
    /// Load `path`, or `kinfold.toml` if it exists, or fall back to defaults.
    ///
    /// An explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))
    }

    /// The reserved tree, seeded with the example family.
    pub fn forest_config(&self) -> ForestConfig {
        ForestConfig::new(self.default_tree.clone(), sample_family())
    }
}
