//! Forest storage for Kinfold.
//!
//! A forest is a set of named trees plus the name of the selected one. The
//! [`ForestStore`] trait is the storage seam; [`InMemoryForestStore`] and
//! [`FileForestStore`] implement it on top of the same [`Forest`] rules.
//!
//! # Tree name rules
//!
//! - Names are trimmed before use; an empty name is rejected.
//! - The default tree (see [`ForestConfig`]) can be neither deleted nor
//!   renamed, and loading it always yields data.
//! - Deleting the selected tree selects the default tree again.

pub mod config;
pub mod error;
pub mod file;
pub mod forest;
pub mod memory;
pub mod names;
pub mod traits;

pub use config::ForestConfig;
pub use error::{StoreError, StoreResult};
pub use file::FileForestStore;
pub use forest::{Forest, ForestStats, TreeStats};
pub use memory::InMemoryForestStore;
pub use names::normalize_tree_name;
pub use traits::ForestStore;
