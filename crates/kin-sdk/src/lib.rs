//! High-level SDK for Kinfold.
//!
//! [`Kinfold`] is the composition root: it owns a [`ForestStore`] and the
//! [`PersonRegistry`] of the selected tree, saves after every mutation, and
//! tells subscribers about it. This is the main entry point for front-ends.

pub mod error;
pub mod observer;
pub mod session;

pub use error::{SdkError, SdkResult};
pub use observer::{SessionSnapshot, SubscriptionId};
pub use session::{Kinfold, TreeSeed};

// Re-export key types
pub use kin_graph::GraphOptions;
pub use kin_merge::{ConflictField, ConflictRecord, MergeOptions, MergeStats, MergeStrategy};
pub use kin_registry::PersonRegistry;
pub use kin_store::{
    FileForestStore, ForestConfig, ForestStats, ForestStore, InMemoryForestStore, TreeStats,
};
pub use kin_types::{sample_family, Person, PersonFields, TreeData, SAMPLE_TREE_NAME};
