//! Merge engine for Kinfold.
//!
//! Reconciles two person records that share a name under a named
//! [`MergeStrategy`], and folds a whole tree into a [`PersonRegistry`],
//! reporting every field-level disagreement as a [`ConflictRecord`].
//!
//! # Error policy
//!
//! - A failure merging one pair of records is captured in
//!   [`MergeStats::conflicts`] and the tree merge carries on.
//! - Only a malformed merge source aborts [`merge_tree_value`] with
//!   [`MergeError::InvalidArgument`].
//!
//! Tree merges are not commutative: the receiver is always the "first"
//! side of every person-level merge.
//!
//! [`PersonRegistry`]: kin_registry::PersonRegistry

pub mod error;
pub mod person;
pub mod report;
pub mod strategy;
pub mod tree;

pub use error::{MergeError, MergeResult};
pub use person::{conflicting_fields, merge_person, merge_with};
pub use report::{ConflictField, ConflictRecord, MergeStats};
pub use strategy::MergeStrategy;
pub use tree::{merge_tree, merge_tree_value, MergeOptions};
