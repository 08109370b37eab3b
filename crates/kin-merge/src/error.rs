//! Error types for merge operations.

use kin_types::TypeError;

/// Errors that can occur while merging persons or trees.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// One side of a person-level merge was absent.
    #[error("both persons must be provided for merging")]
    MissingOperand,

    /// The two records describe different persons.
    #[error("cannot merge persons with different names: {first:?} and {second:?}")]
    NameMismatch { first: String, second: String },

    /// The strategy name is not one of the known strategies.
    #[error("unknown merge strategy: {0}")]
    UnknownStrategy(String),

    /// The merge source is not a tree payload.
    #[error("invalid merge source: {0}")]
    InvalidArgument(#[from] TypeError),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
