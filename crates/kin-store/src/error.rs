//! Error types for forest storage.

use thiserror::Error;

/// Errors that can occur during forest operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A tree name was empty after trimming.
    #[error("tree name cannot be empty")]
    EmptyName,

    /// A tree with this name already exists.
    #[error("tree already exists: {name}")]
    NameExists { name: String },

    /// The default tree cannot be deleted or renamed.
    #[error("cannot modify the reserved tree: {name}")]
    CannotModifyReserved { name: String },

    /// The tree was not found.
    #[error("tree not found: {name}")]
    NotFound { name: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error in the file-backed store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
