use thiserror::Error;

/// Errors produced when decoding untyped payloads into Kinfold types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("tree payload must be an object with a `persons` array")]
    NotATree,

    #[error("person at index {index} has no `name`")]
    MissingName { index: usize },

    #[error("serialization error: {0}")]
    Serialization(String),
}
