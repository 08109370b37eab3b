//! Tree name normalization.

use crate::error::{StoreError, StoreResult};

/// Trim `name` and reject it if nothing is left.
pub fn normalize_tree_name(name: &str) -> StoreResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyName);
    }
    Ok(trimmed.to_string())
}
