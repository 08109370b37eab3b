use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("tree not found: {0}")]
    TreeNotFound(String),

    #[error("store error: {0}")]
    Store(#[from] kin_store::StoreError),

    #[error("merge error: {0}")]
    Merge(#[from] kin_merge::MergeError),
}

pub type SdkResult<T> = Result<T, SdkError>;
