use thiserror::Error;

/// Failures at the persistence seam. Everything above this layer either shows
/// the message to the user or wraps it with `anyhow` context.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No backing store could be opened for this session.
    #[error("Local storage is not available; changes will not be saved this session.")]
    Unavailable,
    #[error("storage backend failed: {0}")]
    Backend(#[from] rusqlite::Error),
    #[error("failed to serialize books: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;
