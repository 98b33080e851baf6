//! Error types for record store operations.

/// Errors returned by record stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// IO error while preparing the database location.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A unique constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// A stored value could not be mapped back to its model.
    #[error("decode error: {0}")]
    Decode(String),
}
