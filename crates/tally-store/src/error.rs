use std::path::PathBuf;

/// Errors from state store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a JSON object of string values.
    #[error("corrupt data file {path}: {reason}")]
    CorruptFile { path: PathBuf, reason: String },

    /// The backing file could not be atomically replaced.
    #[error("failed to persist {path}: {reason}")]
    Persist { path: PathBuf, reason: String },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
