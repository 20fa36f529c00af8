use crate::path::StorePath;
use crate::value::EntryKind;

/// Errors from hierarchy store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No entry exists at the given path.
    #[error("no entry at {0}")]
    NotFound(StorePath),

    /// An entry exists but is the wrong kind for the operation.
    #[error("entry at {path} is a {actual}, expected a {expected}")]
    WrongKind {
        path: StorePath,
        expected: EntryKind,
        actual: EntryKind,
    },

    /// The stored data is malformed or cannot be decoded.
    #[error("corrupt store data: {0}")]
    Corrupt(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage medium.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store was opened read-only.
    #[error("store is read-only")]
    ReadOnly,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
