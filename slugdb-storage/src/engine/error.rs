//! Storage error types.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database could not be opened.
    #[error("failed to open database: {0}")]
    Open(String),

    /// A transaction could not be started or committed.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// A write was attempted in a read-only transaction.
    #[error("cannot write in a read-only transaction")]
    ReadOnly,

    /// The backend reported an internal failure.
    #[error("internal storage error: {0}")]
    Internal(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored bytes could not be interpreted.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The operation is not supported by this backend.
    #[error("operation not supported: {0}")]
    Unsupported(String),
}

impl StorageError {
    /// Returns `true` if retrying the operation in a fresh transaction may
    /// succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Transaction(_) | Self::Io(_))
    }
}
