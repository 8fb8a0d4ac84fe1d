//! Error types for `SlugDB`.
//!
//! This module provides the [`enum@Error`] type returned by every fallible
//! [`Database`](crate::Database) operation.
//!
//! A missing item is not an error: lookups and deletes return `Ok(None)`.

use slugdb_core::CoreError;
use slugdb_storage::StorageError;
use thiserror::Error;

/// A boxed error raised by a caller-supplied query predicate.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when using `SlugDB`.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Config(String),

    /// The database could not be opened.
    #[error("failed to open database: {0}")]
    Open(String),

    /// A storage error occurred.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A stored record or key could not be encoded or decoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] CoreError),

    /// A query named an index that is not registered.
    #[error("index not found: {0}")]
    IndexNotFound(String),

    /// A query predicate failed.
    #[error("predicate failed: {0}")]
    Predicate(#[source] BoxError),
}

impl Error {
    /// Returns `true` if this error reports a missing index.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::IndexNotFound(_))
    }

    /// Returns `true` if this error came from the storage layer.
    #[must_use]
    pub const fn is_storage_error(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Encoding(_))
    }

    /// Returns `true` if this error was raised by a query predicate.
    #[must_use]
    pub const fn is_predicate_error(&self) -> bool {
        matches!(self, Self::Predicate(_))
    }

    /// Create a config error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap a predicate failure.
    #[must_use]
    pub fn predicate(err: impl Into<BoxError>) -> Self {
        Self::Predicate(err.into())
    }
}

/// A specialized Result type for `SlugDB` operations.
pub type Result<T> = std::result::Result<T, Error>;
