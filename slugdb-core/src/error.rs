//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur in the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An encoding error occurred.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A decoding error occurred.
    #[error("decoding error: {0}")]
    Decoding(String),

    /// A value type mismatch occurred.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: String,
        /// The actual type.
        actual: String,
    },
}
