//! Storage engine traits and abstractions.
//!
//! This module defines the traits that storage backends implement:
//!
//! - [`StorageEngine`] - Main entry point for creating transactions
//! - [`Transaction`] - Transaction with get/put/delete/range operations
//! - [`Cursor`] - Ordered iteration over key-value pairs

mod error;
mod traits;

pub use error::{StorageError, StorageResult};
pub use traits::{Cursor, CursorResult, KeyValue, StorageEngine, Transaction};
