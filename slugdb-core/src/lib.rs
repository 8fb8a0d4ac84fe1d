//! `SlugDB` Core
//!
//! This crate provides the fundamental types shared by the `SlugDB` crates:
//! the dynamic [`Value`] type, the schemaless [`Item`] record, and the
//! encodings used to persist them.
//!
//! # Modules
//!
//! - [`types`] - Core data types (Value, Item)
//! - [`encoding`] - Record serialization and order-preserving key encoding
//! - [`error`] - Error types

pub mod encoding;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::CoreError;
pub use types::{Item, Value, PARTITION_KEY, SORT_KEY};
