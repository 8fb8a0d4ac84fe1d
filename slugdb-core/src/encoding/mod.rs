//! Serialization and key encoding for storage.
//!
//! This module provides the two byte encodings `SlugDB` persists:
//!
//! - **Records**: any `serde` type is stored as a versioned `bincode` record
//!   through [`encode_record`] and [`decode_record`].
//! - **Keys**: the [`sortable`] module encodes a [`Value`](crate::types::Value)
//!   so that comparing the encoded bytes gives the same ordering as comparing
//!   the values. Concatenated encodings form composite keys.
//!
//! # Example
//!
//! ```
//! use slugdb_core::encoding::{decode_record, encode_record};
//! use slugdb_core::Item;
//!
//! let item = Item::new().with("name", "Alice").with_keys("user#1", "profile#");
//!
//! let bytes = encode_record(&item)?;
//! let decoded: Item = decode_record(&bytes)?;
//! assert_eq!(decoded, item);
//! # Ok::<(), slugdb_core::CoreError>(())
//! ```

mod record;
pub mod sortable;


pub use record::{decode_record, encode_record};
