//! Core data types for `SlugDB`.
//!
//! This module defines the dynamic value type and the schemaless item record
//! stored in partitions and mirrored into secondary indexes.

mod item;
mod value;

pub use item::{Item, PARTITION_KEY, SORT_KEY};
pub use value::Value;
