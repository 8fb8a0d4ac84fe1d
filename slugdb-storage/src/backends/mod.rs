//! Storage backend implementations.
//!
//! # Available Backends
//!
//! - [`redb`] - Pure-Rust embedded database with ACID transactions

pub mod redb;

pub use self::redb::{Durability, RedbConfig, RedbCursor, RedbEngine, RedbTransaction};
