//! Fuzz testing infrastructure for SlugDB.
//!
//! Random put/delete sequences are applied to a database and to an in-memory
//! model, and the indexes are checked against the model afterwards.
//!
//! Uses proptest for property-based testing.

pub mod operations;
