//! Deduplication module.
//!
//! Provides:
//! - Id-set tracking of records already collected
//! - Order-preserving merges of record batches

pub mod merge;

pub use merge::{append_unique, merge, SeenIds};
