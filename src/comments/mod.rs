//! Comment sampling.
//!
//! Provides:
//! - Ranked selection of a fixed number of comments per post
//! - Enrichment of collected records with those samples

pub mod enrich;
pub mod select;

pub use enrich::enrich_records;
pub use select::{select_comments, select_indices, CommentSample, CommentSlot};
