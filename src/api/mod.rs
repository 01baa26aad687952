//! Reddit API module.
//!
//! This module provides:
//! - HTTP client for the listing, search, comment and archive endpoints
//! - Rate-limit aware fetching with backoff
//! - Session credentials
//! - API response types
//! - The `RedditSource` trait strategies are written against

pub mod auth;
pub mod client;
pub mod fetch;
pub mod source;
pub mod types;

pub use auth::Session;
pub use client::{RedditApi, ARCHIVE_MAX_SIZE, PAGE_LIMIT};
pub use fetch::{fetch_with_backoff, RateLimitInfo, MAX_ATTEMPTS};
pub use source::RedditSource;
pub use types::*;
