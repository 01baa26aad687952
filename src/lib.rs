//! Subreddit Harvester - date-bounded post collection for Reddit.
//!
//! This library collects posts from subreddits within a calendar date range,
//! combining several retrieval strategies to get as close to a target count
//! as the API allows.
//!
//! # Features
//!
//! - Newest-first listing, multi-variant keyword search and archive fallback
//! - Automatic splitting of long ranges into sub-windows
//! - Deduplication by post id across strategies and windows
//! - Optional ranked comment sampling per post
//! - Rate limiting and retry logic
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use subreddit_harvester::{run, Config, JsonSink, RedditApi, RunSettings, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let session = Session::new(
//!         config.account.access_token.clone(),
//!         config.account.user_agent.clone(),
//!     );
//!     let api = RedditApi::new(&session, &config.endpoints, &config.limits)?;
//!     let sink = JsonSink::new(config.collection.output_directory.clone());
//!
//!     let summary = run(&api, &sink, &RunSettings::from_config(&config)?).await?;
//!     println!("{} posts collected", summary.total_records);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod collect;
pub mod comments;
pub mod config;
pub mod dedup;
pub mod error;
pub mod output;

// Re-exports for convenience
pub use api::{RedditApi, RedditSource, Session};
pub use collect::{run, CollectionReport, DateRange, Record, RunSettings, RunSummary, StrategyKind};
pub use config::{Config, WindowMode};
pub use error::{Error, Result};
pub use output::{JsonSink, RecordSink};
