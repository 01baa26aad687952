//! Strategy selection: one `collect` entry point dispatched by kind.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::Serialize;
use tokio::time::sleep;

use crate::api::RedditSource;
use crate::collect::range::DateRange;
use crate::collect::record::Record;
use crate::collect::{archive, listing, search};
use crate::config::Config;

/// The three ways of finding posts for a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Newest-first chronological listing.
    Listing,
    /// Keyword search with several query variants.
    Search,
    /// Bulk query against the historical archive.
    Archive,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Listing => "listing",
            StrategyKind::Search => "search",
            StrategyKind::Archive => "archive",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can run a strategy for a subreddit and date range.
///
/// Strategies never fail: remote errors end the strategy early and whatever
/// was gathered so far is returned.
#[async_trait]
pub trait Collector: Send + Sync {
    async fn collect(
        &self,
        kind: StrategyKind,
        subreddit: &str,
        range: &DateRange,
        target: usize,
    ) -> Vec<Record>;
}

/// Page ceilings and courtesy delays shared by the strategies.
#[derive(Debug, Clone)]
pub struct StrategyOptions {
    pub max_pages: usize,
    pub max_search_pages: usize,
    pub page_delay: Duration,
    pub variant_delay: Duration,
}

impl StrategyOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_pages: config.limits.max_pages,
            max_search_pages: config.limits.max_search_pages,
            page_delay: config.pacing.page_delay(),
            variant_delay: config.pacing.variant_delay(),
        }
    }
}

impl Default for StrategyOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Runs strategies against a [`RedditSource`].
pub struct StrategyRunner<'a, S: RedditSource + ?Sized> {
    source: &'a S,
    options: StrategyOptions,
}

impl<'a, S: RedditSource + ?Sized> StrategyRunner<'a, S> {
    pub fn new(source: &'a S, options: StrategyOptions) -> Self {
        Self { source, options }
    }
}

#[async_trait]
impl<S: RedditSource + ?Sized> Collector for StrategyRunner<'_, S> {
    async fn collect(
        &self,
        kind: StrategyKind,
        subreddit: &str,
        range: &DateRange,
        target: usize,
    ) -> Vec<Record> {
        tracing::debug!("{} for r/{} ({}), target {}", kind, subreddit, range, target);

        match kind {
            StrategyKind::Listing => {
                listing::collect_listing(self.source, &self.options, subreddit, range, target).await
            }
            StrategyKind::Search => {
                search::collect_search(self.source, &self.options, subreddit, range, target).await
            }
            StrategyKind::Archive => {
                archive::collect_archive(self.source, subreddit, range, target).await
            }
        }
    }
}

/// Sleep for `delay`, skipping the timer entirely for zero.
pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        sleep(delay).await;
    }
}

/// `base` plus up to a quarter of random extra.
pub(crate) fn jittered(base: Duration) -> Duration {
    let max_extra = base.as_millis() as u64 / 4;
    if max_extra == 0 {
        return base;
    }
    base + Duration::from_millis(rand::thread_rng().gen_range(0..=max_extra))
}
