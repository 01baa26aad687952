//! The seam between collection strategies and the remote API.

use async_trait::async_trait;

use crate::api::types::{CommentData, ListingPage, PostData, SearchQuery};
use crate::error::Result;

/// Endpoints the collection strategies page through.
#[async_trait]
pub trait RedditSource: Send + Sync {
    /// One page of the newest-first listing.
    async fn new_posts(&self, subreddit: &str, after: Option<&str>) -> Result<ListingPage>;

    /// One page of a keyword search restricted to the subreddit.
    async fn search_posts(
        &self,
        subreddit: &str,
        query: &SearchQuery,
        after: Option<&str>,
    ) -> Result<ListingPage>;

    /// A single bulk query against the historical archive.
    async fn archive_posts(
        &self,
        subreddit: &str,
        after_epoch: i64,
        before_epoch: i64,
        size: usize,
    ) -> Result<Vec<PostData>>;

    /// Top-level comments of a post.
    async fn comments(&self, subreddit: &str, post_id: &str) -> Result<Vec<CommentData>>;
}
