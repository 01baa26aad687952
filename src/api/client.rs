//! Reddit API HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::api::auth::Session;
use crate::api::fetch::fetch_with_backoff;
use crate::api::source::RedditSource;
use crate::api::types::*;
use crate::config::{EndpointsConfig, LimitsConfig};
use crate::error::{Error, Result};

/// Items requested per listing or search page.
pub const PAGE_LIMIT: usize = 100;

/// Largest page the archive will return for one query.
pub const ARCHIVE_MAX_SIZE: usize = 500;

/// Comments requested per thread.
const COMMENT_LIMIT: usize = 100;

/// Reddit API client bound to one session.
pub struct RedditApi {
    client: Client,
    auth_headers: HeaderMap,
    archive_headers: HeaderMap,
    api_base: String,
    archive_url: String,
    max_attempts: u32,
}

impl RedditApi {
    /// Create a client for the given session and endpoints.
    pub fn new(session: &Session, endpoints: &EndpointsConfig, limits: &LimitsConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(session.user_agent())
            .timeout(Duration::from_secs(limits.request_timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        let auth_headers = session.headers()?;

        // The archive is unauthenticated; only identify ourselves.
        let mut archive_headers = HeaderMap::new();
        if let Some(agent) = auth_headers.get(header::USER_AGENT) {
            archive_headers.insert(header::USER_AGENT, agent.clone());
        }
        archive_headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        Ok(Self {
            client,
            auth_headers,
            archive_headers,
            api_base: endpoints.api_base.trim_end_matches('/').to_string(),
            archive_url: endpoints.archive_url.clone(),
            max_attempts: limits.max_attempts,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    /// GET a URL and decode its JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &HeaderMap,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response =
            fetch_with_backoff(&self.client, url, headers, params, self.max_attempts).await?;
        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            Error::MalformedResponse(format!(
                "{} - {} - Response: {}",
                url,
                e,
                &text[..floor_char_boundary(&text, 300)]
            ))
        })
    }
}

#[async_trait]
impl RedditSource for RedditApi {
    async fn new_posts(&self, subreddit: &str, after: Option<&str>) -> Result<ListingPage> {
        let url = self.endpoint(&format!("r/{}/new", subreddit));
        let mut params = vec![("limit", PAGE_LIMIT.to_string())];
        if let Some(cursor) = after {
            params.push(("after", cursor.to_string()));
        }

        let listing: Listing<PostData> = self.get_json(&url, &self.auth_headers, &params).await?;
        Ok(listing.into())
    }

    async fn search_posts(
        &self,
        subreddit: &str,
        query: &SearchQuery,
        after: Option<&str>,
    ) -> Result<ListingPage> {
        let url = self.endpoint(&format!("r/{}/search", subreddit));
        let mut params = vec![
            ("q", query.q.clone()),
            ("sort", query.sort.clone()),
            ("t", "all".to_string()),
            ("restrict_sr", "true".to_string()),
            ("limit", PAGE_LIMIT.to_string()),
        ];
        if let Some(cursor) = after {
            params.push(("after", cursor.to_string()));
        }

        let listing: Listing<PostData> = self.get_json(&url, &self.auth_headers, &params).await?;
        Ok(listing.into())
    }

    async fn archive_posts(
        &self,
        subreddit: &str,
        after_epoch: i64,
        before_epoch: i64,
        size: usize,
    ) -> Result<Vec<PostData>> {
        let params = [
            ("subreddit", subreddit.to_string()),
            ("after", after_epoch.to_string()),
            ("before", before_epoch.to_string()),
            ("size", size.min(ARCHIVE_MAX_SIZE).to_string()),
            ("sort", "created_utc".to_string()),
        ];

        // Archive queries are never retried.
        let response =
            fetch_with_backoff(&self.client, &self.archive_url, &self.archive_headers, &params, 1)
                .await?;
        let text = response.text().await?;
        let archive: ArchiveResponse = serde_json::from_str(&text)
            .map_err(|e| Error::MalformedResponse(format!("archive response: {}", e)))?;

        Ok(archive.data)
    }

    async fn comments(&self, subreddit: &str, post_id: &str) -> Result<Vec<CommentData>> {
        let url = self.endpoint(&format!("r/{}/comments/{}", subreddit, post_id));
        let params = [
            ("limit", COMMENT_LIMIT.to_string()),
            ("sort", "top".to_string()),
        ];

        // The thread endpoint answers [post listing, comment listing].
        let listings: Vec<Listing<CommentData>> =
            self.get_json(&url, &self.auth_headers, &params).await?;

        let comments = listings
            .into_iter()
            .nth(1)
            .map(|listing| {
                listing
                    .data
                    .children
                    .into_iter()
                    .filter(|child| child.kind == "t1")
                    .map(|child| child.data)
                    .collect()
            })
            .unwrap_or_default();

        Ok(comments)
    }
}

/// Largest char boundary at or below `max` bytes.
fn floor_char_boundary(text: &str, max: usize) -> usize {
    if text.len() <= max {
        return text.len();
    }
    let mut idx = max;
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
