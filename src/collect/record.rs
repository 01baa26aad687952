//! Normalized post records.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::api::types::PostData;
use crate::comments::CommentSample;

/// Host prefixed to relative permalinks.
const PERMALINK_HOST: &str = "https://reddit.com";

/// A normalized post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    /// Unix timestamp, UTC.
    pub created_at: i64,
    pub score: i64,
    pub permalink: String,
    pub source: String,
    /// Self text for text posts, empty for link posts.
    pub body: String,
    pub is_text: bool,
    pub external_url: String,
    pub comment_count: u64,
}

impl Record {
    /// Normalize a raw post.
    ///
    /// Returns `None` when the post has no id or no timestamp; such items are
    /// skipped rather than treated as out of range.
    pub fn from_post(post: &PostData, fallback_source: &str) -> Option<Self> {
        let id = post.id.as_deref().filter(|id| !id.is_empty())?.to_string();
        let created_at = post.created_utc.filter(|ts| ts.is_finite())?.floor() as i64;
        let is_text = post.is_self.unwrap_or(false);

        let permalink = match post.permalink.as_deref() {
            Some(link) if link.starts_with("http") => link.to_string(),
            Some(link) if !link.is_empty() => format!("{}{}", PERMALINK_HOST, link),
            _ => String::new(),
        };

        Some(Self {
            id,
            title: post.title.clone().unwrap_or_default(),
            author: post.author.clone(),
            created_at,
            score: post.score.unwrap_or(0),
            permalink,
            source: post
                .subreddit
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| fallback_source.to_string()),
            body: if is_text {
                post.selftext.clone().unwrap_or_default()
            } else {
                String::new()
            },
            is_text,
            external_url: post.url.clone().unwrap_or_default(),
            comment_count: post.num_comments.unwrap_or(0).max(0) as u64,
        })
    }

    /// UTC calendar day the post was created on.
    pub fn created_date(&self) -> Option<NaiveDate> {
        DateTime::from_timestamp(self.created_at, 0).map(|dt| dt.date_naive())
    }
}

/// Stable sort, newest first. Ties keep their relative order.
pub fn sort_newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// A record as handed to the output sink, with its optional comment sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: Record,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<CommentSample>,
}

impl EnrichedRecord {
    pub fn bare(record: Record) -> Self {
        Self {
            record,
            comments: None,
        }
    }
}
