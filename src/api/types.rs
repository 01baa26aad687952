//! API response type definitions.

use serde::Deserialize;

/// Listing wrapper returned by the listing, search and comment endpoints.
#[derive(Debug, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

/// Listing payload: a page of children plus the next-page cursor.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListingData<T> {
    #[serde(default)]
    pub children: Vec<Thing<T>>,
    #[serde(default)]
    pub after: Option<String>,
}

/// A typed child (`t3` post, `t1` comment, `more` stub).
#[derive(Debug, Deserialize)]
pub struct Thing<T> {
    #[serde(default)]
    pub kind: String,
    pub data: T,
}

/// Raw post fields as returned by both the API and the archive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostData {
    pub id: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub created_utc: Option<f64>,
    pub score: Option<i64>,
    pub permalink: Option<String>,
    pub subreddit: Option<String>,
    pub is_self: Option<bool>,
    pub selftext: Option<String>,
    pub url: Option<String>,
    pub num_comments: Option<i64>,
}

/// Raw comment fields. Every field is optional so `more` stubs still parse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentData {
    pub body: Option<String>,
    pub author: Option<String>,
    pub score: Option<i64>,
}

/// Archive search response: a bare array with no cursor.
#[derive(Debug, Deserialize)]
pub struct ArchiveResponse {
    #[serde(default)]
    pub data: Vec<PostData>,
}

/// One page of posts from a listing or search endpoint.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub posts: Vec<PostData>,
    pub after: Option<String>,
}

impl From<Listing<PostData>> for ListingPage {
    fn from(listing: Listing<PostData>) -> Self {
        Self {
            posts: listing
                .data
                .children
                .into_iter()
                .map(|child| child.data)
                .collect(),
            after: listing.data.after.filter(|cursor| !cursor.is_empty()),
        }
    }
}

/// A single keyword-search variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub q: String,
    pub sort: String,
}

impl SearchQuery {
    pub fn new(q: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            sort: sort.into(),
        }
    }
}
