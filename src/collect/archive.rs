//! Historical archive fallback strategy.

use crate::api::{RedditSource, ARCHIVE_MAX_SIZE};
use crate::collect::range::DateRange;
use crate::collect::record::Record;
use crate::dedup::SeenIds;

/// One bulk query against the archive. Any failure yields an empty result.
pub async fn collect_archive<S: RedditSource + ?Sized>(
    source: &S,
    subreddit: &str,
    range: &DateRange,
    target: usize,
) -> Vec<Record> {
    if target == 0 {
        return Vec::new();
    }

    let size = target.min(ARCHIVE_MAX_SIZE);
    let posts = match source
        .archive_posts(subreddit, range.start_epoch(), range.end_epoch(), size)
        .await
    {
        Ok(posts) => posts,
        Err(e) => {
            tracing::warn!("Archive query for r/{} failed: {}", subreddit, e);
            return Vec::new();
        }
    };

    let mut seen = SeenIds::new();
    let records: Vec<Record> = posts
        .iter()
        .filter_map(|post| Record::from_post(post, subreddit))
        .filter(|record| range.contains(record.created_at))
        .filter(|record| seen.insert(&record.id))
        .take(target)
        .collect();

    tracing::info!("Archive r/{} ({}): {} posts", subreddit, range, records.len());
    records
}
