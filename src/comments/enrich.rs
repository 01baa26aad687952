//! Attaching comment samples to a source's final records.

use crate::api::RedditSource;
use crate::collect::record::{EnrichedRecord, Record};
use crate::collect::strategy::pause;
use crate::comments::select::{select_comments, CommentSample};
use crate::config::PacingConfig;
use crate::output::create_item_bar;

/// A longer pause is taken after this many comment fetches.
pub const COMMENT_BATCH_SIZE: usize = 20;

/// Sample `samples` comments for every record, keeping record order.
///
/// Records without comments get an empty sample without a request. A failed
/// fetch is logged and also yields an empty sample.
pub async fn enrich_records<S: RedditSource + ?Sized>(
    source: &S,
    subreddit: &str,
    records: &[Record],
    samples: usize,
    pacing: &PacingConfig,
) -> Vec<EnrichedRecord> {
    let bar = create_item_bar(records.len() as u64, "Comments");
    let mut enriched = Vec::with_capacity(records.len());
    let mut fetched = 0usize;

    for record in records {
        let sample = if record.comment_count == 0 {
            CommentSample::empty(samples)
        } else {
            if fetched > 0 {
                if fetched % COMMENT_BATCH_SIZE == 0 {
                    pause(pacing.comment_batch_pause()).await;
                } else {
                    pause(pacing.comment_delay()).await;
                }
            }
            fetched += 1;

            match source.comments(subreddit, &record.id).await {
                Ok(comments) => select_comments(comments, samples),
                Err(e) => {
                    tracing::warn!("Comments for {} in r/{} unavailable: {}", record.id, subreddit, e);
                    CommentSample::empty(samples)
                }
            }
        };

        enriched.push(EnrichedRecord {
            record: record.clone(),
            comments: Some(sample),
        });
        bar.inc(1);
    }

    bar.finish_and_clear();
    tracing::debug!("Fetched comments for {} of {} posts in r/{}", fetched, records.len(), subreddit);
    enriched
}
