//! Chronological listing strategy.

use crate::api::RedditSource;
use crate::collect::range::DateRange;
use crate::collect::record::Record;
use crate::collect::strategy::{pause, StrategyOptions};
use crate::dedup::SeenIds;

/// Page the newest-first listing, keeping posts inside `range`.
///
/// Stops when `target` posts are kept, when the cursor runs out, after
/// `max_pages`, or after a page that reached back past the window start.
/// That last page is scanned to its end before stopping.
pub async fn collect_listing<S: RedditSource + ?Sized>(
    source: &S,
    options: &StrategyOptions,
    subreddit: &str,
    range: &DateRange,
    target: usize,
) -> Vec<Record> {
    let mut records = Vec::new();
    if target == 0 {
        return records;
    }

    let start = range.start_epoch();
    let end = range.end_epoch();
    let mut seen = SeenIds::new();
    let mut after: Option<String> = None;

    for page_number in 0..options.max_pages {
        if page_number > 0 {
            pause(options.page_delay).await;
        }

        let page = match source.new_posts(subreddit, after.as_deref()).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Listing for r/{} stopped at page {}: {}", subreddit, page_number, e);
                break;
            }
        };

        if page.posts.is_empty() {
            tracing::debug!("No more posts found after {} pages", page_number);
            break;
        }

        let mut reached_start = false;
        for post in &page.posts {
            let Some(record) = Record::from_post(post, subreddit) else {
                continue;
            };

            if record.created_at < start {
                reached_start = true;
                continue;
            }
            if record.created_at > end {
                continue;
            }

            if seen.insert(&record.id) {
                records.push(record);
                if records.len() >= target {
                    tracing::debug!("Listing reached target of {} posts", target);
                    return records;
                }
            }
        }

        if reached_start {
            tracing::debug!("Listing reached start of {} at page {}", range, page_number);
            break;
        }

        match page.after {
            Some(cursor) => after = Some(cursor),
            None => break,
        }
    }

    tracing::info!("Listing r/{} ({}): {} posts", subreddit, range, records.len());
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::record::fixtures::post;
    use crate::collect::strategy::fakes::*;

    fn january() -> DateRange {
        DateRange::parse("2025-01-01", "2025-01-31").unwrap()
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_keeps_only_in_window_posts() {
        let r = january();
        let source = FakeSource::with_listing(vec![page(
            vec![
                post("future", r.end_epoch() + 1),
                post("last_second", r.end_epoch()),
                post("first_second", r.start_epoch()),
            ],
            None,
        )]);

        let records = collect_listing(&source, &fast_options(), "testsub", &r, 100).await;
        assert_eq!(ids(&records), ["last_second", "first_second"]);
    }

    #[tokio::test]
    async fn test_stops_paging_after_reaching_window_start() {
        let r = january();
        let mid = r.start_epoch() + 10 * 86_400;
        let source = FakeSource::with_listing(vec![
            page(vec![post("p1", mid + 2), post("p2", mid + 1)], Some("t3_p2")),
            page(
                vec![
                    post("p3", mid),
                    post("old", r.start_epoch() - 5),
                    // Out-of-order straggler after the old item is still kept.
                    post("p4", mid - 1),
                ],
                Some("t3_p4"),
            ),
            page(vec![post("never", mid - 2)], None),
        ]);

        let records = collect_listing(&source, &fast_options(), "testsub", &r, 100).await;

        assert_eq!(ids(&records), ["p1", "p2", "p3", "p4"]);
        assert_eq!(source.calls().len(), 2);
        assert_eq!(source.calls()[1], "new testsub t3_p2");
    }

    #[tokio::test]
    async fn test_stops_mid_page_at_target() {
        let r = january();
        let t = r.start_epoch() + 1000;
        let source = FakeSource::with_listing(vec![page(
            vec![post("a", t + 3), post("b", t + 2), post("c", t + 1)],
            Some("t3_c"),
        )]);

        let records = collect_listing(&source, &fast_options(), "testsub", &r, 2).await;
        assert_eq!(ids(&records), ["a", "b"]);
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_null_timestamps_are_skipped_not_a_stop_signal() {
        let r = january();
        let t = r.start_epoch() + 1000;
        let mut undated = post("undated", 0);
        undated.created_utc = None;

        let source = FakeSource::with_listing(vec![
            page(vec![undated, post("a", t + 1)], Some("t3_a")),
            page(vec![post("b", t)], None),
        ]);

        let records = collect_listing(&source, &fast_options(), "testsub", &r, 10).await;
        assert_eq!(ids(&records), ["a", "b"]);
    }

    #[tokio::test]
    async fn test_error_returns_partial_results() {
        let r = january();
        let t = r.start_epoch() + 1000;
        let source = FakeSource::default();
        {
            let mut pages = source.listing_pages.lock().unwrap();
            pages.push_back(Ok(page(vec![post("a", t)], Some("t3_a"))));
            pages.push_back(Err(http_error(500)));
        }

        let records = collect_listing(&source, &fast_options(), "testsub", &r, 10).await;
        assert_eq!(ids(&records), ["a"]);
    }

    #[tokio::test]
    async fn test_respects_max_pages() {
        let r = january();
        let t = r.end_epoch() - 10;
        let pages = (0..5)
            .map(|i| page(vec![post(&format!("p{}", i), t - i)], Some("more")))
            .collect();
        let source = FakeSource::with_listing(pages);
        let mut options = fast_options();
        options.max_pages = 3;

        let records = collect_listing(&source, &options, "testsub", &r, 100).await;
        assert_eq!(records.len(), 3);
        assert_eq!(source.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_zero_target_makes_no_requests() {
        let source = FakeSource::default();
        let records = collect_listing(&source, &fast_options(), "testsub", &january(), 0).await;
        assert!(records.is_empty());
        assert!(source.calls().is_empty());
    }
}
