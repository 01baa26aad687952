//! Keyword search strategy.

use chrono::Datelike;

use crate::api::{RedditSource, SearchQuery};
use crate::collect::range::DateRange;
use crate::collect::record::Record;
use crate::collect::strategy::{pause, StrategyOptions};
use crate::dedup::SeenIds;

/// Query variants tried in order, from broadest to most specific.
pub fn query_variants(range: &DateRange) -> Vec<SearchQuery> {
    vec![
        SearchQuery::new("*", "new"),
        SearchQuery::new("the", "new"),
        SearchQuery::new("a", "new"),
        SearchQuery::new(range.start.year().to_string(), "new"),
        SearchQuery::new("title:*", "new"),
        SearchQuery::new("selftext:*", "new"),
        SearchQuery::new("*", "relevance"),
        SearchQuery::new("*", "hot"),
        SearchQuery::new("*", "top"),
        SearchQuery::new("", "new"),
    ]
}

/// Run the query variants until `target` in-window posts are found.
///
/// Each variant pages with its own cursor for at most `max_search_pages`
/// pages and is abandoned as soon as a page adds nothing new.
pub async fn collect_search<S: RedditSource + ?Sized>(
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

    let mut seen = SeenIds::new();

    for (index, query) in query_variants(range).iter().enumerate() {
        if records.len() >= target {
            break;
        }
        if index > 0 {
            pause(options.variant_delay).await;
        }

        let found = search_variant(
            source,
            options,
            subreddit,
            range,
            query,
            target,
            &mut seen,
            &mut records,
        )
        .await;

        tracing::debug!(
            "Search variant {} (q={:?}, sort={}) found {} new posts",
            index + 1,
            query.q,
            query.sort,
            found
        );
    }

    tracing::info!("Search r/{} ({}): {} posts", subreddit, range, records.len());
    records
}

#[allow(clippy::too_many_arguments)]
async fn search_variant<S: RedditSource + ?Sized>(
    source: &S,
    options: &StrategyOptions,
    subreddit: &str,
    range: &DateRange,
    query: &SearchQuery,
    target: usize,
    seen: &mut SeenIds,
    records: &mut Vec<Record>,
) -> usize {
    let mut after: Option<String> = None;
    let mut found = 0;

    for page_number in 0..options.max_search_pages {
        if records.len() >= target {
            break;
        }
        if page_number > 0 {
            pause(options.page_delay).await;
        }

        let page = match source.search_posts(subreddit, query, after.as_deref()).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Search q={:?} for r/{} failed: {}", query.q, subreddit, e);
                break;
            }
        };

        if page.posts.is_empty() {
            break;
        }

        let mut page_new = 0;
        for post in &page.posts {
            let Some(record) = Record::from_post(post, subreddit) else {
                continue;
            };
            if !range.contains(record.created_at) {
                continue;
            }
            if seen.insert(&record.id) {
                records.push(record);
                page_new += 1;
                if records.len() >= target {
                    break;
                }
            }
        }

        found += page_new;
        if page_new == 0 {
            break;
        }

        match page.after {
            Some(cursor) => after = Some(cursor),
            None => break,
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::record::fixtures::post;
    use crate::collect::strategy::fakes::*;

    fn january() -> DateRange {
        DateRange::parse("2025-01-01", "2025-01-31").unwrap()
    }

    #[test]
    fn test_query_variants_include_year_token() {
        let variants = query_variants(&january());
        assert_eq!(variants.len(), 10);
        assert_eq!(variants[0], SearchQuery::new("*", "new"));
        assert!(variants.contains(&SearchQuery::new("2025", "new")));
        assert!(variants.iter().any(|q| q.sort == "top"));
    }

    #[tokio::test]
    async fn test_moves_to_next_variant_when_page_adds_nothing() {
        let r = january();
        let t = r.start_epoch() + 500;
        let source = FakeSource::default();
        {
            let mut pages = source.search_pages.lock().unwrap();
            // Variant 1: one useful page, then a page of repeats.
            pages.push_back(Ok(page(vec![post("a", t), post("b", t - 1)], Some("c1"))));
            pages.push_back(Ok(page(vec![post("a", t), post("b", t - 1)], Some("c2"))));
            // Variant 2: out-of-window only.
            pages.push_back(Ok(page(vec![post("old", r.start_epoch() - 1)], Some("c3"))));
            // Variant 3: one new post.
            pages.push_back(Ok(page(vec![post("c", t - 2)], None)));
        }

        let records = collect_search(&source, &fast_options(), "testsub", &r, 3).await;

        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);

        let calls = source.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], "search testsub q=* sort=new -");
        assert_eq!(calls[1], "search testsub q=* sort=new c1");
        assert_eq!(calls[2], "search testsub q=the sort=new -");
        assert_eq!(calls[3], "search testsub q=a sort=new -");
    }

    #[tokio::test]
    async fn test_errors_skip_to_next_variant() {
        let r = january();
        let source = FakeSource::default();
        {
            let mut pages = source.search_pages.lock().unwrap();
            pages.push_back(Err(http_error(403)));
            pages.push_back(Ok(page(vec![post("x", r.start_epoch() + 1)], None)));
        }

        let records = collect_search(&source, &fast_options(), "testsub", &r, 1).await;
        assert_eq!(records.len(), 1);
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_exhausts_all_variants_when_nothing_found() {
        let source = FakeSource::default();
        let records = collect_search(&source, &fast_options(), "testsub", &january(), 10).await;

        assert!(records.is_empty());
        assert_eq!(source.calls().len(), query_variants(&january()).len());
    }

    #[tokio::test]
    async fn test_page_ceiling_per_variant() {
        let r = january();
        let source = FakeSource::default();
        {
            let mut pages = source.search_pages.lock().unwrap();
            for i in 0..10 {
                pages.push_back(Ok(page(
                    vec![post(&format!("p{}", i), r.start_epoch() + i)],
                    Some("next"),
                )));
            }
        }
        let options = fast_options();

        let records = collect_search(&source, &options, "testsub", &r, 4).await;

        assert_eq!(records.len(), 4);
        let calls = source.calls();
        let first_variant = calls.iter().filter(|c| c.contains("q=* sort=new")).count();
        assert_eq!(first_variant, options.max_search_pages);
    }
}
