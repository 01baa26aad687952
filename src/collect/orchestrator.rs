//! Runs collection for every configured subreddit and writes the results.

use std::collections::BTreeSet;

use chrono::Utc;

use crate::api::RedditSource;
use crate::collect::cascade::{flat_steps, run_cascade, topup_steps};
use crate::collect::range::DateRange;
use crate::collect::record::{sort_newest_first, EnrichedRecord, Record};
use crate::collect::report::{CollectionReport, RunSummary, WindowReport};
use crate::collect::strategy::{jittered, pause, Collector, StrategyKind, StrategyOptions, StrategyRunner};
use crate::collect::window::{split, WindowSizing};
use crate::collect::windowed::collect_windowed;
use crate::comments::enrich_records;
use crate::config::{normalize_subreddit, Config, PacingConfig, ThresholdsConfig};
use crate::error::Result;
use crate::output::RecordSink;

/// Everything a run needs, resolved from a validated [`Config`].
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub subreddits: Vec<String>,
    pub range: DateRange,
    pub target: usize,
    pub comment_samples: Option<usize>,
    pub sizing: WindowSizing,
    pub thresholds: ThresholdsConfig,
    pub strategy: StrategyOptions,
    pub pacing: PacingConfig,
}

impl RunSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            subreddits: config
                .collection
                .subreddits
                .iter()
                .map(|s| normalize_subreddit(s).to_string())
                .collect(),
            range: DateRange::parse(&config.collection.start_date, &config.collection.end_date)?,
            target: config.collection.posts_per_subreddit,
            comment_samples: config.comment_samples(),
            sizing: config.windows.sizing()?,
            thresholds: config.thresholds.clone(),
            strategy: StrategyOptions::from_config(config),
            pacing: config.pacing.clone(),
        })
    }

    /// Whether this range is long enough to be collected in windows.
    pub fn is_windowed(&self) -> bool {
        self.range.span_days() > self.thresholds.windowed_above_days
    }
}

/// Final records of one source and how they were found.
#[derive(Debug, Default)]
pub struct SourceOutcome {
    /// Newest first, at most the target.
    pub records: Vec<Record>,
    pub methods: BTreeSet<StrategyKind>,
    pub windows: Option<Vec<WindowReport>>,
}

/// Collect one subreddit.
///
/// Long ranges are split into windows, each with its own cascade, followed by
/// a whole-range top-up. Short ranges run a single cascade.
pub async fn collect_source<C: Collector + ?Sized>(
    collector: &C,
    subreddit: &str,
    settings: &RunSettings,
) -> SourceOutcome {
    let range = settings.range;
    let target = settings.target;

    let mut outcome = if settings.is_windowed() {
        let windows = split(&range, settings.sizing, target);
        tracing::info!(
            "r/{}: {} days split into {} windows",
            subreddit,
            range.total_days(),
            windows.len()
        );

        let windowed = collect_windowed(
            collector,
            subreddit,
            &windows,
            &settings.thresholds,
            settings.pacing.window_delay(),
        )
        .await;

        let mut outcome = SourceOutcome {
            records: windowed.records,
            methods: windowed.methods,
            windows: Some(windowed.windows),
        };
        run_cascade(
            collector,
            subreddit,
            &range,
            target,
            &topup_steps(&settings.thresholds),
            &mut outcome.records,
            &mut outcome.methods,
        )
        .await;
        outcome
    } else {
        let mut outcome = SourceOutcome::default();
        run_cascade(
            collector,
            subreddit,
            &range,
            target,
            &flat_steps(&settings.thresholds),
            &mut outcome.records,
            &mut outcome.methods,
        )
        .await;
        outcome
    };

    sort_newest_first(&mut outcome.records);
    outcome.records.truncate(target);
    outcome
}

/// Collect every subreddit in turn, hand the results to `sink`, then write
/// the run summary.
///
/// A subreddit whose output cannot be written gets a zero report and the run
/// moves on. Only a failure to write the summary itself is returned.
pub async fn run<S, K>(source: &S, sink: &K, settings: &RunSettings) -> Result<RunSummary>
where
    S: RedditSource + ?Sized,
    K: RecordSink + ?Sized,
{
    let started_at = Utc::now();
    let runner = StrategyRunner::new(source, settings.strategy.clone());
    let mut reports = Vec::with_capacity(settings.subreddits.len());

    for (index, subreddit) in settings.subreddits.iter().enumerate() {
        if index > 0 {
            pause(jittered(settings.pacing.source_delay())).await;
        }

        tracing::info!(
            "Collecting r/{} ({}/{}), {}, target {}",
            subreddit,
            index + 1,
            settings.subreddits.len(),
            settings.range,
            settings.target
        );

        let outcome = collect_source(&runner, subreddit, settings).await;

        let rows: Vec<EnrichedRecord> = match settings.comment_samples {
            Some(samples) if !outcome.records.is_empty() => {
                enrich_records(source, subreddit, &outcome.records, samples, &settings.pacing).await
            }
            _ => outcome
                .records
                .iter()
                .cloned()
                .map(EnrichedRecord::bare)
                .collect(),
        };

        let mut report = CollectionReport::new(
            subreddit.as_str(),
            &outcome.records,
            settings.target,
            settings.range,
            outcome.methods,
            outcome.windows,
        );

        match sink.write_source(subreddit, &settings.range, &rows, &report) {
            Ok(artifact) => report.artifact = artifact,
            Err(e) => {
                tracing::error!("Failed to write results for r/{}: {}", subreddit, e);
                report = CollectionReport::failed(
                    subreddit.as_str(),
                    settings.target,
                    settings.range,
                    e.to_string(),
                );
            }
        }

        tracing::info!(
            "r/{}: {}/{} posts ({}%)",
            subreddit,
            report.collected_count,
            report.target_count,
            report.coverage_percent
        );
        reports.push(report);
    }

    let summary = RunSummary::new(
        started_at,
        Utc::now(),
        settings.range,
        settings.target,
        reports,
    );
    sink.write_run_summary(&summary)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use super::*;
    use crate::api::types::CommentData;
    use crate::collect::cascade::mock::CountingCollector;
    use crate::collect::record::fixtures::post;
    use crate::collect::strategy::fakes::*;
    use crate::collect::strategy::StrategyKind::*;
    use crate::error::Error;
    use crate::output::JsonSink;
    use tempfile::TempDir;

    fn settings(start: &str, end: &str, target: usize) -> RunSettings {
        let mut config = Config::default();
        config.collection.subreddits = vec!["testsub".to_string()];
        config.collection.start_date = start.to_string();
        config.collection.end_date = end.to_string();
        config.collection.posts_per_subreddit = target;
        config.pacing = PacingConfig::none();

        let mut settings = RunSettings::from_config(&config).unwrap();
        settings.strategy = fast_options();
        settings
    }

    /// Sink that keeps everything in memory and can be told to fail.
    #[derive(Default)]
    struct MemorySink {
        fail_for: Option<String>,
        written: Mutex<Vec<(String, Vec<EnrichedRecord>)>>,
        summaries: Mutex<usize>,
    }

    impl RecordSink for MemorySink {
        fn write_source(
            &self,
            source: &str,
            _range: &DateRange,
            rows: &[EnrichedRecord],
            _report: &CollectionReport,
        ) -> Result<Option<PathBuf>> {
            if self.fail_for.as_deref() == Some(source) {
                return Err(Error::Output("disk full".to_string()));
            }
            self.written
                .lock()
                .unwrap()
                .push((source.to_string(), rows.to_vec()));
            Ok(Some(PathBuf::from(format!("{}.json", source))))
        }

        fn write_run_summary(&self, _summary: &RunSummary) -> Result<PathBuf> {
            *self.summaries.lock().unwrap() += 1;
            Ok(PathBuf::from("summary.json"))
        }
    }

    #[test]
    fn test_thirty_day_span_is_flat() {
        assert!(!settings("2025-01-01", "2025-01-31", 50).is_windowed());
        assert!(settings("2025-01-01", "2025-02-01", 50).is_windowed());
    }

    #[test]
    fn test_settings_normalize_subreddits() {
        let mut config = Config::default();
        config.collection.subreddits = vec!["r/rust".to_string(), "/r/golang".to_string()];
        config.collection.start_date = "2025-01-01".to_string();
        config.collection.end_date = "2025-01-02".to_string();

        let settings = RunSettings::from_config(&config).unwrap();
        assert_eq!(settings.subreddits, ["rust", "golang"]);
    }

    #[tokio::test]
    async fn test_flat_run_satisfied_by_listing() {
        let settings = settings("2025-01-01", "2025-01-31", 50);
        let range = settings.range;
        let posts: Vec<_> = (0..50)
            .map(|i| post(&format!("p{}", i), range.start_epoch() + 3600 * (i * 7 % 50)))
            .collect();
        let source = FakeSource::with_listing(vec![page(posts, Some("t3_more"))]);
        let sink = MemorySink::default();

        let summary = run(&source, &sink, &settings).await.unwrap();

        assert!(source.calls().iter().all(|c| c.starts_with("new ")));
        assert_eq!(source.calls().len(), 1);

        let report = &summary.reports[0];
        assert_eq!(report.collected_count, 50);
        assert_eq!(report.coverage_percent, 100.0);
        assert_eq!(report.methods_used, BTreeSet::from([Listing]));
        assert!(report.per_window_breakdown.is_none());

        let written = sink.written.lock().unwrap();
        let rows = &written[0].1;
        assert_eq!(rows.len(), 50);
        assert!(rows
            .windows(2)
            .all(|pair| pair[0].record.created_at >= pair[1].record.created_at));
        assert!(rows.iter().all(|row| row.comments.is_none()));
        assert_eq!(*sink.summaries.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_windowed_run_without_top_up() {
        let settings = settings("2025-01-01", "2025-06-30", 120);
        let collector = CountingCollector::new(&[(Listing, 10)]);

        let outcome = collect_source(&collector, "testsub", &settings).await;

        let windows = outcome.windows.as_ref().unwrap();
        assert_eq!(windows.len(), 12);
        assert!(windows.iter().all(|w| w.target == 10 && w.actual == 10));
        assert!(collector
            .requests()
            .iter()
            .all(|(kind, window, _)| *kind == Listing && *window != settings.range));

        assert_eq!(outcome.records.len(), 120);
        assert_eq!(outcome.methods, BTreeSet::from([Listing]));
        assert!(outcome
            .records
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[tokio::test]
    async fn test_windowed_run_tops_up_over_whole_range() {
        let settings = settings("2025-01-01", "2025-06-30", 120);
        // Two posts per window leaves 24 of 120: below both top-up thresholds.
        let collector = CountingCollector::new(&[(Listing, 2)]);

        let outcome = collect_source(&collector, "testsub", &settings).await;

        let whole_range: Vec<_> = collector
            .requests()
            .into_iter()
            .filter(|(_, window, _)| *window == settings.range)
            .map(|(kind, _, target)| (kind, target))
            .collect();
        assert_eq!(whole_range, [(Search, 96), (Listing, 96)]);
        assert_eq!(outcome.records.len(), 26);
        assert_eq!(outcome.methods, BTreeSet::from([Listing]));
    }

    #[tokio::test]
    async fn test_output_failure_marks_source_failed_and_continues() {
        let mut settings = settings("2025-01-01", "2025-01-31", 5);
        settings.subreddits = vec!["first".to_string(), "second".to_string()];
        let t = settings.range.start_epoch() + 100;

        let source = FakeSource::default();
        {
            let mut pages = source.listing_pages.lock().unwrap();
            pages.push_back(Ok(page(vec![post("a", t)], None)));
            pages.push_back(Ok(page(vec![post("b", t)], None)));
        }
        let sink = MemorySink {
            fail_for: Some("first".to_string()),
            ..Default::default()
        };

        let summary = run(&source, &sink, &settings).await.unwrap();

        assert_eq!(summary.sources_failed, 1);
        assert_eq!(summary.sources_processed, 1);
        assert!(summary.reports[0].is_failed());
        assert_eq!(summary.reports[0].collected_count, 0);
        assert_eq!(summary.reports[1].collected_count, 1);
        assert_eq!(summary.artifacts, [PathBuf::from("second.json")]);
    }

    #[tokio::test]
    async fn test_comment_enrichment_runs_on_final_records() {
        let mut settings = settings("2025-01-01", "2025-01-31", 2);
        settings.comment_samples = Some(1);
        let t = settings.range.start_epoch() + 100;
        let mut talky = post("talky", t + 1);
        talky.num_comments = Some(3);

        let source = FakeSource::with_listing(vec![page(vec![talky, post("quiet", t)], None)]);
        source.comments.lock().unwrap().push((
            "talky".to_string(),
            vec![CommentData {
                body: Some("nice".to_string()),
                author: Some("someone".to_string()),
                score: Some(4),
            }],
        ));
        let sink = MemorySink::default();

        run(&source, &sink, &settings).await.unwrap();

        let written = sink.written.lock().unwrap();
        let rows = &written[0].1;
        assert_eq!(rows[0].record.id, "talky");
        assert_eq!(rows[0].comments.as_ref().unwrap().slots[0].content, "nice");
        assert_eq!(rows[1].comments.as_ref().unwrap().filled(), 0);
    }

    #[tokio::test]
    async fn test_end_to_end_with_json_sink() {
        let settings = settings("2025-01-01", "2025-01-31", 3);
        let t = settings.range.start_epoch() + 100;
        let source = FakeSource::with_listing(vec![page(
            vec![post("c", t + 2), post("b", t + 1), post("a", t)],
            None,
        )]);
        let dir = TempDir::new().unwrap();
        let sink = JsonSink::new(dir.path());

        let summary = run(&source, &sink, &settings).await.unwrap();

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.artifacts.len(), 1);
        assert!(summary.artifacts[0].exists());
        assert!(sink.metadata_path(&settings.range).exists());
    }
}
