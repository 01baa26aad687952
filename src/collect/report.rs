//! Per-source reports and the run summary.

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::collect::range::DateRange;
use crate::collect::record::Record;
use crate::collect::strategy::StrategyKind;

/// `actual / target` as a percentage rounded to one decimal; 0 when `target` is 0.
pub fn coverage_percent(actual: usize, target: usize) -> f64 {
    if target == 0 {
        return 0.0;
    }
    (actual as f64 * 1000.0 / target as f64).round() / 10.0
}

/// Outcome of one sub-window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowReport {
    pub window: DateRange,
    pub target: usize,
    pub actual: usize,
    pub coverage_percent: f64,
    pub methods_used: BTreeSet<StrategyKind>,
}

impl WindowReport {
    pub fn new(
        window: DateRange,
        target: usize,
        actual: usize,
        methods_used: BTreeSet<StrategyKind>,
    ) -> Self {
        Self {
            window,
            target,
            actual,
            coverage_percent: coverage_percent(actual, target),
            methods_used,
        }
    }
}

/// Content breakdown of one source's final records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    pub text_posts: usize,
    pub link_posts: usize,
    pub unique_dates: usize,
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
    pub posts_with_comments: usize,
}

impl SourceStats {
    pub fn from_records(records: &[Record]) -> Self {
        let dates: HashSet<NaiveDate> = records.iter().filter_map(Record::created_date).collect();
        let text_posts = records.iter().filter(|r| r.is_text).count();

        Self {
            text_posts,
            link_posts: records.len() - text_posts,
            unique_dates: dates.len(),
            earliest: dates.iter().min().copied(),
            latest: dates.iter().max().copied(),
            posts_with_comments: records.iter().filter(|r| r.comment_count > 0).count(),
        }
    }
}

/// Outcome of one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionReport {
    pub source: String,
    pub collected_count: usize,
    pub target_count: usize,
    pub coverage_percent: f64,
    pub methods_used: BTreeSet<StrategyKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_window_breakdown: Option<Vec<WindowReport>>,
    pub date_range: DateRange,
    pub stats: SourceStats,
    pub artifact: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CollectionReport {
    pub fn new(
        source: impl Into<String>,
        records: &[Record],
        target_count: usize,
        date_range: DateRange,
        methods_used: BTreeSet<StrategyKind>,
        per_window_breakdown: Option<Vec<WindowReport>>,
    ) -> Self {
        Self {
            source: source.into(),
            collected_count: records.len(),
            target_count,
            coverage_percent: coverage_percent(records.len(), target_count),
            methods_used,
            per_window_breakdown,
            date_range,
            stats: SourceStats::from_records(records),
            artifact: None,
            error: None,
        }
    }

    /// Zero report for a source that could not be completed.
    pub fn failed(
        source: impl Into<String>,
        target_count: usize,
        date_range: DateRange,
        error: impl Into<String>,
    ) -> Self {
        let mut report = Self::new(
            source,
            &[],
            target_count,
            date_range,
            BTreeSet::new(),
            None,
        );
        report.error = Some(error.into());
        report
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Wall-clock runtime in several units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Runtime {
    pub seconds: f64,
    pub minutes: f64,
    pub hours: f64,
    pub formatted: String,
}

impl Runtime {
    pub fn from_seconds(seconds: f64) -> Self {
        let seconds = seconds.max(0.0);
        Self {
            seconds: round2(seconds),
            minutes: round2(seconds / 60.0),
            hours: round2(seconds / 3600.0),
            formatted: format_duration(seconds),
        }
    }
}

/// Aggregate outcome of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub runtime: Runtime,
    pub date_range: DateRange,
    pub target_per_source: usize,
    pub total_records: usize,
    pub sources_processed: usize,
    pub sources_failed: usize,
    pub posts_per_minute: f64,
    pub average_seconds_per_post: f64,
    pub reports: Vec<CollectionReport>,
    pub artifacts: Vec<PathBuf>,
}

impl RunSummary {
    pub fn new(
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        date_range: DateRange,
        target_per_source: usize,
        reports: Vec<CollectionReport>,
    ) -> Self {
        let elapsed = (finished_at - started_at).num_milliseconds() as f64 / 1000.0;
        let runtime = Runtime::from_seconds(elapsed);
        let total_records: usize = reports.iter().map(|r| r.collected_count).sum();
        let sources_failed = reports.iter().filter(|r| r.is_failed()).count();

        let posts_per_minute = if runtime.seconds > 0.0 {
            round2(total_records as f64 / (runtime.seconds / 60.0))
        } else {
            0.0
        };
        let average_seconds_per_post = if total_records > 0 {
            round2(runtime.seconds / total_records as f64)
        } else {
            0.0
        };

        Self {
            started_at,
            finished_at,
            runtime,
            date_range,
            target_per_source,
            total_records,
            sources_processed: reports.len() - sources_failed,
            sources_failed,
            posts_per_minute,
            average_seconds_per_post,
            artifacts: reports.iter().filter_map(|r| r.artifact.clone()).collect(),
            reports,
        }
    }
}

/// Human-readable duration: `45.2s`, `12m 5s` or `2h 3m`.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        return format!("{:.1}s", seconds);
    }
    let whole = seconds.round() as u64;
    if whole < 3600 {
        format!("{}m {}s", whole / 60, whole % 60)
    } else {
        format!("{}h {}m", whole / 3600, (whole % 3600) / 60)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::record::fixtures::record;
    use chrono::TimeZone;

    fn january() -> DateRange {
        DateRange::parse("2025-01-01", "2025-01-31").unwrap()
    }

    #[test]
    fn test_coverage_percent() {
        assert_eq!(coverage_percent(50, 50), 100.0);
        assert_eq!(coverage_percent(1, 3), 33.3);
        assert_eq!(coverage_percent(2, 3), 66.7);
        assert_eq!(coverage_percent(5, 0), 0.0);
    }

    #[test]
    fn test_source_stats() {
        let start = january().start_epoch();
        let mut link = record("b", start + 86_400);
        link.is_text = false;
        link.comment_count = 4;
        let records = vec![record("a", start), link, record("c", start + 10)];

        let stats = SourceStats::from_records(&records);
        assert_eq!(stats.text_posts, 2);
        assert_eq!(stats.link_posts, 1);
        assert_eq!(stats.unique_dates, 2);
        assert_eq!(stats.earliest, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(stats.latest, NaiveDate::from_ymd_opt(2025, 1, 2));
        assert_eq!(stats.posts_with_comments, 1);
    }

    #[test]
    fn test_failed_report_is_zero() {
        let report = CollectionReport::failed("testsub", 100, january(), "boom");
        assert!(report.is_failed());
        assert_eq!(report.collected_count, 0);
        assert_eq!(report.coverage_percent, 0.0);
        assert!(report.methods_used.is_empty());
    }

    #[test]
    fn test_run_summary_rates() {
        let started = Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap();
        let finished = Utc.with_ymd_and_hms(2025, 2, 1, 12, 2, 0).unwrap();

        let records: Vec<_> = (0..60).map(|i| record(&i.to_string(), 1_735_700_000)).collect();
        let mut ok = CollectionReport::new(
            "testsub",
            &records,
            100,
            january(),
            BTreeSet::from([StrategyKind::Listing]),
            None,
        );
        ok.artifact = Some(PathBuf::from("out/testsub.json"));
        let failed = CollectionReport::failed("other", 100, january(), "HTTP 403: forbidden");

        let summary = RunSummary::new(started, finished, january(), 100, vec![ok, failed]);

        assert_eq!(summary.total_records, 60);
        assert_eq!(summary.sources_processed, 1);
        assert_eq!(summary.sources_failed, 1);
        assert_eq!(summary.runtime.seconds, 120.0);
        assert_eq!(summary.runtime.minutes, 2.0);
        assert_eq!(summary.posts_per_minute, 30.0);
        assert_eq!(summary.average_seconds_per_post, 2.0);
        assert_eq!(summary.artifacts, [PathBuf::from("out/testsub.json")]);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45.24), "45.2s");
        assert_eq!(format_duration(725.0), "12m 5s");
        assert_eq!(format_duration(7380.0), "2h 3m");
    }
}
