//! Collection over a long range, one sub-window at a time.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::collect::cascade::{run_cascade, window_steps};
use crate::collect::record::{sort_newest_first, Record};
use crate::collect::report::WindowReport;
use crate::collect::strategy::{pause, Collector, StrategyKind};
use crate::collect::window::TimeWindow;
use crate::config::ThresholdsConfig;
use crate::dedup::merge;

/// Records gathered across all windows, plus what each window did.
#[derive(Debug, Default)]
pub struct WindowedOutcome {
    /// Deduplicated, newest first.
    pub records: Vec<Record>,
    pub methods: BTreeSet<StrategyKind>,
    pub windows: Vec<WindowReport>,
}

/// Run the per-window cascade over each window in turn.
pub async fn collect_windowed<C: Collector + ?Sized>(
    collector: &C,
    subreddit: &str,
    windows: &[TimeWindow],
    thresholds: &ThresholdsConfig,
    window_delay: Duration,
) -> WindowedOutcome {
    let steps = window_steps(thresholds);
    let mut outcome = WindowedOutcome::default();

    for (index, window) in windows.iter().enumerate() {
        if index > 0 {
            pause(window_delay).await;
        }

        tracing::info!(
            "r/{} window {}/{}: {} (target {})",
            subreddit,
            index + 1,
            windows.len(),
            window.range,
            window.target_count
        );

        let mut records = Vec::new();
        let mut methods = BTreeSet::new();
        run_cascade(
            collector,
            subreddit,
            &window.range,
            window.target_count,
            &steps,
            &mut records,
            &mut methods,
        )
        .await;

        let report = WindowReport::new(window.range, window.target_count, records.len(), methods);
        tracing::info!(
            "r/{} window {}/{}: {}/{} ({}%)",
            subreddit,
            index + 1,
            windows.len(),
            report.actual,
            report.target,
            report.coverage_percent
        );

        outcome.methods.extend(report.methods_used.iter().copied());
        outcome.windows.push(report);
        outcome.records = merge(std::mem::take(&mut outcome.records), records);
    }

    sort_newest_first(&mut outcome.records);
    outcome
}
