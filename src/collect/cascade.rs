//! Threshold-driven fallback between strategies.

use std::collections::BTreeSet;

use crate::collect::range::DateRange;
use crate::collect::record::Record;
use crate::collect::strategy::{Collector, StrategyKind};
use crate::config::ThresholdsConfig;
use crate::dedup::append_unique;

/// One step of a cascade: run `kind` while fewer than `run_below * target`
/// records have been gathered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeStep {
    pub kind: StrategyKind,
    pub run_below: f64,
}

impl CascadeStep {
    pub const fn new(kind: StrategyKind, run_below: f64) -> Self {
        Self { kind, run_below }
    }

    /// Whether this step should run with `have` of `target` gathered.
    pub fn applies(&self, have: usize, target: usize) -> bool {
        have < target && (have as f64) < (target as f64) * self.run_below
    }
}

/// Cascade for a single sub-window: listing, then search, then archive.
pub fn window_steps(thresholds: &ThresholdsConfig) -> Vec<CascadeStep> {
    vec![
        CascadeStep::new(StrategyKind::Listing, 1.0),
        CascadeStep::new(StrategyKind::Search, 1.0),
        CascadeStep::new(StrategyKind::Archive, thresholds.window_archive_below),
    ]
}

/// Cascade for a short range collected in one pass.
pub fn flat_steps(thresholds: &ThresholdsConfig) -> Vec<CascadeStep> {
    vec![
        CascadeStep::new(StrategyKind::Listing, 1.0),
        CascadeStep::new(StrategyKind::Search, thresholds.flat_search_below),
        CascadeStep::new(StrategyKind::Archive, thresholds.flat_archive_below),
    ]
}

/// Whole-range top-up after windowed collection.
pub fn topup_steps(thresholds: &ThresholdsConfig) -> Vec<CascadeStep> {
    vec![
        CascadeStep::new(StrategyKind::Search, thresholds.topup_search_below),
        CascadeStep::new(StrategyKind::Listing, thresholds.topup_listing_below),
    ]
}

/// Run `steps` in order, appending new records to `records`.
///
/// Each step asks only for the current shortfall. A strategy is recorded in
/// `methods` only if it contributed at least one new record.
pub async fn run_cascade<C: Collector + ?Sized>(
    collector: &C,
    subreddit: &str,
    range: &DateRange,
    target: usize,
    steps: &[CascadeStep],
    records: &mut Vec<Record>,
    methods: &mut BTreeSet<StrategyKind>,
) {
    for step in steps {
        if !step.applies(records.len(), target) {
            continue;
        }

        let shortfall = target - records.len();
        let found = collector.collect(step.kind, subreddit, range, shortfall).await;
        let found_count = found.len();
        let added = append_unique(records, found, shortfall);

        tracing::debug!(
            "{} for r/{} ({}): {} found, {} new, {}/{}",
            step.kind,
            subreddit,
            range,
            found_count,
            added,
            records.len(),
            target
        );

        if added > 0 {
            methods.insert(step.kind);
        }
    }
}
