//! Splitting a date range into sub-windows with a share of the target each.

use chrono::Duration as ChronoDuration;
use serde::Serialize;

use crate::collect::range::DateRange;

/// Fewest windows `Auto` sizing will produce.
const AUTO_MIN_WINDOWS: i64 = 6;

/// Most windows `Auto` sizing will produce.
const AUTO_MAX_WINDOWS: i64 = 12;

/// Days per window `Auto` sizing aims for.
const AUTO_DAYS_PER_WINDOW: i64 = 15;

/// How to cut a range into windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSizing {
    /// Count derived from the span length.
    Auto,
    /// A fixed number of windows; the last absorbs leftover days.
    Count(usize),
    /// Windows of a fixed length; the last is truncated to the range end.
    Days(u32),
}

/// A contiguous sub-range with its allocated share of the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub range: DateRange,
    pub target_count: usize,
}

/// Window count used by [`WindowSizing::Auto`].
pub fn auto_window_count(range: &DateRange) -> usize {
    (range.span_days() / AUTO_DAYS_PER_WINDOW).clamp(AUTO_MIN_WINDOWS, AUTO_MAX_WINDOWS) as usize
}

/// Split `range` into windows and spread `target` across them.
///
/// Windows are contiguous, never overlap, and together cover `range` exactly.
pub fn split(range: &DateRange, sizing: WindowSizing, target: usize) -> Vec<TimeWindow> {
    let total_days = range.total_days();

    let ranges = match sizing {
        WindowSizing::Auto => split_by_count(range, auto_window_count(range), total_days),
        WindowSizing::Count(count) => split_by_count(range, count, total_days),
        WindowSizing::Days(days) => split_by_length(range, i64::from(days.max(1))),
    };

    let targets = allocate_targets(target, ranges.len());
    ranges
        .into_iter()
        .zip(targets)
        .map(|(range, target_count)| TimeWindow {
            range,
            target_count,
        })
        .collect()
}

/// `target / n` each, with one extra for the first `target % n` windows.
pub fn allocate_targets(target: usize, windows: usize) -> Vec<usize> {
    if windows == 0 {
        return Vec::new();
    }
    let base = target / windows;
    let remainder = target % windows;
    (0..windows)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

fn split_by_count(range: &DateRange, count: usize, total_days: i64) -> Vec<DateRange> {
    let count = (count as i64).clamp(1, total_days);
    let days_per_window = total_days / count;

    (0..count)
        .map(|i| {
            let start = range.start + ChronoDuration::days(i * days_per_window);
            let end = if i == count - 1 {
                range.end
            } else {
                start + ChronoDuration::days(days_per_window - 1)
            };
            DateRange { start, end }
        })
        .collect()
}

fn split_by_length(range: &DateRange, days: i64) -> Vec<DateRange> {
    let mut windows = Vec::new();
    let mut start = range.start;

    while start <= range.end {
        let end = (start + ChronoDuration::days(days - 1)).min(range.end);
        windows.push(DateRange { start, end });
        start = end + ChronoDuration::days(1);
    }

    windows
}
