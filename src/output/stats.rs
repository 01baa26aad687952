//! Statistics reporting.

use console::style;

use crate::collect::report::{CollectionReport, RunSummary};
use crate::collect::strategy::StrategyKind;

/// Print statistics for a single subreddit.
pub fn print_source_report(report: &CollectionReport) {
    println!();
    println!(
        "{}",
        style(format!("Statistics for r/{}:", report.source)).bold()
    );

    if let Some(error) = &report.error {
        println!("  Failed:     {}", style(error).red());
        return;
    }

    println!(
        "  Collected:  {}/{} ({})",
        report.collected_count,
        report.target_count,
        coverage_style(report.coverage_percent)
    );
    println!("  Methods:    {}", join_methods(report.methods_used.iter()));
    println!("  Text posts: {}", report.stats.text_posts);
    println!("  Link posts: {}", report.stats.link_posts);
    println!("  Days:       {} with posts", report.stats.unique_dates);
    if let (Some(earliest), Some(latest)) = (report.stats.earliest, report.stats.latest) {
        println!("  Span:       {} to {}", earliest, latest);
    }
    println!("  Commented:  {}", report.stats.posts_with_comments);

    if let Some(windows) = &report.per_window_breakdown {
        println!("  Windows:");
        for window in windows {
            println!(
                "    {}  {:>5}/{:<5} {}  [{}]",
                window.window,
                window.actual,
                window.target,
                coverage_style(window.coverage_percent),
                join_methods(window.methods_used.iter())
            );
        }
    }

    if let Some(path) = &report.artifact {
        println!("  Saved to:   {}", path.display());
    }
}

/// Print totals across all subreddits.
pub fn print_run_summary(summary: &RunSummary) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Run Summary:").bold());
    println!("  Subreddits processed: {}", summary.sources_processed);
    if summary.sources_failed > 0 {
        println!(
            "  Subreddits failed:    {}",
            style(summary.sources_failed).red()
        );
    }
    println!("  Date range: {}", summary.date_range);
    println!("  Posts:      {}", summary.total_records);
    println!("  Runtime:    {}", summary.runtime.formatted);
    println!("  Rate:       {:.1} posts/min", summary.posts_per_minute);
    if summary.total_records > 0 {
        println!(
            "  Average:    {:.2}s per post",
            summary.average_seconds_per_post
        );
    }
    println!("  Files:      {}", summary.artifacts.len());
    println!("{}", style("═".repeat(50)).dim());
}

fn coverage_style(percent: f64) -> console::StyledObject<String> {
    let text = format!("{:.1}%", percent);
    if percent >= 100.0 {
        style(text).green()
    } else if percent >= 50.0 {
        style(text).yellow()
    } else {
        style(text).red()
    }
}

fn join_methods<'a>(methods: impl Iterator<Item = &'a StrategyKind>) -> String {
    let names: Vec<&str> = methods.map(StrategyKind::as_str).collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
