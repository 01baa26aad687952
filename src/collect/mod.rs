//! Post collection.
//!
//! This module handles:
//! - Date ranges and normalized records
//! - The listing, search and archive strategies
//! - Splitting long ranges into windows
//! - The threshold cascade between strategies
//! - Per-source orchestration and reporting

pub mod archive;
pub mod cascade;
pub mod listing;
pub mod orchestrator;
pub mod range;
pub mod record;
pub mod report;
pub mod search;
pub mod strategy;
pub mod window;
pub mod windowed;

pub use orchestrator::{collect_source, run, RunSettings, SourceOutcome};
pub use range::DateRange;
pub use record::{EnrichedRecord, Record};
pub use report::{CollectionReport, RunSummary, SourceStats, WindowReport};
pub use strategy::{Collector, StrategyKind, StrategyOptions, StrategyRunner};
pub use window::{split, TimeWindow, WindowSizing};
