//! Output module for results, console output and progress.
//!
//! Provides:
//! - The `RecordSink` trait and its JSON file implementation
//! - Colored console output
//! - Progress bars
//! - Statistics reporting

pub mod console;
pub mod progress;
pub mod sink;
pub mod stats;

pub use console::{
    print_banner, print_config_summary, print_error, print_info, print_success, print_warning,
};
pub use progress::create_item_bar;
pub use sink::{JsonSink, RecordSink};
pub use stats::{print_run_summary, print_source_report};
