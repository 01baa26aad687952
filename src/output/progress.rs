//! Progress bar utilities.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for item counts.
pub fn create_item_bar(total: u64, message: &str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    let template = format!(
        "{{spinner:.green}} {} [{{bar:40.cyan/blue}}] {{pos}}/{{len}}",
        message
    );
    if let Ok(bar_style) = ProgressStyle::default_bar().template(&template) {
        bar.set_style(bar_style.progress_chars("#>-"));
    }
    bar
}
