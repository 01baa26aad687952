//! Window sizing mode definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a long date range is cut into sub-windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    /// Pick a window count from the span length (default).
    #[default]
    Auto,
    /// A fixed number of windows.
    Count,
    /// Windows of a fixed number of days.
    #[serde(alias = "weekly")]
    Days,
}

impl fmt::Display for WindowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowMode::Auto => write!(f, "auto"),
            WindowMode::Count => write!(f, "count"),
            WindowMode::Days => write!(f, "days"),
        }
    }
}

impl FromStr for WindowMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(WindowMode::Auto),
            "count" => Ok(WindowMode::Count),
            "days" | "weekly" => Ok(WindowMode::Days),
            _ => Err(format!("Unknown window mode: {}", s)),
        }
    }
}
