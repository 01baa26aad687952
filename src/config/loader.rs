//! Configuration structures and loading logic.

use crate::collect::window::WindowSizing;
use crate::config::modes::WindowMode;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub collection: CollectionConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub thresholds: ThresholdsConfig,

    #[serde(default)]
    pub windows: WindowsConfig,

    #[serde(default)]
    pub pacing: PacingConfig,

    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

/// Account credentials configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Pre-acquired OAuth bearer token.
    #[serde(default)]
    pub access_token: String,

    /// User agent registered with the API application.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            user_agent: default_user_agent(),
        }
    }
}

/// What to collect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Subreddits to collect from, processed in order.
    #[serde(default)]
    pub subreddits: Vec<String>,

    /// First day of the range (`YYYY-MM-DD`, inclusive).
    #[serde(default)]
    pub start_date: String,

    /// Last day of the range (`YYYY-MM-DD`, inclusive).
    #[serde(default)]
    pub end_date: String,

    /// Target post count per subreddit.
    #[serde(default = "default_posts_per_subreddit")]
    pub posts_per_subreddit: usize,

    /// Number of comment samples per post. Absent or 0 disables comments.
    #[serde(default)]
    pub comments_per_post: Option<usize>,

    /// Directory for output files.
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            subreddits: Vec::new(),
            start_date: String::new(),
            end_date: String::new(),
            posts_per_subreddit: default_posts_per_subreddit(),
            comments_per_post: None,
            output_directory: default_output_directory(),
        }
    }
}

/// Ceilings on the amount of work a single strategy may do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Pages pulled from the chronological listing.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Pages pulled per search query variant.
    #[serde(default = "default_max_search_pages")]
    pub max_search_pages: usize,

    /// Attempts per request while rate limited.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Per-request timeout.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            max_search_pages: default_max_search_pages(),
            max_attempts: default_max_attempts(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Fallback cascade thresholds, as fractions of the target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    /// Ranges spanning more days than this are collected in windows.
    #[serde(default = "default_windowed_above_days")]
    pub windowed_above_days: i64,

    /// Flat path: search runs below this share of the target.
    #[serde(default = "default_flat_search_below")]
    pub flat_search_below: f64,

    /// Flat path: archive runs below this share of the target.
    #[serde(default = "default_half")]
    pub flat_archive_below: f64,

    /// Windowed path: archive runs below this share of a window's target.
    #[serde(default = "default_half")]
    pub window_archive_below: f64,

    /// After windowing: whole-range search runs below this share.
    #[serde(default = "default_half")]
    pub topup_search_below: f64,

    /// After windowing: whole-range listing runs below this share.
    #[serde(default = "default_topup_listing_below")]
    pub topup_listing_below: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            windowed_above_days: default_windowed_above_days(),
            flat_search_below: default_flat_search_below(),
            flat_archive_below: default_half(),
            window_archive_below: default_half(),
            topup_search_below: default_half(),
            topup_listing_below: default_topup_listing_below(),
        }
    }
}

/// Window length used by `days` mode when no value is given.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Sub-window sizing for long ranges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowsConfig {
    #[serde(default)]
    pub mode: WindowMode,

    /// Window count (`count`) or length in days (`days`, default 7). Ignored for `auto`.
    #[serde(default)]
    pub value: Option<u32>,
}

impl WindowsConfig {
    /// Resolve the configured mode into a planner sizing.
    pub fn sizing(&self) -> Result<WindowSizing> {
        match (self.mode, self.value) {
            (WindowMode::Auto, _) => Ok(WindowSizing::Auto),
            (WindowMode::Count, Some(n)) if n > 0 => Ok(WindowSizing::Count(n as usize)),
            (WindowMode::Days, None) => Ok(WindowSizing::Days(DEFAULT_WINDOW_DAYS)),
            (WindowMode::Days, Some(n)) if n > 0 => Ok(WindowSizing::Days(n)),
            (mode, _) => Err(Error::ConfigValidation {
                field: "windows.value".to_string(),
                message: format!("A positive value is required for window mode '{}'", mode),
            }),
        }
    }
}

/// Courtesy delays between requests, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_page_delay")]
    pub page_delay_ms: u64,

    #[serde(default = "default_variant_delay")]
    pub variant_delay_ms: u64,

    #[serde(default = "default_window_delay")]
    pub window_delay_ms: u64,

    #[serde(default = "default_source_delay")]
    pub source_delay_ms: u64,

    #[serde(default = "default_comment_delay")]
    pub comment_delay_ms: u64,

    /// Longer pause taken every 20 comment fetches.
    #[serde(default = "default_comment_batch_pause")]
    pub comment_batch_pause_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: default_page_delay(),
            variant_delay_ms: default_variant_delay(),
            window_delay_ms: default_window_delay(),
            source_delay_ms: default_source_delay(),
            comment_delay_ms: default_comment_delay(),
            comment_batch_pause_ms: default_comment_batch_pause(),
        }
    }
}

impl PacingConfig {
    /// No delays at all.
    pub fn none() -> Self {
        Self {
            page_delay_ms: 0,
            variant_delay_ms: 0,
            window_delay_ms: 0,
            source_delay_ms: 0,
            comment_delay_ms: 0,
            comment_batch_pause_ms: 0,
        }
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn variant_delay(&self) -> Duration {
        Duration::from_millis(self.variant_delay_ms)
    }

    pub fn window_delay(&self) -> Duration {
        Duration::from_millis(self.window_delay_ms)
    }

    pub fn source_delay(&self) -> Duration {
        Duration::from_millis(self.source_delay_ms)
    }

    pub fn comment_delay(&self) -> Duration {
        Duration::from_millis(self.comment_delay_ms)
    }

    pub fn comment_batch_pause(&self) -> Duration {
        Duration::from_millis(self.comment_batch_pause_ms)
    }
}

/// Remote endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Base URL of the authenticated API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Historical archive search endpoint.
    #[serde(default = "default_archive_url")]
    pub archive_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            archive_url: default_archive_url(),
        }
    }
}

fn default_user_agent() -> String {
    format!("subreddit-harvester/{}", env!("CARGO_PKG_VERSION"))
}

fn default_posts_per_subreddit() -> usize {
    1000
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("harvest_data")
}

fn default_max_pages() -> usize {
    100
}

fn default_max_search_pages() -> usize {
    20
}

fn default_max_attempts() -> u32 {
    crate::api::fetch::MAX_ATTEMPTS
}

fn default_request_timeout() -> u64 {
    30
}

fn default_windowed_above_days() -> i64 {
    30
}

fn default_flat_search_below() -> f64 {
    0.8
}

fn default_half() -> f64 {
    0.5
}

fn default_topup_listing_below() -> f64 {
    0.3
}

fn default_page_delay() -> u64 {
    100
}

fn default_variant_delay() -> u64 {
    500
}

fn default_window_delay() -> u64 {
    500
}

fn default_source_delay() -> u64 {
    2000
}

fn default_comment_delay() -> u64 {
    200
}

fn default_comment_batch_pause() -> u64 {
    1000
}

fn default_api_base() -> String {
    "https://oauth.reddit.com".to_string()
}

fn default_archive_url() -> String {
    "https://api.pushshift.io/reddit/search/submission/".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Number of comment samples per post, if enabled.
    pub fn comment_samples(&self) -> Option<usize> {
        self.collection.comments_per_post.filter(|n| *n > 0)
    }
}
