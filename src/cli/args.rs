//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, PacingConfig, WindowMode};

/// Subreddit post collector CLI.
#[derive(Parser, Debug)]
#[command(
    name = "subreddit-harvester",
    version,
    about = "Collect Reddit posts from a date range",
    long_about = "A CLI tool to collect posts from one or more subreddits within a date range.\n\n\
                  Combines the new listing, keyword search and a historical archive, and can \
                  attach a sample of comments to every post."
)]
pub struct Args {
    /// Subreddit(s) to collect from.
    /// Can specify multiple names separated by spaces.
    #[arg(short, long, value_delimiter = ' ', num_args = 1..)]
    pub subreddit: Option<Vec<String>>,

    /// First day to collect (YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<String>,

    /// Last day to collect (YYYY-MM-DD).
    #[arg(long)]
    pub end: Option<String>,

    /// Posts to collect per subreddit.
    #[arg(short = 'n', long)]
    pub target: Option<usize>,

    /// Comment samples per post (0 disables).
    #[arg(long)]
    pub comments: Option<usize>,

    /// OAuth bearer token.
    #[arg(short, long, env = "REDDIT_ACCESS_TOKEN")]
    pub token: Option<String>,

    /// User agent registered with the API application.
    #[arg(short = 'a', long = "user-agent", env = "REDDIT_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Directory for output files.
    #[arg(short = 'o', long = "output")]
    pub output_directory: Option<PathBuf>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// How long ranges are split into windows.
    #[arg(long, value_enum)]
    pub window_mode: Option<WindowModeArg>,

    /// Window count (count mode) or length in days (days mode).
    #[arg(long)]
    pub window_value: Option<u32>,

    /// Disable all courtesy delays between requests.
    #[arg(long)]
    pub no_pacing: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI window mode argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WindowModeArg {
    /// Window count derived from the range length.
    Auto,
    /// A fixed number of windows.
    Count,
    /// Windows of a fixed number of days.
    Days,
}

impl From<WindowModeArg> for WindowMode {
    fn from(arg: WindowModeArg) -> Self {
        match arg {
            WindowModeArg::Auto => WindowMode::Auto,
            WindowModeArg::Count => WindowMode::Count,
            WindowModeArg::Days => WindowMode::Days,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(subreddits) = self.subreddit {
            config.collection.subreddits = subreddits;
        }

        if let Some(start) = self.start {
            config.collection.start_date = start;
        }

        if let Some(end) = self.end {
            config.collection.end_date = end;
        }

        if let Some(target) = self.target {
            config.collection.posts_per_subreddit = target;
        }

        if let Some(comments) = self.comments {
            config.collection.comments_per_post = Some(comments);
        }

        if let Some(token) = self.token {
            config.account.access_token = token;
        }

        if let Some(user_agent) = self.user_agent {
            config.account.user_agent = user_agent;
        }

        if let Some(dir) = self.output_directory {
            config.collection.output_directory = dir;
        }

        if let Some(mode) = self.window_mode {
            config.windows.mode = mode.into();
        }

        if let Some(value) = self.window_value {
            config.windows.value = Some(value);
        }

        if self.no_pacing {
            config.pacing = PacingConfig::none();
        }
    }
}
