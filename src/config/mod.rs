//! Configuration module for the subreddit-harvester.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Window sizing modes
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{
    AccountConfig, CollectionConfig, Config, EndpointsConfig, LimitsConfig, PacingConfig,
    ThresholdsConfig, WindowsConfig,
};
pub use modes::WindowMode;
pub use validation::{normalize_subreddit, validate_config};
