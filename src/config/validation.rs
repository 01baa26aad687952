//! Configuration validation logic.

use crate::collect::range::DateRange;
use crate::config::loader::Config;
use crate::error::{Error, Result};
use regex::Regex;
use url::Url;

/// Minimum length for an access token.
const MIN_TOKEN_LENGTH: usize = 10;

/// Minimum length for a user agent.
const MIN_USER_AGENT_LENGTH: usize = 5;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_token(&config.account.access_token)?;
    validate_user_agent(&config.account.user_agent)?;
    validate_subreddits(&config.collection.subreddits)?;
    DateRange::parse(&config.collection.start_date, &config.collection.end_date)?;
    validate_target(config.collection.posts_per_subreddit)?;
    validate_limits(config)?;
    validate_thresholds(config)?;
    config.windows.sizing()?;
    validate_endpoint("endpoints.api_base", &config.endpoints.api_base)?;
    validate_endpoint("endpoints.archive_url", &config.endpoints.archive_url)?;

    Ok(())
}

/// Validate the access token.
pub fn validate_token(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(Error::MissingConfig("access_token".to_string()));
    }

    if token.len() < MIN_TOKEN_LENGTH {
        return Err(Error::ConfigValidation {
            field: "access_token".to_string(),
            message: format!(
                "Token must be at least {} characters (got {})",
                MIN_TOKEN_LENGTH,
                token.len()
            ),
        });
    }

    let token_lower = token.to_lowercase();
    if token_lower.contains("replaceme") || token_lower.contains("your_token") {
        return Err(Error::ConfigValidation {
            field: "access_token".to_string(),
            message: "Token appears to be a placeholder. Please provide a real access token."
                .to_string(),
        });
    }

    Ok(())
}

/// Validate the user agent string.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.trim().is_empty() {
        return Err(Error::MissingConfig("user_agent".to_string()));
    }

    if user_agent.len() < MIN_USER_AGENT_LENGTH {
        return Err(Error::ConfigValidation {
            field: "user_agent".to_string(),
            message: format!(
                "User agent must be at least {} characters (got {})",
                MIN_USER_AGENT_LENGTH,
                user_agent.len()
            ),
        });
    }

    Ok(())
}

/// Strip an optional `r/` or `/r/` prefix from a subreddit name.
pub fn normalize_subreddit(name: &str) -> &str {
    let name = name.trim();
    name.strip_prefix("/r/")
        .or_else(|| name.strip_prefix("r/"))
        .unwrap_or(name)
}

/// Validate subreddit names.
pub fn validate_subreddits<S: AsRef<str>>(subreddits: &[S]) -> Result<()> {
    if subreddits.is_empty() {
        return Err(Error::MissingConfig(
            "subreddits (at least one subreddit required)".to_string(),
        ));
    }

    // Subreddit names: 2-21 chars, alphanumeric and underscores
    let pattern = Regex::new(r"^[A-Za-z0-9_]{2,21}$").map_err(|e| Error::Config(e.to_string()))?;

    for name in subreddits {
        let name = name.as_ref();
        if !pattern.is_match(normalize_subreddit(name)) {
            return Err(Error::ConfigValidation {
                field: "subreddits".to_string(),
                message: format!(
                    "Subreddit '{}' is not a valid name. Use 2-21 letters, digits or underscores.",
                    name
                ),
            });
        }
    }

    Ok(())
}

/// Validate the per-subreddit target.
pub fn validate_target(target: usize) -> Result<()> {
    if target == 0 {
        return Err(Error::ConfigValidation {
            field: "posts_per_subreddit".to_string(),
            message: "Target post count must be greater than zero".to_string(),
        });
    }
    Ok(())
}

fn validate_limits(config: &Config) -> Result<()> {
    let limits = &config.limits;
    let checks = [
        ("limits.max_pages", limits.max_pages as u64),
        ("limits.max_search_pages", limits.max_search_pages as u64),
        ("limits.max_attempts", u64::from(limits.max_attempts)),
        ("limits.request_timeout_seconds", limits.request_timeout_seconds),
    ];

    for (field, value) in checks {
        if value == 0 {
            return Err(Error::ConfigValidation {
                field: field.to_string(),
                message: "Must be greater than zero".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_thresholds(config: &Config) -> Result<()> {
    let t = &config.thresholds;

    if t.windowed_above_days < 0 {
        return Err(Error::ConfigValidation {
            field: "thresholds.windowed_above_days".to_string(),
            message: "Must not be negative".to_string(),
        });
    }

    let fractions = [
        ("thresholds.flat_search_below", t.flat_search_below),
        ("thresholds.flat_archive_below", t.flat_archive_below),
        ("thresholds.window_archive_below", t.window_archive_below),
        ("thresholds.topup_search_below", t.topup_search_below),
        ("thresholds.topup_listing_below", t.topup_listing_below),
    ];

    for (field, value) in fractions {
        if !(0.0..=1.0).contains(&value) {
            return Err(Error::ConfigValidation {
                field: field.to_string(),
                message: format!("Must be a fraction between 0 and 1 (got {})", value),
            });
        }
    }
    Ok(())
}

/// Validate an endpoint URL.
pub fn validate_endpoint(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!("Unsupported URL scheme '{}'", url.scheme()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.account.access_token = "0123456789abcdef".to_string();
        config.collection.subreddits = vec!["politics".to_string()];
        config.collection.start_date = "2025-01-01".to_string();
        config.collection.end_date = "2025-07-01".to_string();
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_valid_subreddits() {
        assert!(validate_subreddits(&["politics", "r/PoliticalDiscussion", "ask_science"]).is_ok());
    }

    #[test]
    fn test_invalid_subreddits() {
        assert!(validate_subreddits::<&str>(&[]).is_err());
        assert!(validate_subreddits(&["a"]).is_err());
        assert!(validate_subreddits(&["has space"]).is_err());
        assert!(validate_subreddits(&["way_too_long_subreddit_name"]).is_err());
    }

    #[test]
    fn test_normalize_subreddit() {
        assert_eq!(normalize_subreddit("r/rust"), "rust");
        assert_eq!(normalize_subreddit("/r/rust"), "rust");
        assert_eq!(normalize_subreddit(" rust "), "rust");
    }

    #[test]
    fn test_missing_token() {
        let mut config = valid_config();
        config.account.access_token.clear();
        assert!(matches!(
            validate_config(&config),
            Err(Error::MissingConfig(_))
        ));
    }

    #[test]
    fn test_placeholder_token() {
        assert!(validate_token("REPLACEME_PLEASE").is_err());
    }

    #[test]
    fn test_reversed_dates_rejected() {
        let mut config = valid_config();
        config.collection.start_date = "2025-02-01".to_string();
        config.collection.end_date = "2025-01-01".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut config = valid_config();
        config.thresholds.flat_search_below = 1.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_target_rejected() {
        let mut config = valid_config();
        config.collection.posts_per_subreddit = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_endpoint_scheme() {
        assert!(validate_endpoint("api", "https://oauth.reddit.com").is_ok());
        assert!(validate_endpoint("api", "ftp://example.com").is_err());
        assert!(validate_endpoint("api", "not a url").is_err());
    }
}
