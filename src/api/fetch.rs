//! Rate-limit aware GET with backoff on HTTP 429.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};
use tokio::time::sleep;

use crate::error::{Error, Result};

/// Default number of attempts before a rate-limited request gives up.
pub const MAX_ATTEMPTS: u32 = 5;

/// Longest server-requested wait honoured after a 429.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(300);

/// Rate-limit counters reported by the API on every response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateLimitInfo {
    pub used: Option<f64>,
    pub remaining: Option<f64>,
    pub reset_seconds: Option<f64>,
}

impl RateLimitInfo {
    /// Read the `x-ratelimit-*` headers. Missing or garbled values are `None`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<f64>().ok())
        };

        Self {
            used: read("x-ratelimit-used"),
            remaining: read("x-ratelimit-remaining"),
            reset_seconds: read("x-ratelimit-reset"),
        }
    }

    fn log(&self, url: &str) {
        tracing::debug!(
            url,
            used = ?self.used,
            remaining = ?self.remaining,
            reset_seconds = ?self.reset_seconds,
            "rate limit"
        );
    }
}

/// Delay before the next attempt after a 429.
///
/// Uses the server's `retry-after` seconds when positive, capped at
/// [`MAX_RETRY_AFTER`], else `2 * (attempt + 1)`.
pub fn retry_delay(headers: &HeaderMap, attempt: u32) -> Duration {
    let server_delay = headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|secs| *secs > 0.0)
        .map(|secs| secs.min(MAX_RETRY_AFTER.as_secs_f64()))
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok());

    server_delay.unwrap_or_else(|| Duration::from_secs(2 * (u64::from(attempt) + 1)))
}

/// Issue a GET, sleeping and retrying while the server answers 429.
///
/// Any other non-success status fails immediately with [`Error::Http`].
pub async fn fetch_with_backoff(
    client: &Client,
    url: &str,
    headers: &HeaderMap,
    params: &[(&str, String)],
    max_attempts: u32,
) -> Result<Response> {
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;

    loop {
        tracing::debug!("GET {} {:?}", url, params);

        let response = client
            .get(url)
            .headers(headers.clone())
            .query(params)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);
        RateLimitInfo::from_headers(response.headers()).log(url);

        if status == StatusCode::TOO_MANY_REQUESTS {
            let delay = retry_delay(response.headers(), attempt);
            attempt += 1;

            if attempt >= max_attempts {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!("Still rate limited after {} attempts: {}", attempt, url);
                return Err(Error::Http {
                    status: status.as_u16(),
                    body,
                });
            }

            tracing::info!(
                "Rate limited, retrying in {:.1}s (attempt {}/{})",
                delay.as_secs_f64(),
                attempt,
                max_attempts
            );
            sleep(delay).await;
            continue;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        return Ok(response);
    }
}
