//! Credential session for authenticated API requests.

use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::error::{Error, Result};

/// A pre-acquired bearer token plus the user agent it was issued for.
///
/// Built once per run and handed to the API client. The token is never
/// refreshed mid-run.
#[derive(Clone)]
pub struct Session {
    token: String,
    user_agent: String,
}

impl Session {
    /// Create a session from an access token and user agent.
    pub fn new(token: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_agent: user_agent.into(),
        }
    }

    /// The user agent sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Build the `Authorization` and `User-Agent` headers.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let auth = HeaderValue::from_str(&format!("bearer {}", self.token)).map_err(|_| {
            Error::ConfigValidation {
                field: "access_token".to_string(),
                message: "Token contains characters not allowed in a header".to_string(),
            }
        })?;
        let agent = HeaderValue::from_str(&self.user_agent).map_err(|_| {
            Error::ConfigValidation {
                field: "user_agent".to_string(),
                message: "User agent contains characters not allowed in a header".to_string(),
            }
        })?;

        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(header::USER_AGENT, agent);

        Ok(headers)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
