//! Failures talking to the GitHub REST API.
//!
//! GitHub answers errors with `{"message": "...", "documentation_url": "..."}`;
//! that message is what users need to see ("Bad credentials", "Not Found",
//! "API rate limit exceeded for ..."), so it is lifted out of the body rather
//! than echoing raw JSON.

use std::{error::Error as StdError, fmt};

use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use super::models::ApiErrorDto;

const BODY_PREVIEW_LIMIT: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GithubHttpErrorKind {
    Timeout,
    Connect,
    /// Failure while sending or streaming, after the connection was made.
    Transport,
    /// 401: missing, expired or revoked token.
    Unauthorized,
    /// 404, which GitHub also returns for private repositories without access.
    NotFound,
    /// Primary or secondary rate limit.
    RateLimited,
    /// Any other non-2xx answer.
    Api,
    /// 2xx with a body that is not the expected JSON.
    Decode,
}

impl GithubHttpErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Transport => "transport",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not found",
            Self::RateLimited => "rate limited",
            Self::Api => "api error",
            Self::Decode => "unexpected response",
        }
    }

    fn from_status(status: StatusCode, headers: &HeaderMap) -> Self {
        let quota_spent = headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "0");
        match status.as_u16() {
            401 => Self::Unauthorized,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            403 if quota_spent || headers.contains_key("retry-after") => Self::RateLimited,
            _ => Self::Api,
        }
    }
}

impl fmt::Display for GithubHttpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct GithubHttpError {
    kind: GithubHttpErrorKind,
    status: Option<u16>,
    url: String,
    message: String,
    documentation_url: Option<String>,
    /// Epoch seconds from `x-ratelimit-reset`.
    rate_limit_reset: Option<u64>,
    source: Option<anyhow::Error>,
}

impl GithubHttpError {
    pub fn kind(&self) -> GithubHttpErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// GitHub's own explanation, or a preview of the body when it sent none.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn documentation_url(&self) -> Option<&str> {
        self.documentation_url.as_deref()
    }

    pub fn rate_limit_reset(&self) -> Option<u64> {
        self.rate_limit_reset
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        let kind = if err.is_timeout() {
            GithubHttpErrorKind::Timeout
        } else if err.is_connect() {
            GithubHttpErrorKind::Connect
        } else if err.is_decode() {
            GithubHttpErrorKind::Decode
        } else {
            GithubHttpErrorKind::Transport
        };
        GithubHttpError {
            kind,
            status: err.status().map(|s| s.as_u16()),
            url: url.to_string(),
            message: err.to_string(),
            documentation_url: None,
            rate_limit_reset: None,
            source: Some(anyhow::Error::new(err)),
        }
    }

    /// Build from a non-2xx answer: status, headers and the (already read) body.
    pub(crate) fn from_response(
        status: StatusCode,
        headers: &HeaderMap,
        url: &str,
        body: &str,
    ) -> Self {
        let (message, documentation_url) = match serde_json::from_str::<ApiErrorDto>(body) {
            Ok(api) => (api.message, api.documentation_url),
            Err(_) => (preview_body(body), None),
        };
        let rate_limit_reset = headers
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        GithubHttpError {
            kind: GithubHttpErrorKind::from_status(status, headers),
            status: Some(status.as_u16()),
            url: url.to_string(),
            message,
            documentation_url,
            rate_limit_reset,
            source: None,
        }
    }

    pub(crate) fn decode(
        status: StatusCode,
        url: &str,
        err: serde_json::Error,
        body: &str,
    ) -> Self {
        GithubHttpError {
            kind: GithubHttpErrorKind::Decode,
            status: Some(status.as_u16()),
            url: url.to_string(),
            message: format!("{err} (body: {})", preview_body(body)),
            documentation_url: None,
            rate_limit_reset: None,
            source: Some(anyhow::Error::new(err)),
        }
    }
}

impl fmt::Display for GithubHttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "GitHub {} ({status}) for {}", self.kind, self.url)?,
            None => write!(f, "GitHub {} for {}", self.kind, self.url)?,
        }
        write!(f, ": {}", self.message)?;
        if let Some(reset) = self.rate_limit_reset {
            if self.kind == GithubHttpErrorKind::RateLimited {
                write!(f, "; quota resets at epoch {reset}")?;
            }
        }
        if self.kind == GithubHttpErrorKind::Unauthorized {
            f.write_str("; check the token (--token, GITHUB_TOKEN or token file)")?;
        }
        Ok(())
    }
}

impl StdError for GithubHttpError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

pub(crate) fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().nth(BODY_PREVIEW_LIMIT).is_some() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn lifts_github_message_out_of_the_body() {
        let err = GithubHttpError::from_response(
            StatusCode::UNAUTHORIZED,
            &HeaderMap::new(),
            "https://api.github.com/repos/a/b/pulls/1",
            r#"{"message":"Bad credentials","documentation_url":"https://docs.github.com/rest"}"#,
        );
        assert_eq!(err.kind(), GithubHttpErrorKind::Unauthorized);
        assert_eq!(err.message(), "Bad credentials");
        assert_eq!(err.documentation_url(), Some("https://docs.github.com/rest"));
        assert_eq!(
            err.to_string(),
            "GitHub unauthorized (401) for https://api.github.com/repos/a/b/pulls/1: \
             Bad credentials; check the token (--token, GITHUB_TOKEN or token file)"
        );
    }

    #[test]
    fn exhausted_quota_on_403_is_rate_limited() {
        let err = GithubHttpError::from_response(
            StatusCode::FORBIDDEN,
            &headers(&[("x-ratelimit-remaining", "0"), ("x-ratelimit-reset", "1700000000")]),
            "u",
            r#"{"message":"API rate limit exceeded for 1.2.3.4."}"#,
        );
        assert_eq!(err.kind(), GithubHttpErrorKind::RateLimited);
        assert_eq!(err.rate_limit_reset(), Some(1_700_000_000));
        assert!(err.to_string().ends_with("; quota resets at epoch 1700000000"));

        let plain = GithubHttpError::from_response(
            StatusCode::FORBIDDEN,
            &headers(&[("x-ratelimit-remaining", "4999")]),
            "u",
            r#"{"message":"Resource not accessible by integration"}"#,
        );
        assert_eq!(plain.kind(), GithubHttpErrorKind::Api);
    }

    #[test]
    fn non_json_body_falls_back_to_preview() {
        let err = GithubHttpError::from_response(
            StatusCode::BAD_GATEWAY,
            &HeaderMap::new(),
            "u",
            "  <html>upstream timeout</html>\n",
        );
        assert_eq!(err.kind(), GithubHttpErrorKind::Api);
        assert_eq!(err.message(), "<html>upstream timeout</html>");
    }

    #[test]
    fn preview_is_bounded() {
        assert_eq!(preview_body("  "), "<empty body>");
        let long = "x".repeat(BODY_PREVIEW_LIMIT + 10);
        let preview = preview_body(&long);
        assert_eq!(preview.len(), BODY_PREVIEW_LIMIT + 3);
        assert!(preview.ends_with("..."));
        assert_eq!(preview_body("short"), "short");
    }
}
