//! Rate-limit header parsing
//!
//! The remote communicates quota state via `X-RateLimit-Remaining` and
//! `X-RateLimit-Reset` (epoch seconds) response headers. A zero-remaining
//! signal is a hard stop for the current batch, never a retryable error.

use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::HeaderMap;
use tracing::warn;

/// Header carrying the number of requests left in the current window
const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Header carrying the window reset time as Unix epoch seconds
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Parsed rate-limit state from a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Requests remaining in the current window, if the header was present
    /// and parseable
    pub remaining: Option<u64>,
    /// When the window resets, if the header was present and parseable
    pub reset_at: Option<DateTime<Utc>>,
}

impl RateLimitStatus {
    /// Extracts rate-limit state from response headers.
    ///
    /// Unparseable values are logged and treated as absent rather than
    /// failing the request.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let remaining = headers
            .get(REMAINING_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| match v.trim().parse::<u64>() {
                Ok(n) => Some(n),
                Err(_) => {
                    warn!(value = v, "Unparseable {} header", REMAINING_HEADER);
                    None
                }
            });

        let reset_at = headers
            .get(RESET_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| match v.trim().parse::<i64>() {
                Ok(epoch) => Utc.timestamp_opt(epoch, 0).single(),
                Err(_) => {
                    warn!(value = v, "Unparseable {} header", RESET_HEADER);
                    None
                }
            });

        Self { remaining, reset_at }
    }

    /// True when the remote reported zero requests remaining.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                name.parse::<HeaderName>().unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_parses_remaining_and_reset() {
        let map = headers(&[
            ("x-ratelimit-remaining", "42"),
            ("x-ratelimit-reset", "1767225600"),
        ]);
        let status = RateLimitStatus::from_headers(&map);

        assert_eq!(status.remaining, Some(42));
        assert_eq!(
            status.reset_at.unwrap(),
            Utc.timestamp_opt(1767225600, 0).single().unwrap()
        );
        assert!(!status.is_exhausted());
    }

    #[test]
    fn test_zero_remaining_is_exhausted() {
        let map = headers(&[("x-ratelimit-remaining", "0")]);
        let status = RateLimitStatus::from_headers(&map);
        assert!(status.is_exhausted());
        assert!(status.reset_at.is_none());
    }

    #[test]
    fn test_missing_headers() {
        let status = RateLimitStatus::from_headers(&HeaderMap::new());
        assert_eq!(status.remaining, None);
        assert_eq!(status.reset_at, None);
        assert!(!status.is_exhausted());
    }

    #[test]
    fn test_garbage_values_treated_as_absent() {
        let map = headers(&[
            ("x-ratelimit-remaining", "lots"),
            ("x-ratelimit-reset", "soon"),
        ]);
        let status = RateLimitStatus::from_headers(&map);
        assert_eq!(status.remaining, None);
        assert_eq!(status.reset_at, None);
    }
}
