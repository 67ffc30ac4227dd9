//! Graph API Retry Logic and Error Classification
//!
//! リトライロジックとエラー分類

use reqwest::header::{HeaderMap, RETRY_AFTER};

// Throttling guidance: https://learn.microsoft.com/graph/throttling
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const INITIAL_RETRY_DELAY_MS: u64 = 1000; // 1 second
pub const MAX_RETRY_DELAY_MS: u64 = 32000; // 32 seconds max

/// Exponential backoff settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Retries without waiting (tests)
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    /// Calculate retry delay with exponential backoff
    pub fn delay_for(&self, retry_count: u32) -> u64 {
        if retry_count == 0 {
            return 0;
        }
        let factor = 1u64 << (retry_count - 1).min(20);
        std::cmp::min(self.initial_delay_ms.saturating_mul(factor), self.max_delay_ms)
    }

    /// Delay before the next attempt, preferring the server's Retry-After
    pub fn next_delay(&self, retry_count: u32, headers: Option<&HeaderMap>) -> u64 {
        headers
            .and_then(retry_after_ms)
            .map(|ms| ms.min(self.max_delay_ms))
            .unwrap_or_else(|| self.delay_for(retry_count))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay_ms: INITIAL_RETRY_DELAY_MS,
            max_delay_ms: MAX_RETRY_DELAY_MS,
        }
    }
}

/// Check if a status is worth retrying (throttling / transient server errors)
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Check if a transport error is worth retrying
pub fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout()
}

/// Parse `Retry-After: <seconds>` into milliseconds
pub fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_delay_first_retry() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), INITIAL_RETRY_DELAY_MS); // 1000ms
    }

    #[test]
    fn test_delay_grows_exponentially() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(2), INITIAL_RETRY_DELAY_MS * 2);
        assert_eq!(policy.delay_for(3), INITIAL_RETRY_DELAY_MS * 4);
    }

    #[test]
    fn test_delay_capped() {
        // Very high retry count should be capped at MAX_RETRY_DELAY_MS
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(10), MAX_RETRY_DELAY_MS);
        assert_eq!(policy.delay_for(64), MAX_RETRY_DELAY_MS);
    }

    #[test]
    fn test_delay_zero_retry() {
        assert_eq!(RetryPolicy::default().delay_for(0), 0);
    }

    #[test]
    fn test_immediate_policy() {
        let policy = RetryPolicy::immediate(2);
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.delay_for(3), 0);
    }

    #[test]
    fn test_retryable_statuses() {
        for status in [429, 500, 502, 503, 504] {
            assert!(is_retryable_status(status), "{} should be retryable", status);
        }
        for status in [200, 400, 401, 403, 404, 409, 413] {
            assert!(!is_retryable_status(status), "{} should not be retryable", status);
        }
    }

    #[test]
    fn test_retry_after_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after_ms(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("5"));
        assert_eq!(retry_after_ms(&headers), Some(5000));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(retry_after_ms(&headers), None);
    }

    #[test]
    fn test_next_delay_prefers_retry_after_but_caps_it() {
        let policy = RetryPolicy::default();
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("2"));
        assert_eq!(policy.next_delay(1, Some(&headers)), 2000);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("3600"));
        assert_eq!(policy.next_delay(1, Some(&headers)), MAX_RETRY_DELAY_MS);

        assert_eq!(policy.next_delay(2, None), 2000);
    }

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_MAX_RETRIES, 3);
        assert_eq!(INITIAL_RETRY_DELAY_MS, 1000);
        assert_eq!(MAX_RETRY_DELAY_MS, 32000);
    }
}
