//! HTTP plumbing shared by the provider adapters: the default timeout and
//! translation of transport failures and error statuses into `ProviderError`.

use std::time::Duration;

use careerpath_core::error::ProviderError;
use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Retry-after assumed when a 429 carries no usable header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Per-call timeout until a provider is given the configured one.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Map a failed `send()` to a status-less provider error.
pub(crate) fn send_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(err.to_string())
    } else {
        ProviderError::Network(err.to_string())
    }
}

/// Seconds from a `Retry-After: <secs>` header.
pub(crate) fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Map a non-success status to the matching provider error.
pub(crate) fn error_for_status(status: u16, retry_after: Option<u64>, body: String) -> ProviderError {
    match status {
        429 => ProviderError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        503 => ProviderError::Unavailable(error_message(&body)),
        401 | 403 => ProviderError::AuthenticationFailed(
            "Invalid API key or insufficient permissions".into(),
        ),
        _ => ProviderError::ApiError {
            status_code: status,
            message: error_message(&body),
        },
    }
}

/// Pull `error.message` out of a JSON error body, or fall back to the raw text.
///
/// Both Google and OpenAI-style APIs use `{"error": {"message": ...}}`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            error_for_status(429, Some(12), String::new()),
            ProviderError::RateLimited { retry_after_secs: 12 }
        ));
        assert!(matches!(
            error_for_status(429, None, String::new()),
            ProviderError::RateLimited {
                retry_after_secs: DEFAULT_RETRY_AFTER_SECS
            }
        ));
        assert!(matches!(
            error_for_status(503, None, String::new()),
            ProviderError::Unavailable(_)
        ));
        assert!(matches!(
            error_for_status(403, None, String::new()),
            ProviderError::AuthenticationFailed(_)
        ));
        match error_for_status(400, None, "plain".into()) {
            ProviderError::ApiError {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 400);
                assert_eq!(message, "plain");
            }
            other => panic!("Expected ApiError, got: {other:?}"),
        }
    }

    #[test]
    fn google_error_body_message_extracted() {
        let body = r#"{"error":{"code":503,"message":"The model is overloaded.","status":"UNAVAILABLE"}}"#;
        match error_for_status(503, None, body.into()) {
            ProviderError::Unavailable(msg) => assert_eq!(msg, "The model is overloaded."),
            other => panic!("Expected Unavailable, got: {other:?}"),
        }
    }

    #[test]
    fn retry_after_header_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after_secs(&headers), None);
        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));
        assert_eq!(retry_after_secs(&headers), Some(30));
        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(retry_after_secs(&headers), None);
    }
}
