//! API error response mapping.
//!
//! The relay reports failures as a small JSON document. Depending on which
//! layer rejected the request the explanation lives under `reason`,
//! `message`, or the OAuth style `error` / `error_description` pair:
//!
//! ```json
//! {
//!   "reason": "recipient domain is not permitted",
//!   "request_id": "2a3b4c5d"
//! }
//! ```

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::SerError;

/// Error body returned by the SER API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorResponse {
    /// Reason reported by the send endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Generic message field.
    #[serde(default, alias = "Message", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// OAuth style error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// OAuth style error description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,

    /// Request ID for support tickets.
    #[serde(
        default,
        alias = "requestId",
        alias = "RequestId",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_id: Option<String>,
}

impl ApiErrorResponse {
    /// The most specific human-readable explanation in the body.
    pub fn explanation(&self) -> Option<&str> {
        [
            &self.reason,
            &self.message,
            &self.error_description,
            &self.error,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .find(|s| !s.trim().is_empty())
    }
}

/// Parse an error body.
///
/// # Errors
///
/// Returns [`SerError::Serialization`] if the body is not a JSON object.
///
/// ```rust
/// use integrations_ser_mail::error::parse_error_response;
///
/// let parsed = parse_error_response(r#"{"reason": "bad sender", "request_id": "r-1"}"#).unwrap();
/// assert_eq!(parsed.explanation(), Some("bad sender"));
/// assert_eq!(parsed.request_id.as_deref(), Some("r-1"));
/// ```
pub fn parse_error_response(body: &str) -> Result<ApiErrorResponse, SerError> {
    Ok(serde_json::from_str(body)?)
}

/// Map a non-success response to a [`SerError`].
///
/// - `429` → [`SerError::RateLimited`]
/// - `401`, `403` → [`SerError::Authentication`]
/// - `400`, `413`, `422` → [`SerError::Validation`]
/// - `502`, `503`, `504` → retryable [`SerError::Api`]
/// - anything else → non-retryable [`SerError::Api`]
///
/// `header_request_id` is used when the body does not carry a request ID.
pub fn map_api_error(
    status: StatusCode,
    body: &[u8],
    header_request_id: Option<String>,
    retry_after: Option<Duration>,
) -> SerError {
    let text = String::from_utf8_lossy(body);
    let parsed = parse_error_response(&text).unwrap_or_default();

    let reason = parsed
        .explanation()
        .map(str::to_string)
        .or_else(|| {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    let request_id = parsed.request_id.clone().or(header_request_id);

    match status.as_u16() {
        429 => SerError::RateLimited {
            message: reason,
            retry_after,
        },
        401 | 403 => SerError::Authentication {
            message: reason,
            status: Some(status.as_u16()),
        },
        400 | 413 | 422 => SerError::Validation {
            message: reason,
            field: None,
        },
        code => SerError::Api {
            status: code,
            reason,
            request_id,
            retryable: matches!(code, 502..=504),
        },
    }
}

/// Parse a `Retry-After` header given in delta-seconds.
pub(crate) fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reason_body() {
        let body = r#"{"reason": "Sender not permitted", "request_id": "abc"}"#;
        let parsed = parse_error_response(body).unwrap();
        assert_eq!(parsed.explanation(), Some("Sender not permitted"));
        assert_eq!(parsed.request_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_parse_oauth_body() {
        let body = r#"{"error": "invalid_token", "error_description": "Token expired"}"#;
        let parsed = parse_error_response(body).unwrap();
        assert_eq!(parsed.explanation(), Some("Token expired"));
    }

    #[test]
    fn test_blank_fields_are_skipped() {
        let parsed = parse_error_response(r#"{"reason": "", "message": "real"}"#).unwrap();
        assert_eq!(parsed.explanation(), Some("real"));

        let parsed = parse_error_response(r#"{"reason": "  ", "error": "invalid_client"}"#).unwrap();
        assert_eq!(parsed.explanation(), Some("invalid_client"));

        let err = map_api_error(
            StatusCode::BAD_REQUEST,
            br#"{"reason": "", "message": "real"}"#,
            None,
            None,
        );
        assert_eq!(err.to_string(), "Validation error: real");
    }

    #[test]
    fn test_map_rate_limited() {
        let err = map_api_error(
            StatusCode::TOO_MANY_REQUESTS,
            br#"{"reason": "slow down"}"#,
            None,
            Some(Duration::from_secs(5)),
        );
        assert!(matches!(err, SerError::RateLimited { .. }));
        assert_eq!(err.retry_after(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_map_unauthorized() {
        let err = map_api_error(StatusCode::UNAUTHORIZED, b"", None, None);
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Authentication error: Unauthorized");
    }

    #[test]
    fn test_map_validation() {
        let err = map_api_error(
            StatusCode::BAD_REQUEST,
            br#"{"reason": "At least one recipient required"}"#,
            None,
            None,
        );
        match err {
            SerError::Validation { message, .. } => {
                assert_eq!(message, "At least one recipient required")
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_map_gateway_is_retryable() {
        let err = map_api_error(StatusCode::SERVICE_UNAVAILABLE, b"down", Some("hdr-1".into()), None);
        assert!(err.is_retryable());
        assert_eq!(err.request_id(), Some("hdr-1"));
        assert_eq!(err.to_string(), "API error 503: down");
    }

    #[test]
    fn test_map_internal_error_not_retryable() {
        let err = map_api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"message": "oops", "request_id": "body-id"}"#,
            Some("hdr-id".into()),
            None,
        );
        assert!(!err.is_retryable());
        assert_eq!(err.request_id(), Some("body-id"));
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after("120"), Some(Duration::from_secs(120)));
        assert_eq!(parse_retry_after(" 3 "), Some(Duration::from_secs(3)));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }
}
