//! HTTP response handling for the SER API.

use http::StatusCode;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{map_api_error, parse_retry_after, SerError, SerResult};

/// Headers that may carry a request ID, in lookup order.
const REQUEST_ID_HEADERS: [&str; 3] = ["x-request-id", "x-amzn-requestid", "x-correlation-id"];

/// A response from the SER API.
///
/// Header names are stored lowercase.
#[derive(Debug, Clone)]
pub struct SerResponse {
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl SerResponse {
    /// Create a new response.
    ///
    /// ```rust
    /// use http::StatusCode;
    /// use integrations_ser_mail::http::SerResponse;
    /// use std::collections::HashMap;
    ///
    /// let mut headers = HashMap::new();
    /// headers.insert("X-Request-Id".to_string(), "abc-123".to_string());
    ///
    /// let response = SerResponse::new(StatusCode::OK, headers, b"{}".to_vec());
    /// assert!(response.is_success());
    /// assert_eq!(response.request_id(), Some("abc-123"));
    /// ```
    pub fn new(status: StatusCode, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_lowercase(), value))
            .collect();
        Self {
            status,
            headers,
            body,
        }
    }

    /// Read a reqwest response fully.
    pub async fn from_reqwest(response: reqwest::Response) -> SerResult<Self> {
        let status = response.status();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_lowercase(), value.to_string());
            }
        }

        // The request already reached the relay, so a broken body is not retried.
        let body = response
            .bytes()
            .await
            .map_err(|e| SerError::Transport {
                message: format!("Failed to read response body: {}", e),
                source: Some(Box::new(e)),
                retryable: false,
            })?
            .to_vec();

        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// The HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// A header value, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// All headers.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// The raw body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> SerResult<T> {
        serde_json::from_slice(&self.body).map_err(Into::into)
    }

    /// Request ID from the response headers.
    pub fn request_id(&self) -> Option<&str> {
        REQUEST_ID_HEADERS.iter().find_map(|name| self.header(name))
    }

    /// Delay from a `Retry-After` header given in seconds.
    pub fn retry_after(&self) -> Option<Duration> {
        self.header("retry-after").and_then(parse_retry_after)
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Convert a failed response into a [`SerError`].
    pub fn into_error(self) -> SerError {
        let request_id = self.request_id().map(str::to_string);
        let retry_after = self.retry_after();
        map_api_error(self.status, &self.body, request_id, retry_after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn response(status: StatusCode, headers: &[(&str, &str)], body: &str) -> SerResponse {
        SerResponse::new(
            status,
            headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body.as_bytes().to_vec(),
        )
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let resp = response(StatusCode::OK, &[("Content-Type", "application/json")], "");
        assert_eq!(resp.header("content-type"), Some("application/json"));
        assert_eq!(resp.header("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn test_request_id_fallback() {
        let resp = response(StatusCode::OK, &[("x-amzn-RequestId", "amz-1")], "");
        assert_eq!(resp.request_id(), Some("amz-1"));
        assert_eq!(response(StatusCode::OK, &[], "").request_id(), None);
    }

    #[test]
    fn test_json() {
        #[derive(Deserialize)]
        struct Body {
            message_id: String,
        }
        let resp = response(StatusCode::OK, &[], r#"{"message_id": "m-1"}"#);
        let body: Body = resp.json().unwrap();
        assert_eq!(body.message_id, "m-1");

        let bad = response(StatusCode::OK, &[], "<html>");
        assert!(matches!(bad.json::<Body>(), Err(SerError::Serialization { .. })));
    }

    #[test]
    fn test_into_error_uses_headers() {
        let resp = response(
            StatusCode::TOO_MANY_REQUESTS,
            &[("Retry-After", "7")],
            r#"{"reason": "quota"}"#,
        );
        let err = resp.into_error();
        assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));

        let resp = response(StatusCode::BAD_GATEWAY, &[("x-request-id", "hdr")], "");
        let err = resp.into_error();
        assert_eq!(err.request_id(), Some("hdr"));
        assert!(err.is_retryable());
    }
}
