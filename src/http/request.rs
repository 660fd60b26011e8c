//! HTTP request types for the SER API.

use serde::Serialize;

use crate::error::SerResult;

/// HTTP methods used by the SER API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// POST request
    POST,
}

impl HttpMethod {
    /// The method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::POST => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::POST => reqwest::Method::POST,
        }
    }
}

/// A request to the SER API, relative to the configured endpoint.
///
/// The bearer token is added by the HTTP client, not here.
///
/// # Examples
///
/// ```rust
/// use integrations_ser_mail::http::{HttpMethod, SerRequest};
///
/// let request = SerRequest::post("send")
///     .json(&serde_json::json!({"subject": "hi"}))?;
///
/// assert_eq!(request.method(), HttpMethod::POST);
/// assert_eq!(request.content_type(), Some("application/json"));
/// assert_eq!(request.build_url("https://api.example.com/v1"), "https://api.example.com/v1/send");
/// # Ok::<(), integrations_ser_mail::error::SerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SerRequest {
    method: HttpMethod,
    path: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    content_type: Option<String>,
}

impl SerRequest {
    /// Create a new request.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            content_type: None,
        }
    }

    /// Create a new POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::POST, path)
    }

    /// Set a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`SerError::Serialization`](crate::error::SerError::Serialization)
    /// if `body` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> SerResult<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        self.content_type = Some("application/json".to_string());
        Ok(self)
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// The HTTP method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// The path relative to the endpoint.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Extra headers.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// The body, if any.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// The body content type, if a body is set.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Join the path onto `endpoint`.
    pub fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            endpoint.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_slashes() {
        let request = SerRequest::post("/send");
        assert_eq!(request.build_url("http://localhost:1234/v1/"), "http://localhost:1234/v1/send");
        assert_eq!(SerRequest::post("send").build_url("http://h"), "http://h/send");
    }

    #[test]
    fn test_json_body() {
        let request = SerRequest::post("send")
            .json(&serde_json::json!({"a": 1}))
            .unwrap()
            .header("x-trace", "1");
        assert_eq!(request.body(), Some(br#"{"a":1}"#.as_slice()));
        assert_eq!(request.headers(), &[("x-trace".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(reqwest::Method::from(HttpMethod::POST), reqwest::Method::POST);
        assert_eq!(HttpMethod::POST.to_string(), "POST");
    }
}
