//! The `/send` endpoint.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::SerResult;
use crate::http::{HttpClient, SerRequest};
use crate::types::{Message, SendResult};

/// Path of the send endpoint, relative to the API base URL.
pub const SEND_PATH: &str = "send";

/// Service for submitting messages.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use integrations_ser_mail::config::SerConfig;
/// use integrations_ser_mail::http::SerHttpClient;
/// use integrations_ser_mail::services::SendService;
/// use integrations_ser_mail::types::Message;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SerConfig::from_env()?;
/// let service = SendService::new(Arc::new(SerHttpClient::new(config)?));
///
/// let message = Message::builder()
///     .from("sender@example.com")
///     .to("recipient@example.com")
///     .subject("Hello")
///     .text("Hello from SER")
///     .build()?;
///
/// let result = service.send(&message).await?;
/// println!("HTTP Response: {}/{}", result.status, result.http_reason);
/// println!("Message ID: {:?}", result.message_id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SendService {
    http_client: Arc<dyn HttpClient>,
}

impl SendService {
    /// Create a new send service.
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// Submit `message` and return the relay's answer.
    ///
    /// An empty success body yields a [`SendResult`] carrying only the HTTP
    /// status. The request ID falls back to the response headers when the
    /// body has none.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`SerError`](crate::error::SerError) for non-2xx
    /// responses after retries, and `Serialization` if a non-empty success
    /// body is not a send result.
    #[instrument(
        skip_all,
        name = "ser.send",
        fields(recipients = message.recipient_count(), attachments = message.attachments().len())
    )]
    pub async fn send(&self, message: &Message) -> SerResult<SendResult> {
        let request = SerRequest::post(SEND_PATH).json(message)?;
        let response = self.http_client.send_request(request).await?;

        let mut result = if response.body().iter().all(u8::is_ascii_whitespace) {
            SendResult::default()
        } else {
            response.json::<SendResult>()?
        };

        result.status = response.status().as_u16();
        result.http_reason = response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string();
        if result.request_id.is_none() {
            result.request_id = response.request_id().map(str::to_string);
        }

        info!(
            status = result.status,
            message_id = ?result.message_id,
            request_id = ?result.request_id,
            "message submitted"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SerError;
    use crate::http::SerResponse;
    use async_trait::async_trait;
    use http::StatusCode;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers every request with a canned response and records the bodies.
    struct CannedClient {
        status: StatusCode,
        headers: HashMap<String, String>,
        body: &'static str,
        seen: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl CannedClient {
        fn new(status: StatusCode, body: &'static str) -> Self {
            Self {
                status,
                headers: HashMap::new(),
                body,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpClient for CannedClient {
        async fn send_request(&self, request: SerRequest) -> SerResult<SerResponse> {
            self.seen.lock().unwrap().push((
                request.path().to_string(),
                request.body().unwrap_or_default().to_vec(),
            ));
            let response = SerResponse::new(self.status, self.headers.clone(), self.body.as_bytes().to_vec());
            if response.is_success() {
                Ok(response)
            } else {
                Err(response.into_error())
            }
        }

        fn endpoint(&self) -> &str {
            "http://canned"
        }
    }

    fn message() -> Message {
        Message::builder()
            .from("sender@example.com")
            .to("to@example.com")
            .subject("Subject")
            .text("Body")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_send_posts_message_json() {
        let client = Arc::new(CannedClient::new(
            StatusCode::ACCEPTED,
            r#"{"message_id": "m-1", "reason": "queued", "request_id": "r-1"}"#,
        ));
        let service = SendService::new(client.clone());

        let result = service.send(&message()).await.unwrap();
        assert_eq!(result.message_id.as_deref(), Some("m-1"));
        assert_eq!(result.reason.as_deref(), Some("queued"));
        assert_eq!(result.request_id.as_deref(), Some("r-1"));
        assert_eq!(result.status, 202);
        assert_eq!(result.http_reason, "Accepted");
        assert!(result.is_accepted());

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen[0].0, "send");
        let sent: serde_json::Value = serde_json::from_slice(&seen[0].1).unwrap();
        assert_eq!(sent["subject"], "Subject");
        assert_eq!(sent["tos"][0]["email"], "to@example.com");
    }

    #[tokio::test]
    async fn test_send_empty_body_uses_header_request_id() {
        let mut client = CannedClient::new(StatusCode::OK, "");
        client.headers.insert("x-request-id".to_string(), "hdr-1".to_string());
        let service = SendService::new(Arc::new(client));

        let result = service.send(&message()).await.unwrap();
        assert!(result.message_id.is_none());
        assert_eq!(result.request_id.as_deref(), Some("hdr-1"));
        assert_eq!(result.http_reason, "OK");
    }

    #[tokio::test]
    async fn test_send_propagates_api_errors() {
        let service = SendService::new(Arc::new(CannedClient::new(
            StatusCode::BAD_REQUEST,
            r#"{"reason": "invalid sender"}"#,
        )));

        let err = service.send(&message()).await.unwrap_err();
        match err {
            SerError::Validation { message, .. } => assert_eq!(message, "invalid sender"),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_rejects_unexpected_body() {
        let service = SendService::new(Arc::new(CannedClient::new(StatusCode::OK, "not json")));
        let err = service.send(&message()).await.unwrap_err();
        assert!(matches!(err, SerError::Serialization { .. }));
    }
}
