//! Transport layer abstraction for HTTP communication.
//!
//! The default implementation uses reqwest; tests and alternative backends
//! can supply their own.

use async_trait::async_trait;
use reqwest::{Client, Request, Response};
use std::time::Duration;

use crate::error::{SerError, SerResult};

/// Trait for HTTP transport implementations.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or times out.
    async fn send(&self, request: Request) -> SerResult<Response>;
}

/// Reqwest-based HTTP transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the given timeouts and user agent.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use integrations_ser_mail::http::ReqwestTransport;
    ///
    /// let transport = ReqwestTransport::new(
    ///     Duration::from_secs(30),
    ///     Duration::from_secs(10),
    ///     "my-app/1.0",
    /// )?;
    /// # Ok::<(), integrations_ser_mail::error::SerError>(())
    /// ```
    pub fn new(timeout: Duration, connect_timeout: Duration, user_agent: &str) -> SerResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(user_agent)
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .build()
            .map_err(|e| SerError::Transport {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(Box::new(e)),
                retryable: false,
            })?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// The underlying reqwest client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> SerResult<Response> {
        self.client.execute(request).await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_reqwest_transport_creation() {
        let transport = ReqwestTransport::new(
            Duration::from_secs(30),
            Duration::from_secs(10),
            "test-agent/0.1",
        );
        assert!(transport.is_ok());
    }

    #[test]
    fn test_transport_trait_object() {
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::from_client(Client::new()));
        let _: &dyn Transport = &*transport;
    }
}
