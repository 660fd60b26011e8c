//! HTTP client implementation for the SER API.

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Request;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::auth::{
    AccessToken, CachedTokenProvider, OAuth2TokenProvider, TokenProvider,
};
use crate::config::SerConfig;
use crate::error::{SerError, SerResult};

use super::request::SerRequest;
use super::response::SerResponse;
use super::transport::{ReqwestTransport, Transport};
use super::HttpClient;

/// HTTP client for SER API communication.
///
/// This client handles:
/// - Bearer authentication with tokens from a [`TokenProvider`]
/// - One token refresh and resend when the API answers `401`
/// - Retries with exponential backoff for retryable failures
///
/// # Examples
///
/// ```rust
/// use integrations_ser_mail::config::SerConfig;
/// use integrations_ser_mail::http::{HttpClient, SerHttpClient};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SerConfig::builder()
///     .credentials("client-id", "client-secret")
///     .build()?;
///
/// let client = SerHttpClient::new(config)?;
/// assert_eq!(client.endpoint(), "https://mail.ser.proofpoint.com/v1");
/// # Ok(())
/// # }
/// ```
pub struct SerHttpClient {
    config: Arc<SerConfig>,
    transport: Arc<dyn Transport>,
    token_provider: Arc<dyn TokenProvider>,
}

impl SerHttpClient {
    /// Create a client that obtains tokens with the client credentials grant.
    ///
    /// Tokens are cached and refreshed `token_refresh_buffer` before expiry.
    ///
    /// # Errors
    ///
    /// Returns `SerError::Configuration` if the configuration has no
    /// credentials, and `SerError::Transport` if the HTTP client cannot be
    /// built.
    pub fn new(config: SerConfig) -> SerResult<Self> {
        let transport = ReqwestTransport::new(
            config.timeout,
            config.connect_timeout,
            &config.user_agent(),
        )?;
        let token_provider = Self::default_token_provider(&config, transport.client().clone())?;

        Ok(Self::with_parts(config, Arc::new(transport), token_provider))
    }

    /// Create a client with a custom token provider.
    pub fn with_token_provider(
        config: SerConfig,
        token_provider: Arc<dyn TokenProvider>,
    ) -> SerResult<Self> {
        let transport = ReqwestTransport::new(
            config.timeout,
            config.connect_timeout,
            &config.user_agent(),
        )?;
        Ok(Self::with_parts(config, Arc::new(transport), token_provider))
    }

    /// Create a client from its parts.
    pub fn with_parts(
        config: SerConfig,
        transport: Arc<dyn Transport>,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            token_provider,
        }
    }

    fn default_token_provider(
        config: &SerConfig,
        http: reqwest::Client,
    ) -> SerResult<Arc<dyn TokenProvider>> {
        let credentials = config.credentials.clone().ok_or_else(|| SerError::Configuration {
            message: "Client credentials are required unless a token provider is supplied"
                .to_string(),
            source: None,
        })?;
        let mut oauth = OAuth2TokenProvider::new(http, config.token_url(), credentials);
        if let Some(scope) = &config.token_scope {
            oauth = oauth.with_scope(scope.clone());
        }

        let buffer = chrono::Duration::from_std(config.token_refresh_buffer)
            .unwrap_or_else(|_| chrono::Duration::seconds(60));

        Ok(Arc::new(CachedTokenProvider::new(oauth).with_refresh_buffer(buffer)))
    }

    /// The client configuration.
    pub fn config(&self) -> &SerConfig {
        &self.config
    }

    /// The token provider used for requests.
    pub fn token_provider(&self) -> &Arc<dyn TokenProvider> {
        &self.token_provider
    }

    /// Build an authenticated reqwest request.
    fn build_request(&self, ser_request: &SerRequest, token: &AccessToken) -> SerResult<Request> {
        let url = Url::parse(&ser_request.build_url(&self.config.endpoint)).map_err(|e| {
            SerError::Configuration {
                message: format!("Invalid request URL: {}", e),
                source: None,
            }
        })?;

        let mut request = Request::new(ser_request.method().into(), url);
        let headers = request.headers_mut();

        for (name, value) in ser_request.headers() {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| SerError::Validation {
                message: format!("Invalid header name '{}': {}", name, e),
                field: Some("headers".to_string()),
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| SerError::Validation {
                message: format!("Invalid header value: {}", e),
                field: Some("headers".to_string()),
            })?;
            headers.insert(name, value);
        }

        if let Some(content_type) = ser_request.content_type() {
            let value = HeaderValue::from_str(content_type).map_err(|e| SerError::Validation {
                message: format!("Invalid content-type header: {}", e),
                field: Some("content-type".to_string()),
            })?;
            headers.insert(CONTENT_TYPE, value);
        }

        let mut authorization =
            HeaderValue::from_str(&token.authorization_header()).map_err(|_| {
                SerError::Authentication {
                    message: "Access token contains characters not allowed in a header".to_string(),
                    status: None,
                }
            })?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        if let Some(body) = ser_request.body() {
            *request.body_mut() = Some(body.to_vec().into());
        }

        Ok(request)
    }

    /// One attempt with `token`: send and classify the response.
    async fn attempt(&self, ser_request: &SerRequest, token: &AccessToken) -> SerResult<SerResponse> {
        let request = self.build_request(ser_request, token)?;

        let response = SerResponse::from_reqwest(self.transport.send(request).await?).await?;
        debug!(status = response.status().as_u16(), request_id = ?response.request_id(), "response received");

        if response.is_success() {
            Ok(response)
        } else {
            Err(response.into_error())
        }
    }

    /// Send a request, refreshing the token once on `401` and retrying
    /// retryable failures with backoff.
    #[instrument(skip_all, name = "ser.request", fields(method = %ser_request.method(), path = %ser_request.path()))]
    async fn send_with_retry(&self, ser_request: &SerRequest) -> SerResult<SerResponse> {
        let retry = &self.config.retry_config;
        let mut attempt = 0;
        let mut reauthenticated = false;

        loop {
            // Token exchange failures skip the refresh and go to the retry policy.
            let error = match self.token_provider.token().await {
                Ok(token) => match self.attempt(ser_request, &token).await {
                    Ok(response) => return Ok(response),
                    Err(error) if error.is_unauthorized() && !reauthenticated => {
                        warn!("access token rejected, fetching a new one");
                        self.token_provider.invalidate().await;
                        reauthenticated = true;
                        continue;
                    }
                    Err(error) => error,
                },
                Err(error) => SerError::from(error),
            };

            if !retry.should_retry(attempt, &error) {
                debug!(attempt, error = %error, "request failed");
                return Err(error);
            }

            let delay = error
                .retry_after()
                .unwrap_or_else(|| retry.calculate_delay(attempt));
            warn!(
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "retrying request"
            );
            sleep(delay).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl HttpClient for SerHttpClient {
    async fn send_request(&self, request: SerRequest) -> SerResult<SerResponse> {
        self.send_with_retry(&request).await
    }

    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

impl std::fmt::Debug for SerHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerHttpClient")
            .field("endpoint", &self.config.endpoint)
            .field("max_retries", &self.config.max_retries())
            .finish()
    }
}
