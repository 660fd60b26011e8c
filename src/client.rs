//! SER client and builder.
//!
//! [`SerClient`] is the entry point for sending mail. It owns the
//! configuration, one shared [`SerHttpClient`] and lazily created services.
//!
//! # Example
//!
//! ```rust,no_run
//! use integrations_ser_mail::{Message, SerClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SerClient::builder()
//!     .credentials("client-id", "client-secret")
//!     .build()?;
//!
//! let message = Message::builder()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Hello")
//!     .text("Email body")
//!     .build()?;
//!
//! let result = client.send(&message).await?;
//! println!("HTTP Response: {}/{}", result.status, result.http_reason);
//! # Ok(())
//! # }
//! ```

use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::TokenProvider;
use crate::config::{RetryConfig, SerConfig, SerConfigBuilder};
use crate::error::SerResult;
use crate::http::SerHttpClient;
use crate::services::SendService;
use crate::types::{Message, SendResult};

/// Client for the Secure Email Relay API.
///
/// Cloning is cheap. Clones share the HTTP connection pool and the token
/// cache.
///
/// ```rust,no_run
/// use integrations_ser_mail::SerClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SerClient::from_env()?;
///
/// let client_clone = client.clone();
/// tokio::spawn(async move {
///     // Use client_clone...
/// });
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SerClient {
    config: Arc<SerConfig>,
    http_client: Arc<SerHttpClient>,
    send_service: OnceCell<SendService>,
}

impl SerClient {
    /// Create a client from a configuration.
    ///
    /// Tokens are fetched with the client credentials grant on first use.
    ///
    /// # Errors
    ///
    /// Returns `SerError::Transport` if the HTTP client cannot be built.
    pub fn new(config: SerConfig) -> SerResult<Self> {
        let http_client = SerHttpClient::new(config.clone())?;
        Ok(Self::from_http_client(config, http_client))
    }

    /// Create a client from `SER_*` environment variables.
    ///
    /// See [`SerConfig::from_env`].
    pub fn from_env() -> SerResult<Self> {
        Self::new(SerConfig::from_env()?)
    }

    /// Create a client for the default endpoint with the given credentials.
    pub fn with_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> SerResult<Self> {
        Self::builder().credentials(client_id, client_secret).build()
    }

    /// Create a client from an API key file holding `client_id` and
    /// `client_secret`.
    pub fn from_api_key_file(path: impl AsRef<Path>) -> SerResult<Self> {
        Self::new(SerConfig::from_api_key_file(path)?)
    }

    /// Create a new client builder.
    pub fn builder() -> SerClientBuilder {
        SerClientBuilder::default()
    }

    fn from_http_client(config: SerConfig, http_client: SerHttpClient) -> Self {
        Self {
            config: Arc::new(config),
            http_client: Arc::new(http_client),
            send_service: OnceCell::new(),
        }
    }

    /// The client configuration.
    pub fn config(&self) -> &SerConfig {
        &self.config
    }

    /// The HTTP client.
    pub fn http_client(&self) -> &SerHttpClient {
        &self.http_client
    }

    /// The send service.
    pub fn send_service(&self) -> &SendService {
        self.send_service
            .get_or_init(|| SendService::new(self.http_client.clone()))
    }

    /// Send a message.
    ///
    /// A non-2xx answer from the relay is returned as an error; see
    /// [`SendService::send`].
    ///
    /// ```rust,no_run
    /// use integrations_ser_mail::{Message, SerClient};
    ///
    /// # async fn example(client: &SerClient) -> Result<(), Box<dyn std::error::Error>> {
    /// let message = Message::builder()
    ///     .from("sender@example.com")
    ///     .to("recipient@example.com")
    ///     .subject("Test Email")
    ///     .text("Email body text")
    ///     .build()?;
    ///
    /// let result = client.send(&message).await?;
    /// println!("Message ID: {:?}", result.message_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send(&self, message: &Message) -> SerResult<SendResult> {
        self.send_service().send(message).await
    }
}

impl std::fmt::Debug for SerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerClient")
            .field("endpoint", &self.config.endpoint)
            .field(
                "client_id",
                &self.config.credentials.as_ref().map(|c| c.client_id()),
            )
            .finish_non_exhaustive()
    }
}

/// Builder for [`SerClient`].
#[derive(Default)]
pub struct SerClientBuilder {
    config: Option<SerConfig>,
    config_builder: SerConfigBuilder,
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl SerClientBuilder {
    /// Use a complete configuration. Individual settings on the builder are
    /// then ignored.
    pub fn config(mut self, config: SerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load the configuration from `SER_*` environment variables.
    pub fn from_env(self) -> SerResult<Self> {
        Ok(self.config(SerConfig::from_env()?))
    }

    /// Set the client ID and secret.
    pub fn credentials(mut self, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.credentials(client_id, client_secret);
        self
    }

    /// Load the client ID and secret from an API key file.
    pub fn api_key_file(mut self, path: impl AsRef<Path>) -> SerResult<Self> {
        self.config_builder = self.config_builder.api_key_file(path)?;
        Ok(self)
    }

    /// Set the API base URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.endpoint(endpoint);
        self
    }

    /// Set the token endpoint URL.
    pub fn token_endpoint(mut self, token_endpoint: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.token_endpoint(token_endpoint);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.config_builder = self.config_builder.timeout(duration);
        self
    }

    /// Set how many times a failed request is retried.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config_builder = self.config_builder.max_retries(retries);
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.config_builder = self.config_builder.retry_config(config);
        self
    }

    /// Set the token scope. Pass `None` to send no scope.
    pub fn token_scope(mut self, scope: Option<String>) -> Self {
        self.config_builder = self.config_builder.token_scope(scope);
        self
    }

    /// Use a custom token provider instead of the client credentials grant.
    ///
    /// Credentials become optional when a provider is set.
    pub fn token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns `SerError::Configuration` if the configuration is incomplete
    /// or invalid.
    pub fn build(self) -> SerResult<SerClient> {
        let config = match self.config {
            Some(config) => config,
            None if self.token_provider.is_some() => {
                self.config_builder.build_without_credentials()?
            }
            None => self.config_builder.build()?,
        };

        let http_client = match self.token_provider {
            Some(provider) => SerHttpClient::with_token_provider(config.clone(), provider)?,
            None => SerHttpClient::new(config.clone())?,
        };

        Ok(SerClient::from_http_client(config, http_client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;
    use crate::error::SerError;

    #[test]
    fn test_builder_requires_credentials() {
        let err = SerClient::builder().build().unwrap_err();
        assert!(matches!(err, SerError::Configuration { .. }));
    }

    #[test]
    fn test_builder_settings() {
        let client = SerClient::builder()
            .credentials("id", "secret")
            .endpoint("https://relay.example.com/v1/")
            .max_retries(5)
            .build()
            .unwrap();

        assert_eq!(client.config().endpoint, "https://relay.example.com/v1");
        assert_eq!(client.config().send_url(), "https://relay.example.com/v1/send");
        assert_eq!(client.config().max_retries(), 5);
    }

    #[test]
    fn test_explicit_config_wins() {
        let config = SerConfig::builder()
            .credentials("from-config", "secret")
            .build()
            .unwrap();

        let client = SerClient::builder()
            .credentials("ignored", "secret")
            .config(config)
            .build()
            .unwrap();
        assert_eq!(
            client.config().credentials.as_ref().map(|c| c.client_id()),
            Some("from-config")
        );
    }

    #[test]
    fn test_custom_token_provider() {
        let client = SerClient::builder()
            .credentials("id", "secret")
            .token_provider(Arc::new(StaticTokenProvider::from_value("static")))
            .build()
            .unwrap();
        let _ = client.send_service();
    }

    #[test]
    fn test_token_provider_without_credentials() {
        let client = SerClient::builder()
            .token_provider(Arc::new(StaticTokenProvider::from_value("pre-issued")))
            .build()
            .unwrap();
        assert!(client.config().credentials.is_none());

        let debug = format!("{:?}", client);
        assert!(debug.contains("client_id: None"));
    }

    #[test]
    fn test_config_without_credentials_needs_token_provider() {
        let config = SerConfig::builder().build_without_credentials().unwrap();
        let err = SerClient::new(config).unwrap_err();
        assert!(matches!(err, SerError::Configuration { .. }));
    }

    #[test]
    fn test_debug_hides_secret() {
        let client = SerClient::with_credentials("visible-id", "hidden-secret").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("visible-id"));
        assert!(!debug.contains("hidden-secret"));
    }
}
