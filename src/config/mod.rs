//! Configuration module for the SER client.
//!
//! This module provides configuration types and builders for customizing
//! the client, including:
//!
//! - API and token endpoint URLs
//! - OAuth2 client credentials
//! - Timeout and retry settings
//! - User agent customization

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub mod error;
pub mod retry;

pub use error::ConfigError;
pub use retry::RetryConfig;

use crate::auth::ClientCredentials;

/// Production API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://mail.ser.proofpoint.com/v1";

/// Scope requested with every token.
pub const DEFAULT_TOKEN_SCOPE: &str = "client_credentials";

/// Configuration for the SER client.
#[derive(Debug, Clone)]
pub struct SerConfig {
    /// Base URL of the API, without a trailing slash.
    pub endpoint: String,

    /// Token endpoint URL. Defaults to `<endpoint>/token`.
    pub token_endpoint: Option<String>,

    /// OAuth2 client credentials. `None` only when tokens come from a
    /// custom [`TokenProvider`](crate::auth::TokenProvider).
    pub credentials: Option<ClientCredentials>,

    /// Timeout for the entire request.
    pub timeout: Duration,

    /// Timeout for establishing connections.
    pub connect_timeout: Duration,

    /// Retry configuration. `max_attempts` is the number of retries.
    pub retry_config: RetryConfig,

    /// Scope sent with token requests; `None` sends no scope.
    pub token_scope: Option<String>,

    /// Refresh tokens this long before they expire.
    pub token_refresh_buffer: Duration,

    /// Custom user agent string.
    pub user_agent: Option<String>,
}

/// Downloadable API key document.
#[derive(Deserialize)]
struct ApiKeyFile {
    client_id: String,
    client_secret: String,
}

impl SerConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_ser_mail::config::SerConfig;
    ///
    /// let config = SerConfig::builder()
    ///     .credentials("client-id", "client-secret")
    ///     .build()?;
    ///
    /// assert_eq!(config.send_url(), "https://mail.ser.proofpoint.com/v1/send");
    /// assert_eq!(config.token_url(), "https://mail.ser.proofpoint.com/v1/token");
    /// # Ok::<(), integrations_ser_mail::config::ConfigError>(())
    /// ```
    pub fn builder() -> SerConfigBuilder {
        SerConfigBuilder::default()
    }

    /// Create a configuration from environment variables.
    ///
    /// Reads:
    /// - `SER_CLIENT_ID` and `SER_CLIENT_SECRET` (required)
    /// - `SER_ENDPOINT` and `SER_TOKEN_ENDPOINT` (optional URL overrides)
    /// - `SER_TIMEOUT_SECS` (optional request timeout)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::Environment {
                    message: format!("{} must be set", key),
                })
        };

        let mut builder = Self::builder().credentials(
            required("SER_CLIENT_ID")?,
            required("SER_CLIENT_SECRET")?,
        );

        if let Some(endpoint) = lookup("SER_ENDPOINT") {
            builder = builder.endpoint(endpoint);
        }
        if let Some(token_endpoint) = lookup("SER_TOKEN_ENDPOINT") {
            builder = builder.token_endpoint(token_endpoint);
        }
        if let Some(timeout) = lookup("SER_TIMEOUT_SECS") {
            let secs: u64 = timeout.trim().parse().map_err(|_| ConfigError::Environment {
                message: format!("SER_TIMEOUT_SECS is not a number of seconds: {}", timeout),
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        // Bad URLs in the environment are reported as environment errors.
        builder.build().map_err(|err| match err {
            ConfigError::Invalid { message } => ConfigError::Environment { message },
            other => other,
        })
    }

    /// Create a configuration from an API key file.
    ///
    /// The file is the JSON document offered for download when the key is
    /// created: `{"client_id": "...", "client_secret": "..."}`.
    pub fn from_api_key_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::builder().api_key_file(path)?.build()
    }

    /// How many times a failed request is retried.
    pub fn max_retries(&self) -> u32 {
        self.retry_config.max_attempts
    }

    /// URL of the `/send` endpoint.
    pub fn send_url(&self) -> String {
        self.url_for("send")
    }

    /// URL of the token endpoint.
    pub fn token_url(&self) -> String {
        self.token_endpoint
            .clone()
            .unwrap_or_else(|| self.url_for("token"))
    }

    /// Join `path` onto the API endpoint.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    /// User agent sent with every request.
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("integrations-ser-mail/{}", env!("CARGO_PKG_VERSION")))
    }
}

/// Builder for creating SER client configurations.
#[derive(Default)]
pub struct SerConfigBuilder {
    endpoint: Option<String>,
    token_endpoint: Option<String>,
    credentials: Option<ClientCredentials>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_config: Option<RetryConfig>,
    token_scope: Option<Option<String>>,
    token_refresh_buffer: Option<Duration>,
    user_agent: Option<String>,
}

impl SerConfigBuilder {
    /// Set the API base URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the token endpoint URL.
    pub fn token_endpoint(mut self, token_endpoint: impl Into<String>) -> Self {
        self.token_endpoint = Some(token_endpoint.into());
        self
    }

    /// Set the client ID and secret.
    pub fn credentials(self, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        self.client_credentials(ClientCredentials::new(client_id, client_secret))
    }

    /// Set prebuilt client credentials.
    pub fn client_credentials(mut self, credentials: ClientCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Load the client ID and secret from an API key file.
    pub fn api_key_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let key_file_error = |message: String| ConfigError::KeyFile {
            path: path.display().to_string(),
            message,
        };

        let raw = std::fs::read_to_string(path).map_err(|e| key_file_error(e.to_string()))?;
        let key: ApiKeyFile =
            serde_json::from_str(&raw).map_err(|e| key_file_error(e.to_string()))?;

        Ok(self.credentials(key.client_id, key.client_secret))
    }

    /// Set the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Set the maximum number of retry attempts.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = Some(config);
        self
    }

    /// Set the token scope. Pass `None` to send no scope.
    pub fn token_scope(mut self, scope: Option<String>) -> Self {
        self.token_scope = Some(scope);
        self
    }

    /// Set how long before expiry tokens are refreshed.
    pub fn token_refresh_buffer(mut self, buffer: Duration) -> Self {
        self.token_refresh_buffer = Some(buffer);
        self
    }

    /// Set a custom user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if no credentials were set and
    /// `ConfigError::Invalid` if an endpoint is not an absolute http(s) URL.
    pub fn build(self) -> Result<SerConfig, ConfigError> {
        if self.credentials.is_none() {
            return Err(ConfigError::MissingField {
                field: "credentials".to_string(),
            });
        }
        self.build_without_credentials()
    }

    /// Build a configuration that may lack client credentials.
    ///
    /// Use this when tokens come from a custom
    /// [`TokenProvider`](crate::auth::TokenProvider), for example a
    /// pre-issued token. Credentials that are set are still validated.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for an empty client ID or an endpoint
    /// that is not an absolute http(s) URL.
    pub fn build_without_credentials(self) -> Result<SerConfig, ConfigError> {
        if let Some(credentials) = &self.credentials {
            if credentials.client_id().trim().is_empty() {
                return Err(ConfigError::Invalid {
                    message: "client_id must not be empty".to_string(),
                });
            }
        }

        let endpoint = validate_url(
            "endpoint",
            self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT),
        )?;
        let token_endpoint = self
            .token_endpoint
            .as_deref()
            .map(|url| validate_url("token_endpoint", url))
            .transpose()?;

        let mut retry_config = self.retry_config.unwrap_or_default();
        if let Some(max_retries) = self.max_retries {
            retry_config.max_attempts = max_retries;
        }

        Ok(SerConfig {
            endpoint,
            token_endpoint,
            credentials: self.credentials,
            timeout: self.timeout.unwrap_or(Duration::from_secs(30)),
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(10)),
            retry_config,
            token_scope: self
                .token_scope
                .unwrap_or_else(|| Some(DEFAULT_TOKEN_SCOPE.to_string())),
            token_refresh_buffer: self.token_refresh_buffer.unwrap_or(Duration::from_secs(60)),
            user_agent: self.user_agent,
        })
    }
}

/// Check that `value` is an absolute http(s) URL and strip trailing slashes.
fn validate_url(field: &str, value: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(value.trim()).map_err(|e| ConfigError::Invalid {
        message: format!("{} '{}' is not a valid URL: {}", field, value, e),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            message: format!("{} must use http or https, got '{}'", field, parsed.scheme()),
        });
    }

    Ok(value.trim().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_builder_defaults() {
        let config = SerConfig::builder()
            .credentials("id", "secret")
            .build()
            .unwrap();

        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries(), 3);
        assert_eq!(config.token_scope.as_deref(), Some("client_credentials"));
        assert_eq!(config.token_refresh_buffer, Duration::from_secs(60));
        assert!(config.user_agent().starts_with("integrations-ser-mail/"));
    }

    #[test]
    fn test_builder_custom_endpoints() {
        let config = SerConfig::builder()
            .credentials("id", "secret")
            .endpoint("http://localhost:8080/v1/")
            .build()
            .unwrap();
        assert_eq!(config.send_url(), "http://localhost:8080/v1/send");
        assert_eq!(config.token_url(), "http://localhost:8080/v1/token");

        let config = SerConfig::builder()
            .credentials("id", "secret")
            .token_endpoint("https://auth.example.com/oauth/token")
            .build()
            .unwrap();
        assert_eq!(config.token_url(), "https://auth.example.com/oauth/token");
    }

    #[test]
    fn test_builder_max_retries_overrides_retry_config() {
        let config = SerConfig::builder()
            .credentials("id", "secret")
            .retry_config(RetryConfig {
                max_attempts: 7,
                ..RetryConfig::default()
            })
            .max_retries(1)
            .build()
            .unwrap();
        assert_eq!(config.max_retries(), 1);
        assert_eq!(config.retry_config.max_attempts, 1);
    }

    #[test]
    fn test_builder_missing_credentials() {
        match SerConfig::builder().build().unwrap_err() {
            ConfigError::MissingField { field } => assert_eq!(field, "credentials"),
            other => panic!("Expected MissingField error, got {:?}", other),
        }
    }

    #[test]
    fn test_build_without_credentials() {
        let config = SerConfig::builder()
            .endpoint("http://localhost:8080/v1")
            .build_without_credentials()
            .unwrap();
        assert!(config.credentials.is_none());
        assert_eq!(config.send_url(), "http://localhost:8080/v1/send");

        let err = SerConfig::builder()
            .credentials(" ", "secret")
            .build_without_credentials()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_retry_config_alone_sets_max_retries() {
        let config = SerConfig::builder()
            .credentials("id", "secret")
            .retry_config(RetryConfig {
                max_attempts: 5,
                ..RetryConfig::default()
            })
            .build()
            .unwrap();
        assert_eq!(config.max_retries(), 5);
    }

    #[test]
    fn test_builder_rejects_bad_endpoints() {
        let err = SerConfig::builder()
            .credentials("id", "secret")
            .endpoint("ftp://example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = SerConfig::builder()
            .credentials("id", "secret")
            .token_endpoint("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_builder_no_scope() {
        let config = SerConfig::builder()
            .credentials("id", "secret")
            .token_scope(None)
            .build()
            .unwrap();
        assert!(config.token_scope.is_none());
    }

    #[test]
    fn test_from_lookup() {
        let config = SerConfig::from_lookup(lookup_from(&[
            ("SER_CLIENT_ID", "env-id"),
            ("SER_CLIENT_SECRET", "env-secret"),
            ("SER_ENDPOINT", "http://127.0.0.1:9000"),
            ("SER_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.credentials.as_ref().unwrap().client_id(), "env-id");
        assert_eq!(config.endpoint, "http://127.0.0.1:9000");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_lookup_missing_secret() {
        let err = SerConfig::from_lookup(lookup_from(&[("SER_CLIENT_ID", "env-id")])).unwrap_err();
        match err {
            ConfigError::Environment { message } => assert!(message.contains("SER_CLIENT_SECRET")),
            other => panic!("Expected Environment error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_lookup_bad_timeout() {
        let err = SerConfig::from_lookup(lookup_from(&[
            ("SER_CLIENT_ID", "id"),
            ("SER_CLIENT_SECRET", "secret"),
            ("SER_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Environment { .. }));
    }

    #[test]
    fn test_from_lookup_bad_endpoint_is_environment_error() {
        for key in ["SER_ENDPOINT", "SER_TOKEN_ENDPOINT"] {
            let err = SerConfig::from_lookup(lookup_from(&[
                ("SER_CLIENT_ID", "id"),
                ("SER_CLIENT_SECRET", "secret"),
                (key, "not a url"),
            ]))
            .unwrap_err();
            match err {
                ConfigError::Environment { message } => assert!(message.contains("not a url")),
                other => panic!("Expected Environment error for {}, got {:?}", key, other),
            }
        }
    }

    #[test]
    fn test_from_api_key_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"client_id": "file-id", "client_secret": "file-secret"}}"#).unwrap();

        let config = SerConfig::from_api_key_file(file.path()).unwrap();
        assert_eq!(config.credentials.as_ref().unwrap().client_id(), "file-id");
        assert_eq!(config.credentials.as_ref().unwrap().client_secret(), "file-secret");
    }

    #[test]
    fn test_from_api_key_file_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"client_id": "only-id"}}"#).unwrap();
        assert!(matches!(
            SerConfig::from_api_key_file(file.path()).unwrap_err(),
            ConfigError::KeyFile { .. }
        ));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SerConfig::from_api_key_file(dir.path().join("missing.api_key")).unwrap_err(),
            ConfigError::KeyFile { .. }
        ));
    }
}
