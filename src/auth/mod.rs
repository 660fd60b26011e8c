//! OAuth2 client credentials authentication.
//!
//! The relay accepts bearer tokens issued by its own token endpoint in
//! exchange for a client ID and secret. This module provides:
//!
//! - [`ClientCredentials`] - The client ID and secret, with the secret protected
//! - [`AccessToken`] - An issued bearer token and its expiry
//! - [`TokenProvider`] - Trait for anything that can hand out tokens
//! - [`OAuth2TokenProvider`] - Performs the client credentials exchange
//! - [`CachedTokenProvider`] - Reuses a token until shortly before it expires
//! - [`StaticTokenProvider`] - Always returns the same token
//!
//! # Example
//!
//! ```no_run
//! use integrations_ser_mail::auth::{
//!     CachedTokenProvider, ClientCredentials, OAuth2TokenProvider, TokenProvider,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = ClientCredentials::new("client-id", "client-secret");
//! let provider = CachedTokenProvider::new(OAuth2TokenProvider::new(
//!     reqwest::Client::new(),
//!     "https://mail.ser.proofpoint.com/v1/token",
//!     credentials,
//! ));
//!
//! let token = provider.token().await?;
//! println!("token expires at {:?}", token.expires_at());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Arc;
use zeroize::Zeroize;

mod cache;
mod error;
mod oauth2;
mod static_token;

pub use cache::CachedTokenProvider;
pub use error::AuthError;
pub use oauth2::{OAuth2TokenProvider, TokenResponse};
pub use static_token::StaticTokenProvider;

/// Client ID and secret issued with an SER API key.
///
/// The secret is wrapped in a [`SecretString`] and never appears in
/// `Debug` output.
///
/// ```
/// use integrations_ser_mail::auth::ClientCredentials;
///
/// let credentials = ClientCredentials::new("my-client", "s3cr3t");
/// assert_eq!(credentials.client_id(), "my-client");
/// assert!(!format!("{:?}", credentials).contains("s3cr3t"));
/// ```
#[derive(Clone)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: SecretString,
}

impl ClientCredentials {
    /// Create new client credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
        }
    }

    /// The client ID.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The client secret.
    ///
    /// This exposes the secret; do not log or persist the returned value.
    pub fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }
}

impl Drop for ClientCredentials {
    fn drop(&mut self) {
        self.client_id.zeroize();
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// A bearer token issued by the token endpoint.
#[derive(Clone)]
pub struct AccessToken {
    value: SecretString,
    token_type: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Create a token that never expires on its own.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: SecretString::new(value.into()),
            token_type: "Bearer".to_string(),
            expires_at: None,
        }
    }

    /// Set the expiry time.
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Set the expiry relative to now.
    pub fn with_expires_in(self, seconds: u64) -> Self {
        let seconds = i64::try_from(seconds).unwrap_or(i64::MAX);
        let expires_at = Utc::now()
            .checked_add_signed(ChronoDuration::seconds(seconds))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.with_expires_at(expires_at)
    }

    /// Set the token type reported by the token endpoint.
    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = token_type.into();
        self
    }

    /// The raw token value.
    ///
    /// This exposes the secret; do not log or persist the returned value.
    pub fn value(&self) -> &str {
        self.value.expose_secret()
    }

    /// The token type, usually `Bearer`.
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// When the token expires, if the endpoint said.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns true if the token has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at.map_or(false, |exp| Utc::now() >= exp)
    }

    /// Returns true if the token expires within `within`.
    ///
    /// ```
    /// use chrono::{Duration, Utc};
    /// use integrations_ser_mail::auth::AccessToken;
    ///
    /// let token = AccessToken::new("abc").with_expires_at(Utc::now() + Duration::seconds(30));
    /// assert!(token.expires_within(Duration::seconds(60)));
    /// assert!(!token.expires_within(Duration::seconds(10)));
    /// ```
    pub fn expires_within(&self, within: ChronoDuration) -> bool {
        self.expires_at
            .map_or(false, |exp| Utc::now() + within >= exp)
    }

    /// Value for the `Authorization` header.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.value.expose_secret())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Source of bearer tokens for API requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a token that is valid for at least the next request.
    async fn token(&self) -> Result<AccessToken, AuthError>;

    /// Forget any cached token so the next call fetches a new one.
    async fn invalidate(&self) {}
}

#[async_trait]
impl<T: TokenProvider + ?Sized> TokenProvider for Arc<T> {
    async fn token(&self) -> Result<AccessToken, AuthError> {
        (**self).token().await
    }

    async fn invalidate(&self) {
        (**self).invalidate().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let credentials = ClientCredentials::new("id", "very-secret");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("id"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("very-secret"));
        assert_eq!(credentials.client_secret(), "very-secret");
    }

    #[test]
    fn test_access_token_expiry() {
        let token = AccessToken::new("t");
        assert!(!token.is_expired());
        assert!(!token.expires_within(ChronoDuration::days(365)));

        let expired = AccessToken::new("t").with_expires_at(Utc::now() - ChronoDuration::seconds(1));
        assert!(expired.is_expired());

        let fresh = AccessToken::new("t").with_expires_in(3600);
        assert!(!fresh.is_expired());
        assert!(fresh.expires_within(ChronoDuration::hours(2)));
    }

    #[test]
    fn test_access_token_header_and_debug() {
        let token = AccessToken::new("abc123").with_token_type("bearer");
        assert_eq!(token.authorization_header(), "Bearer abc123");
        assert_eq!(token.token_type(), "bearer");
        assert!(!format!("{:?}", token).contains("abc123"));
    }
}
