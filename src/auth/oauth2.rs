//! Client credentials grant (RFC 6749 section 4.4).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{AccessToken, AuthError, ClientCredentials, TokenProvider};
use crate::error::ApiErrorResponse;

/// Token endpoint response body.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Token type (usually "Bearer").
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Granted scope.
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl From<TokenResponse> for AccessToken {
    fn from(response: TokenResponse) -> Self {
        let token = AccessToken::new(response.access_token).with_token_type(response.token_type);
        match response.expires_in {
            Some(secs) => token.with_expires_in(secs),
            None => token,
        }
    }
}

/// Exchanges client credentials for a bearer token on every call.
///
/// Wrap it in a [`CachedTokenProvider`](super::CachedTokenProvider) to avoid
/// a token request per API call.
pub struct OAuth2TokenProvider {
    http: reqwest::Client,
    token_url: String,
    credentials: ClientCredentials,
    scope: Option<String>,
}

impl OAuth2TokenProvider {
    /// Create a provider that authenticates against `token_url`.
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        credentials: ClientCredentials,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            credentials,
            scope: None,
        }
    }

    /// Request a scope with every token. Blank scopes are not sent.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        self.scope = (!scope.trim().is_empty()).then_some(scope);
        self
    }

    /// The token endpoint URL.
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    fn form_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("grant_type", "client_credentials".to_string())];
        if let Some(scope) = &self.scope {
            params.push(("scope", scope.clone()));
        }
        params
    }
}

#[async_trait]
impl TokenProvider for OAuth2TokenProvider {
    #[instrument(skip_all, name = "ser.token")]
    async fn token(&self) -> Result<AccessToken, AuthError> {
        debug!(
            token_url = %self.token_url,
            client_id = %self.credentials.client_id(),
            "requesting access token"
        );
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(
                self.credentials.client_id(),
                Some(self.credentials.client_secret()),
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&self.form_params())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != reqwest::StatusCode::OK {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.explanation().map(str::to_string))
                .unwrap_or_else(|| {
                    let trimmed = body.trim();
                    if trimmed.is_empty() {
                        status.canonical_reason().unwrap_or("Unknown error").to_string()
                    } else {
                        trimmed.to_string()
                    }
                });
            warn!(status = status.as_u16(), "token request rejected");
            return Err(AuthError::TokenRequest {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::InvalidResponse {
                message: e.to_string(),
            })?;

        if parsed.access_token.trim().is_empty() {
            return Err(AuthError::InvalidResponse {
                message: "access_token is empty".to_string(),
            });
        }

        debug!(expires_in = ?parsed.expires_in, "obtained access token");
        Ok(parsed.into())
    }
}

impl std::fmt::Debug for OAuth2TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2TokenProvider")
            .field("token_url", &self.token_url)
            .field("credentials", &self.credentials)
            .field("scope", &self.scope)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_defaults() {
        let response: TokenResponse = serde_json::from_str(r#"{"access_token": "abc"}"#).unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert!(response.expires_in.is_none());

        let token: AccessToken = response.into();
        assert_eq!(token.value(), "abc");
        assert!(token.expires_at().is_none());
    }

    #[test]
    fn test_token_response_with_expiry() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token": "abc", "token_type": "bearer", "expires_in": 3600, "scope": "client_credentials"}"#,
        )
        .unwrap();
        let token: AccessToken = response.into();
        assert!(token.expires_at().is_some());
        assert!(!token.is_expired());
    }

    #[test]
    fn test_form_params() {
        let provider = OAuth2TokenProvider::new(
            reqwest::Client::new(),
            "http://localhost/token",
            ClientCredentials::new("id", "secret"),
        );
        assert_eq!(
            provider.form_params(),
            vec![("grant_type", "client_credentials".to_string())]
        );

        let scoped = provider.with_scope("client_credentials");
        assert_eq!(scoped.form_params().len(), 2);
        assert_eq!(scoped.form_params()[1].1, "client_credentials");

        let blank = OAuth2TokenProvider::new(
            reqwest::Client::new(),
            "http://localhost/token",
            ClientCredentials::new("id", "secret"),
        )
        .with_scope("  ");
        assert_eq!(blank.form_params().len(), 1);
    }

    #[test]
    fn test_debug_hides_secret() {
        let provider = OAuth2TokenProvider::new(
            reqwest::Client::new(),
            "http://localhost/token",
            ClientCredentials::new("id", "top-secret"),
        );
        assert!(!format!("{:?}", provider).contains("top-secret"));
    }
}
