//! Static token provider.

use async_trait::async_trait;

use super::{AccessToken, AuthError, TokenProvider};

/// Always returns the same token.
///
/// Useful for pre-issued tokens and tests.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: AccessToken,
}

impl StaticTokenProvider {
    /// Create a provider for `token`.
    pub fn new(token: AccessToken) -> Self {
        Self { token }
    }

    /// Create a provider from a raw bearer token value.
    pub fn from_value(value: impl Into<String>) -> Self {
        Self::new(AccessToken::new(value))
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<AccessToken, AuthError> {
        Ok(self.token.clone())
    }
}
