//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while obtaining an access token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The token endpoint rejected the request.
    #[error("Token request failed with status {status}: {message}")]
    TokenRequest {
        /// HTTP status returned by the token endpoint.
        status: u16,
        /// OAuth error description, or the raw body.
        message: String,
    },

    /// The token endpoint answered with something that is not a token.
    #[error("Invalid token response: {message}")]
    InvalidResponse {
        /// Details about the parse failure.
        message: String,
    },

    /// The token endpoint could not be reached.
    #[error("Token endpoint unreachable: {message}")]
    Transport {
        /// Details about the network failure.
        message: String,
        /// Whether trying again may succeed.
        retryable: bool,
    },
}

impl AuthError {
    /// Returns true if trying again may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AuthError::Transport { retryable, .. } => *retryable,
            AuthError::TokenRequest { status, .. } => matches!(status, 429 | 502..=504),
            AuthError::InvalidResponse { .. } => false,
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Transport {
            retryable: err.is_connect() || err.is_timeout(),
            message: err.to_string(),
        }
    }
}
