//! Error types for the SER mail integration module.
//!
//! The main [`SerError`] enum groups failures by where they come from so that
//! callers can decide whether to retry, re-authenticate or fix the request:
//!
//! - Configuration errors (missing credentials, malformed endpoints)
//! - Authentication errors (token exchange failures, rejected tokens)
//! - Validation errors (builder failures, `400`/`422` responses)
//! - Rate limiting, transport and timeout errors
//! - Other API errors carrying the HTTP status and request ID
//!
//! # Examples
//!
//! ```rust
//! use integrations_ser_mail::error::SerError;
//!
//! fn handle(error: &SerError) {
//!     if error.is_retryable() {
//!         if let Some(delay) = error.retry_after() {
//!             println!("retry after {:?}", delay);
//!         }
//!     }
//!
//!     if let Some(request_id) = error.request_id() {
//!         println!("request id: {}", request_id);
//!     }
//! }
//! ```

mod mapping;

pub use mapping::{map_api_error, parse_error_response, ApiErrorResponse};
pub(crate) use mapping::parse_retry_after;

use std::time::Duration;
use thiserror::Error;

use crate::auth::AuthError;
use crate::builders::BuilderError;
use crate::config::ConfigError;

/// Result type alias for SER operations.
pub type SerResult<T> = Result<T, SerError>;

/// Top-level error type for the SER mail integration.
#[derive(Debug, Error)]
pub enum SerError {
    /// The client is misconfigured.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Token acquisition failed or the API rejected the bearer token.
    #[error("Authentication error: {message}")]
    Authentication {
        /// Description of the authentication failure.
        message: String,
        /// HTTP status, when the failure came from a response.
        status: Option<u16>,
    },

    /// The message was rejected as invalid, either locally or by the API.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation, if known.
        field: Option<String>,
    },

    /// Network level failure talking to the API.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport error.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Whether this error is retryable.
        retryable: bool,
    },

    /// The request timed out.
    #[error("Timeout: {message}")]
    Timeout {
        /// Description of the timeout.
        message: String,
    },

    /// The API throttled the request (`429`).
    #[error("Rate limited: {message}")]
    RateLimited {
        /// Description of the rate limiting.
        message: String,
        /// Delay suggested by the `Retry-After` header.
        retry_after: Option<Duration>,
    },

    /// Any other non-success response from the API.
    #[error("API error {status}: {reason}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Reason reported by the API, or the raw body.
        reason: String,
        /// Request ID for support tickets.
        request_id: Option<String>,
        /// Whether this error is retryable.
        retryable: bool,
    },

    /// Request or response (de)serialization failed.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
    },
}

impl SerError {
    /// Returns true if the request can safely be sent again.
    ///
    /// Sending is not idempotent, so only failures where the relay cannot
    /// have accepted the message qualify: throttling, connection failures
    /// and gateway errors (`502`, `503`, `504`).
    ///
    /// ```rust
    /// use integrations_ser_mail::error::SerError;
    ///
    /// let error = SerError::RateLimited {
    ///     message: "slow down".to_string(),
    ///     retry_after: None,
    /// };
    /// assert!(error.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            SerError::Transport { retryable, .. } => *retryable,
            SerError::RateLimited { .. } => true,
            SerError::Api { retryable, .. } => *retryable,
            _ => false,
        }
    }

    /// Returns the HTTP status code if the error came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SerError::Api { status, .. } => Some(*status),
            SerError::Authentication { status, .. } => *status,
            SerError::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Returns the API request ID if available.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            SerError::Api { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// Returns the suggested retry delay if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            SerError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Returns true if the API rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SerError::Authentication { status: Some(401), .. })
    }
}

impl From<BuilderError> for SerError {
    fn from(err: BuilderError) -> Self {
        let field = match &err {
            BuilderError::MissingField { field } | BuilderError::InvalidValue { field, .. } => {
                Some(field.clone())
            }
            BuilderError::FileNotFound { .. } | BuilderError::Io { .. } => None,
        };
        SerError::Validation {
            message: err.to_string(),
            field,
        }
    }
}

impl From<ConfigError> for SerError {
    fn from(err: ConfigError) -> Self {
        SerError::Configuration {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<AuthError> for SerError {
    fn from(err: AuthError) -> Self {
        let retryable = err.is_retryable();
        match err {
            AuthError::Transport { message, retryable } => SerError::Transport {
                message: format!("Token request failed: {}", message),
                source: None,
                retryable,
            },
            AuthError::TokenRequest { status: 429, .. } => SerError::RateLimited {
                message: err.to_string(),
                retry_after: None,
            },
            // An unavailable token endpoint is an outage, not a credentials problem.
            AuthError::TokenRequest { status, .. } if retryable => SerError::Api {
                status,
                reason: err.to_string(),
                request_id: None,
                retryable,
            },
            AuthError::TokenRequest { status, .. } => SerError::Authentication {
                message: err.to_string(),
                status: Some(status),
            },
            other => SerError::Authentication {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for SerError {
    fn from(err: serde_json::Error) -> Self {
        SerError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for SerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SerError::Timeout {
                message: err.to_string(),
            }
        } else {
            // A failed connect means nothing reached the relay.
            let retryable = err.is_connect();
            SerError::Transport {
                message: err.to_string(),
                source: Some(Box::new(err)),
                retryable,
            }
        }
    }
}
