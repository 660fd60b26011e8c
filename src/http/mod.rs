//! HTTP module for SER API communication.
//!
//! ```text
//! ┌─────────────────┐
//! │  SerHttpClient  │  - Bearer token per attempt
//! │                 │  - Token refresh on 401
//! │                 │  - Retry with backoff
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   Transport     │  - HTTP transport abstraction
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   reqwest       │  - Actual HTTP implementation
//! └─────────────────┘
//! ```

mod client;
mod request;
mod response;
mod transport;

pub use client::SerHttpClient;
pub use request::{HttpMethod, SerRequest};
pub use response::SerResponse;
pub use transport::{ReqwestTransport, Transport};

use crate::error::SerResult;
use async_trait::async_trait;

/// Trait for HTTP clients that can send SER requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a request and return the successful response.
    ///
    /// # Errors
    ///
    /// Returns an error if no token can be obtained, the network fails, or
    /// the API answers with a non-success status after all retries.
    async fn send_request(&self, request: SerRequest) -> SerResult<SerResponse>;

    /// The base endpoint URL.
    fn endpoint(&self) -> &str;
}
