//! Secure Email Relay (SER) Mail API Integration Module
//!
//! Async, type-safe client for submitting mail through the SER REST API.
//!
//! # Features
//!
//! - **Message Model**: Senders, recipients, text/HTML content and attachments
//! - **Fluent Builders**: Validated construction of messages and attachments
//! - **MIME Deduction**: Attachment content types guessed from filenames
//! - **OAuth2**: Client credentials grant with token caching and refresh
//! - **Resilience**: Retry with exponential backoff on transient failures
//! - **Error Handling**: Typed errors with status, request ID and retryability
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use integrations_ser_mail::{Message, SerClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SerClient::from_api_key_file("../ser.api_key")?;
//!
//!     let message = Message::builder()
//!         .from("sender@example.com")
//!         .to("recipient@example.com")
//!         .subject("Hello from SER")
//!         .text("This is a test email.")
//!         .build()?;
//!
//!     let result = client.send(&message).await?;
//!     println!("HTTP Response: {}/{}", result.status, result.http_reason);
//!     println!("Message ID: {:?}", result.message_id);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Attachments
//!
//! ```rust,no_run
//! use integrations_ser_mail::{Attachment, AttachmentBuilder, Message};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let logo = AttachmentBuilder::new()
//!     .from_file("logo.png")?
//!     .inline_with_id("logo")
//!     .build()?;
//!
//! let message = Message::builder()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Report")
//!     .html(format!("<img src=\"cid:{}\">", logo.cid().unwrap_or_default()))
//!     .attachment(logo)
//!     .attachment(Attachment::from_bytes(b"a,b\n1,2\n", "report.csv")?)
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! ```rust,no_run
//! use integrations_ser_mail::{Message, SerClient, SerError};
//!
//! # async fn example(client: &SerClient, message: &Message) {
//! match client.send(message).await {
//!     Ok(result) => println!("Accepted: {:?}", result.message_id),
//!     Err(SerError::Validation { message, .. }) => eprintln!("Rejected: {}", message),
//!     Err(SerError::RateLimited { retry_after, .. }) => eprintln!("Slow down: {:?}", retry_after),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod builders;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod services;
pub mod types;

// Client
pub use client::{SerClient, SerClientBuilder};

// Configuration
pub use config::{ConfigError, RetryConfig, SerConfig, SerConfigBuilder};

// Authentication
pub use auth::{
    AccessToken, AuthError, CachedTokenProvider, ClientCredentials, OAuth2TokenProvider,
    StaticTokenProvider, TokenProvider,
};

// Errors
pub use error::{SerError, SerResult};

// HTTP
pub use http::{HttpClient, HttpMethod, SerHttpClient, SerRequest, SerResponse};

// Services
pub use services::SendService;

// Message model
pub use types::{
    deduce_mime_type, Attachment, Content, ContentType, Disposition, MailUser, Message,
    MessageHeaders, SendResult,
};

// Builders
pub use builders::{AttachmentBuilder, AttachmentOptions, BuilderError, MessageBuilder};

/// Create a new SER client from `SER_*` environment variables.
///
/// ```rust,no_run
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = integrations_ser_mail::create_client_from_env()?;
/// # Ok(())
/// # }
/// ```
pub fn create_client_from_env() -> SerResult<SerClient> {
    SerClient::from_env()
}

/// Create a new SER client with explicit configuration.
pub fn create_client(config: SerConfig) -> SerResult<SerClient> {
    SerClient::new(config)
}
