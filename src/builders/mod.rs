//! Builders for constructing SER messages and attachments.
//!
//! # Builders
//!
//! - [`MessageBuilder`] - For constructing a [`Message`](crate::types::Message)
//! - [`AttachmentBuilder`] - For constructing an [`Attachment`](crate::types::Attachment)
//!   in two steps: pick a source, then set options
//!
//! # Examples
//!
//! ```rust
//! use integrations_ser_mail::builders::{AttachmentBuilder, MessageBuilder};
//!
//! let logo = AttachmentBuilder::new()
//!     .from_bytes(vec![0x89, 0x50, 0x4E, 0x47], "logo.png")
//!     .inline_with_id("logo")
//!     .build()?;
//!
//! let message = MessageBuilder::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Hello World")
//!     .html(r#"<p>Hi</p><img src="cid:logo">"#)
//!     .attachment(logo)
//!     .build()?;
//! # assert_eq!(message.attachments().len(), 1);
//! # Ok::<(), integrations_ser_mail::builders::BuilderError>(())
//! ```

mod attachment_builder;
mod message_builder;

pub use attachment_builder::{AttachmentBuilder, AttachmentOptions};
pub use message_builder::MessageBuilder;

use thiserror::Error;

/// Error type for builder operations.
///
/// Returned when `build()` is called on a builder in an invalid state, or
/// when an attachment source cannot be read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// A required field is missing.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// A field has an invalid value.
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue {
        /// The name of the field with the invalid value.
        field: String,
        /// Description of why the value is invalid.
        message: String,
    },

    /// An attachment file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was looked up.
        path: String,
    },

    /// An attachment file exists but could not be read.
    #[error("Failed to read '{path}': {message}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O error message.
        message: String,
    },
}

impl BuilderError {
    /// Create a new missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a new invalid value error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
