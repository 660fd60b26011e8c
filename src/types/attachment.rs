//! Attachment types.
//!
//! Attachments travel as base64 text together with their filename, MIME type
//! and disposition. Inline attachments also carry a Content-ID that HTML
//! bodies reference as `cid:<id>`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use uuid::Uuid;

use crate::builders::{AttachmentBuilder, BuilderError};

/// Longest filename the relay accepts.
pub const MAX_FILENAME_LENGTH: usize = 1000;

/// How the receiving client should present an attachment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// A regular, downloadable file.
    #[default]
    Attachment,
    /// A resource referenced from the HTML body by Content-ID.
    Inline,
}

impl Disposition {
    /// The wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Attachment => "attachment",
            Disposition::Inline => "inline",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated message attachment.
///
/// Instances are only created through [`Attachment::new`] or the
/// [`AttachmentBuilder`], so the content is always valid base64, the
/// filename is non-blank and the MIME type is known.
///
/// # Examples
///
/// ```rust
/// use integrations_ser_mail::types::{Attachment, Disposition};
///
/// let logo = Attachment::builder()
///     .from_bytes(vec![0x89, 0x50, 0x4E, 0x47], "logo.png")
///     .inline()
///     .build()?;
///
/// assert_eq!(logo.mime_type(), "image/png");
/// assert_eq!(logo.disposition(), Disposition::Inline);
/// let html = format!(r#"<img src="cid:{}">"#, logo.cid().unwrap());
/// # assert!(html.starts_with("<img"));
/// # Ok::<(), integrations_ser_mail::builders::BuilderError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    content: String,
    disposition: Disposition,
    filename: String,
    #[serde(rename = "type")]
    mime_type: String,
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    content_id: Option<String>,
}

impl Attachment {
    /// Create an attachment from base64 content.
    ///
    /// When `mime_type` is `None` it is deduced from the filename extension.
    /// Inline attachments without a usable `content_id` get a random UUID;
    /// regular attachments never carry one.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidValue`] if the content is not canonical
    /// base64, the filename is blank or longer than
    /// [`MAX_FILENAME_LENGTH`], or no MIME type can be determined.
    pub fn new(
        content: impl Into<String>,
        filename: impl Into<String>,
        mime_type: Option<String>,
        disposition: Disposition,
        content_id: Option<String>,
    ) -> Result<Self, BuilderError> {
        let content = content.into();
        let filename = filename.into();

        if !is_valid_base64(&content) {
            return Err(BuilderError::invalid_value(
                "content",
                "Content must be a valid Base64-encoded string",
            ));
        }
        if filename.trim().is_empty() {
            return Err(BuilderError::invalid_value(
                "filename",
                "Filename must be a non-empty string",
            ));
        }
        if filename.chars().count() > MAX_FILENAME_LENGTH {
            return Err(BuilderError::invalid_value(
                "filename",
                format!("Filename must be at most {} characters long", MAX_FILENAME_LENGTH),
            ));
        }

        let mime_type = match mime_type {
            Some(explicit) => explicit,
            None => deduce_mime_type(&filename).ok_or_else(|| {
                BuilderError::invalid_value(
                    "mime_type",
                    format!("Unable to deduce MIME type for file: {}", filename),
                )
            })?,
        };
        if mime_type.trim().is_empty() {
            return Err(BuilderError::invalid_value(
                "mime_type",
                "Mime type must be a non-empty string",
            ));
        }

        let content_id = match disposition {
            Disposition::Attachment => None,
            Disposition::Inline => Some(
                content_id
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(|| Uuid::new_v4().to_string()),
            ),
        };

        Ok(Self {
            content,
            disposition,
            filename,
            mime_type,
            content_id,
        })
    }

    /// Start building an attachment.
    pub fn builder() -> AttachmentBuilder {
        AttachmentBuilder::new()
    }

    /// Create a regular attachment from base64 content.
    pub fn from_base64(
        content: impl Into<String>,
        filename: impl Into<String>,
    ) -> Result<Self, BuilderError> {
        Self::new(content, filename, None, Disposition::Attachment, None)
    }

    /// Create a regular attachment from raw bytes.
    pub fn from_bytes(data: impl AsRef<[u8]>, filename: impl Into<String>) -> Result<Self, BuilderError> {
        Self::new(encode_base64(data), filename, None, Disposition::Attachment, None)
    }

    /// Create a regular attachment from a file on disk, named after the file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BuilderError> {
        AttachmentBuilder::new().from_file(path)?.build()
    }

    /// The base64 encoded content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The filename shown to recipients.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The MIME type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The disposition.
    pub fn disposition(&self) -> Disposition {
        self.disposition
    }

    /// The Content-ID, set only for inline attachments.
    pub fn content_id(&self) -> Option<&str> {
        self.content_id.as_deref()
    }

    /// Shorthand for [`Attachment::content_id`].
    pub fn cid(&self) -> Option<&str> {
        self.content_id()
    }
}

/// Guess a MIME type from a filename extension.
///
/// ```rust
/// use integrations_ser_mail::types::deduce_mime_type;
///
/// assert_eq!(deduce_mime_type("report.PDF").as_deref(), Some("application/pdf"));
/// assert_eq!(deduce_mime_type("README"), None);
/// ```
pub fn deduce_mime_type(filename: &str) -> Option<String> {
    mime_guess::from_path(filename)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

pub(crate) fn encode_base64(data: impl AsRef<[u8]>) -> String {
    STANDARD.encode(data)
}

/// Canonical standard base64: decoding and re-encoding must give the input back.
pub(crate) fn is_valid_base64(s: &str) -> bool {
    match STANDARD.decode(s) {
        Ok(decoded) => STANDARD.encode(decoded) == s,
        Err(_) => false,
    }
}
