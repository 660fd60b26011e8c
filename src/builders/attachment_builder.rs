//! Two-step attachment builder.
//!
//! The first step picks where the content comes from and returns
//! [`AttachmentOptions`]; the second step adjusts disposition, filename and
//! MIME type before [`AttachmentOptions::build`] validates everything.

use std::path::Path;

use crate::builders::BuilderError;
use crate::types::{encode_base64, is_valid_base64, Attachment, Disposition};

/// Entry point for building an [`Attachment`].
///
/// # Examples
///
/// ```rust
/// use integrations_ser_mail::builders::AttachmentBuilder;
/// use integrations_ser_mail::types::Disposition;
///
/// let report = AttachmentBuilder::new()
///     .from_base64("JVBERi0xLjQ=", "report.pdf")?
///     .build()?;
/// assert_eq!(report.mime_type(), "application/pdf");
/// assert_eq!(report.disposition(), Disposition::Attachment);
///
/// let raw = AttachmentBuilder::new()
///     .from_bytes(b"col1,col2\n1,2\n".to_vec(), "data")
///     .mime_type("text/csv")
///     .filename("data.csv")
///     .build()?;
/// assert_eq!(raw.filename(), "data.csv");
/// # Ok::<(), integrations_ser_mail::builders::BuilderError>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct AttachmentBuilder;

impl AttachmentBuilder {
    /// Create a new attachment builder.
    pub fn new() -> Self {
        Self
    }

    /// Use content that is already base64 encoded.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidValue`] if `content` is not valid base64.
    pub fn from_base64(
        self,
        content: impl Into<String>,
        filename: impl Into<String>,
    ) -> Result<AttachmentOptions, BuilderError> {
        let content = content.into();
        if !is_valid_base64(&content) {
            return Err(BuilderError::invalid_value(
                "content",
                "Content must be a valid Base64-encoded string",
            ));
        }
        Ok(AttachmentOptions::new(content, filename.into()))
    }

    /// Read and encode a file. The attachment is named after the file.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::FileNotFound`] if `path` is not an existing
    /// file and [`BuilderError::Io`] if it cannot be read.
    pub fn from_file(self, path: impl AsRef<Path>) -> Result<AttachmentOptions, BuilderError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        if !path.is_file() {
            return Err(BuilderError::FileNotFound { path: display });
        }

        let data = std::fs::read(path).map_err(|e| BuilderError::Io {
            path: display.clone(),
            message: e.to_string(),
        })?;

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(display);

        Ok(AttachmentOptions::new(encode_base64(data), filename))
    }

    /// Encode raw bytes.
    pub fn from_bytes(self, data: impl AsRef<[u8]>, filename: impl Into<String>) -> AttachmentOptions {
        AttachmentOptions::new(encode_base64(data), filename.into())
    }
}

/// Second step of the attachment builder.
///
/// Defaults to a regular attachment with the MIME type deduced from the
/// filename.
#[derive(Debug, Clone)]
pub struct AttachmentOptions {
    content: String,
    filename: String,
    mime_type: Option<String>,
    disposition: Disposition,
    content_id: Option<String>,
}

impl AttachmentOptions {
    fn new(content: String, filename: String) -> Self {
        Self {
            content,
            filename,
            mime_type: None,
            disposition: Disposition::Attachment,
            content_id: None,
        }
    }

    /// Make this a regular attachment, dropping any Content-ID.
    pub fn attached(mut self) -> Self {
        self.disposition = Disposition::Attachment;
        self.content_id = None;
        self
    }

    /// Make this an inline attachment with a generated Content-ID.
    pub fn inline(mut self) -> Self {
        self.disposition = Disposition::Inline;
        self.content_id = None;
        self
    }

    /// Make this an inline attachment with the given Content-ID.
    pub fn inline_with_id(mut self, content_id: impl Into<String>) -> Self {
        self.disposition = Disposition::Inline;
        self.content_id = Some(content_id.into());
        self
    }

    /// Override the filename.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Set the MIME type instead of deducing it from the filename.
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Validate and build the [`Attachment`].
    pub fn build(self) -> Result<Attachment, BuilderError> {
        Attachment::new(
            self.content,
            self.filename,
            self.mime_type,
            self.disposition,
            self.content_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_base64_rejects_invalid() {
        let err = AttachmentBuilder::new()
            .from_base64("***", "a.txt")
            .unwrap_err();
        assert!(matches!(err, BuilderError::InvalidValue { ref field, .. } if field == "content"));
    }

    #[test]
    fn test_from_file_uses_basename() {
        let mut file = tempfile::Builder::new()
            .prefix("sample")
            .suffix(".txt")
            .tempfile()
            .unwrap();
        file.write_all(b"This is a test!").unwrap();

        let attachment = AttachmentBuilder::new()
            .from_file(file.path())
            .unwrap()
            .build()
            .unwrap();

        let expected_name = file.path().file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(attachment.filename(), expected_name);
        assert_eq!(attachment.content(), "VGhpcyBpcyBhIHRlc3Qh");
        assert_eq!(attachment.mime_type(), "text/plain");
    }

    #[test]
    fn test_from_file_missing() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("gone");

        let err = AttachmentBuilder::new().from_file(&path).unwrap_err();
        assert!(matches!(err, BuilderError::FileNotFound { .. }));
    }

    #[test]
    fn test_from_file_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AttachmentBuilder::new().from_file(dir.path()).unwrap_err();
        assert!(matches!(err, BuilderError::FileNotFound { .. }));
    }

    #[test]
    fn test_inline_then_attached_clears_cid() {
        let attachment = AttachmentBuilder::new()
            .from_bytes(b"png", "logo.png")
            .inline_with_id("logo")
            .attached()
            .build()
            .unwrap();
        assert_eq!(attachment.disposition(), Disposition::Attachment);
        assert!(attachment.cid().is_none());
    }

    #[test]
    fn test_inline_generates_cid() {
        let first = AttachmentBuilder::new()
            .from_bytes(b"png", "logo.png")
            .inline()
            .build()
            .unwrap();
        let second = AttachmentBuilder::new()
            .from_bytes(b"png", "logo.png")
            .inline()
            .build()
            .unwrap();
        assert!(first.cid().is_some());
        assert_ne!(first.cid(), second.cid());
    }

    #[test]
    fn test_explicit_mime_type_and_filename() {
        let attachment = AttachmentBuilder::new()
            .from_bytes(b"{}", "payload")
            .filename("payload.bin")
            .mime_type("application/json")
            .build()
            .unwrap();
        assert_eq!(attachment.filename(), "payload.bin");
        assert_eq!(attachment.mime_type(), "application/json");
    }
}
