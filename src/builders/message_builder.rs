//! Message builder.

use crate::builders::BuilderError;
use crate::types::{Attachment, Content, ContentType, MailUser, Message, MessageHeaders};

/// Builder for constructing a [`Message`] with a fluent API.
///
/// Recipient methods append, so `to`, `cc`, `bcc` and `reply_to` can be
/// called repeatedly. Body parts keep the order they were added in.
///
/// # Examples
///
/// ```rust
/// use integrations_ser_mail::builders::MessageBuilder;
///
/// let message = MessageBuilder::new()
///     .from(("noreply@example.com", "Billing"))
///     .header_from("billing@example.com")
///     .to("customer@example.com")
///     .cc("accounts@example.com")
///     .reply_to("support@example.com")
///     .subject("Your invoice")
///     .text("Your invoice is attached.")
///     .html("<p>Your invoice is attached.</p>")
///     .build()?;
///
/// assert_eq!(message.content().len(), 2);
/// # Ok::<(), integrations_ser_mail::builders::BuilderError>(())
/// ```
#[derive(Debug, Default, Clone)]
pub struct MessageBuilder {
    sender: Option<MailUser>,
    header_from: Option<MailUser>,
    subject: Option<String>,
    content: Vec<Content>,
    to: Vec<MailUser>,
    cc: Vec<MailUser>,
    bcc: Vec<MailUser>,
    reply_to: Vec<MailUser>,
    attachments: Vec<Attachment>,
}

impl MessageBuilder {
    /// Create a new message builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the envelope sender. Required.
    pub fn from(mut self, sender: impl Into<MailUser>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Set the `From` header shown to recipients when it should differ from
    /// the envelope sender.
    pub fn header_from(mut self, header_from: impl Into<MailUser>) -> Self {
        self.header_from = Some(header_from.into());
        self
    }

    /// Add a "To" recipient. At least one is required.
    pub fn to(mut self, recipient: impl Into<MailUser>) -> Self {
        self.to.push(recipient.into());
        self
    }

    /// Add a "CC" recipient.
    pub fn cc(mut self, recipient: impl Into<MailUser>) -> Self {
        self.cc.push(recipient.into());
        self
    }

    /// Add a "BCC" recipient.
    pub fn bcc(mut self, recipient: impl Into<MailUser>) -> Self {
        self.bcc.push(recipient.into());
        self
    }

    /// Add a "Reply-To" address.
    pub fn reply_to(mut self, address: impl Into<MailUser>) -> Self {
        self.reply_to.push(address.into());
        self
    }

    /// Set the subject. Required.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Add a body part.
    pub fn content(mut self, content: Content) -> Self {
        self.content.push(content);
        self
    }

    /// Add a body part from its text and type.
    pub fn add_content(self, body: impl Into<String>, content_type: ContentType) -> Self {
        self.content(Content::new(body, content_type))
    }

    /// Add a plain text body part.
    pub fn text(self, body: impl Into<String>) -> Self {
        self.add_content(body, ContentType::Text)
    }

    /// Add an HTML body part.
    pub fn html(self, body: impl Into<String>) -> Self {
        self.add_content(body, ContentType::Html)
    }

    /// Add an attachment.
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Add several attachments.
    pub fn attachments(mut self, attachments: impl IntoIterator<Item = Attachment>) -> Self {
        self.attachments.extend(attachments);
        self
    }

    /// Build the [`Message`].
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::MissingField`] for the first missing piece,
    /// checked in this order: `from`, `tos`, `subject`, `content`.
    pub fn build(self) -> Result<Message, BuilderError> {
        let sender = self.sender.ok_or_else(|| BuilderError::missing_field("from"))?;

        if self.to.is_empty() {
            return Err(BuilderError::missing_field("tos"));
        }

        let subject = self
            .subject
            .ok_or_else(|| BuilderError::missing_field("subject"))?;

        if self.content.is_empty() {
            return Err(BuilderError::missing_field("content"));
        }

        Ok(Message {
            sender,
            subject,
            headers: self.header_from.map(MessageHeaders::new),
            content: self.content,
            to: self.to,
            cc: self.cc,
            bcc: self.bcc,
            reply_to: self.reply_to,
            attachments: self.attachments,
        })
    }
}
