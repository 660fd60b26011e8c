//! The outbound message document.

use serde::Serialize;
use std::fmt;

use super::{Attachment, Content, MailUser, MessageHeaders};
use crate::builders::MessageBuilder;

/// An email ready to be submitted to the `/send` endpoint.
///
/// Build one with [`Message::builder`]. Empty recipient lists, body lists
/// and attachment lists are left out of the JSON document entirely.
///
/// # Examples
///
/// ```rust
/// use integrations_ser_mail::types::{MailUser, Message};
///
/// let message = Message::builder()
///     .from(MailUser::with_name("sender@example.com", "Sender"))
///     .to("recipient@example.com")
///     .subject("Quarterly report")
///     .text("See attached.")
///     .build()?;
///
/// let json = message.to_json()?;
/// assert!(json.contains(r#""tos":[{"email":"recipient@example.com","name":null}]"#));
/// assert!(!json.contains("replyTos"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    #[serde(rename = "from")]
    pub(crate) sender: MailUser,
    pub(crate) subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) headers: Option<MessageHeaders>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) content: Vec<Content>,
    #[serde(rename = "tos", skip_serializing_if = "Vec::is_empty")]
    pub(crate) to: Vec<MailUser>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) cc: Vec<MailUser>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) bcc: Vec<MailUser>,
    #[serde(rename = "replyTos", skip_serializing_if = "Vec::is_empty")]
    pub(crate) reply_to: Vec<MailUser>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) attachments: Vec<Attachment>,
}

impl Message {
    /// Start building a message.
    pub fn builder() -> MessageBuilder {
        MessageBuilder::new()
    }

    /// Envelope sender.
    pub fn sender(&self) -> &MailUser {
        &self.sender
    }

    /// Subject line.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Extra headers, if any were set.
    pub fn headers(&self) -> Option<&MessageHeaders> {
        self.headers.as_ref()
    }

    /// Body parts in the order they were added.
    pub fn content(&self) -> &[Content] {
        &self.content
    }

    /// Primary recipients.
    pub fn to(&self) -> &[MailUser] {
        &self.to
    }

    /// Carbon copy recipients.
    pub fn cc(&self) -> &[MailUser] {
        &self.cc
    }

    /// Blind carbon copy recipients.
    pub fn bcc(&self) -> &[MailUser] {
        &self.bcc
    }

    /// Reply-To addresses.
    pub fn reply_to(&self) -> &[MailUser] {
        &self.reply_to
    }

    /// Attachments, inline and regular.
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Total number of recipients across `to`, `cc` and `bcc`.
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }

    /// Compact JSON, as sent on the wire.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = self.to_json_pretty().map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
