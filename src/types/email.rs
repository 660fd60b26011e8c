//! Address and body types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An email address with an optional display name.
///
/// The relay expects the `name` key to be present even when empty, so a
/// missing name serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MailUser {
    /// Email address (e.g., "user@example.com").
    pub email: String,
    /// Display name (e.g., "Jane Doe").
    #[serde(default)]
    pub name: Option<String>,
}

impl MailUser {
    /// Create a mail user without a display name.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    /// Create a mail user with a display name.
    pub fn with_name(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }

    /// Format the address the way it appears in a header.
    pub fn format(&self) -> String {
        match &self.name {
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }
}

impl From<String> for MailUser {
    fn from(email: String) -> Self {
        Self::new(email)
    }
}

impl From<&str> for MailUser {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}

impl From<(&str, &str)> for MailUser {
    fn from((email, name): (&str, &str)) -> Self {
        Self::with_name(email, name)
    }
}

impl fmt::Display for MailUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// MIME type of a message body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    /// Plain text body.
    #[serde(rename = "text/plain")]
    Text,
    /// HTML body.
    #[serde(rename = "text/html")]
    Html,
}

impl ContentType {
    /// The MIME string sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text/plain",
            ContentType::Html => "text/html",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single body part of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    body: String,
    #[serde(rename = "type")]
    content_type: ContentType,
}

impl Content {
    /// Create a body part.
    pub fn new(body: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            body: body.into(),
            content_type,
        }
    }

    /// Create a plain text body part.
    pub fn text(body: impl Into<String>) -> Self {
        Self::new(body, ContentType::Text)
    }

    /// Create an HTML body part.
    pub fn html(body: impl Into<String>) -> Self {
        Self::new(body, ContentType::Html)
    }

    /// The body text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The body MIME type.
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }
}

/// Headers sent alongside the envelope.
///
/// Currently only the `From` header, which lets the visible sender differ
/// from the envelope sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeaders {
    #[serde(rename = "from")]
    header_from: MailUser,
}

impl MessageHeaders {
    /// Create headers with the given `From`.
    pub fn new(header_from: impl Into<MailUser>) -> Self {
        Self {
            header_from: header_from.into(),
        }
    }

    /// The `From` header value.
    pub fn header_from(&self) -> &MailUser {
        &self.header_from
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mail_user_serializes_null_name() {
        let user = MailUser::new("a@example.com");
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({"email": "a@example.com", "name": null})
        );
    }

    #[test]
    fn test_mail_user_conversions() {
        let user: MailUser = ("a@example.com", "Alice").into();
        assert_eq!(user.name.as_deref(), Some("Alice"));
        assert_eq!(user.to_string(), "Alice <a@example.com>");

        let user: MailUser = "b@example.com".into();
        assert_eq!(user.to_string(), "b@example.com");
    }

    #[test]
    fn test_content_wire_format() {
        let content = Content::html("<b>hi</b>");
        assert_eq!(
            serde_json::to_value(&content).unwrap(),
            json!({"body": "<b>hi</b>", "type": "text/html"})
        );
        assert_eq!(Content::text("x").content_type(), ContentType::Text);
    }

    #[test]
    fn test_headers_wire_format() {
        let headers = MessageHeaders::new(MailUser::with_name("h@example.com", "Header"));
        assert_eq!(
            serde_json::to_value(&headers).unwrap(),
            json!({"from": {"email": "h@example.com", "name": "Header"}})
        );
    }
}
