//! Response types for SER API operations.

use serde::{Deserialize, Serialize};

/// Result of a successful `/send` call.
///
/// The relay body carries the identifiers; `status` and `http_reason` are
/// filled in from the HTTP response itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    /// Identifier assigned to the accepted message.
    #[serde(default, alias = "messageId", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Explanation returned by the relay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Request ID for support tickets.
    #[serde(default, alias = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// HTTP status code of the response.
    #[serde(skip)]
    pub status: u16,

    /// Canonical reason phrase of the HTTP status.
    #[serde(skip)]
    pub http_reason: String,
}

impl SendResult {
    /// Returns true if the relay accepted the message.
    pub fn is_accepted(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
