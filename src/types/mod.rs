//! Types for SER mail operations.
//!
//! These types mirror the JSON documents accepted and returned by the
//! `/send` endpoint: addresses, body parts, attachments, the message itself
//! and the send result.

mod attachment;
mod email;
mod message;
mod responses;

pub use attachment::*;
pub use email::*;
pub use message::*;
pub use responses::*;

pub(crate) use attachment::{encode_base64, is_valid_base64};
