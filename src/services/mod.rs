//! Service adapters for SER API operations.
//!
//! Services turn domain types into [`SerRequest`](crate::http::SerRequest)s
//! and parse the responses. They share one [`HttpClient`](crate::http::HttpClient), which owns
//! authentication and retries.
//!
//! - **send**: Submit a [`Message`](crate::types::Message) to `/send`

pub mod send;

pub use send::SendService;
