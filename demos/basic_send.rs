//! Basic SER Send Example
//!
//! This example demonstrates how to:
//! - Load OAuth2 client credentials from an API key file
//! - Build a plain text message
//! - Send it and print the relay's answer
//!
//! Credentials are read from `../ser.api_key`, a JSON document with
//! `client_id` and `client_secret`. Set `SER_API_KEY_FILE` to use another
//! path. `RUST_LOG=integrations_ser_mail=debug` shows the request flow.

use integrations_ser_mail::{Message, SerClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let key_file = std::env::var("SER_API_KEY_FILE").unwrap_or_else(|_| "../ser.api_key".to_string());
    let client = SerClient::from_api_key_file(&key_file)?;

    let message = Message::builder()
        .subject("This is a test email")
        .from(("sender@example.com", "Joe Sender"))
        .text("This is a test message")
        .to(("recipient1@example.com", "Recipient 1"))
        .build()?;

    let result = client.send(&message).await?;

    println!("HTTP Response: {}/{}", result.status, result.http_reason);
    println!("Message ID: {}", result.message_id.as_deref().unwrap_or(""));
    println!("Reason: {}", result.reason.as_deref().unwrap_or(""));
    println!("Request ID: {}", result.request_id.as_deref().unwrap_or(""));

    Ok(())
}
