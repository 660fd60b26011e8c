//! Advanced SER Send Example
//!
//! This example demonstrates how to:
//! - Reference inline images by a fixed or generated content ID
//! - Attach files, base64 payloads and raw bytes
//! - Add CC, BCC and Reply-To recipients
//! - Override the `From` header shown to recipients
//!
//! Image and file paths come from `SER_DEMO_DIR` (default `./demo-files`),
//! which should hold `logo_a.png`, `logo_b.png` and `file.csv`.

use std::path::PathBuf;

use integrations_ser_mail::{Attachment, AttachmentBuilder, ContentType, Message, SerClient, SerError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let key_file = std::env::var("SER_API_KEY_FILE").unwrap_or_else(|_| "../ser.api_key".to_string());
    let client = SerClient::from_api_key_file(&key_file)?;

    let demo_dir = PathBuf::from(std::env::var("SER_DEMO_DIR").unwrap_or_else(|_| "demo-files".to_string()));

    // Inline image with a generated content ID
    let logo_b = AttachmentBuilder::new()
        .from_file(demo_dir.join("logo_b.png"))?
        .inline()
        .build()?;

    let html = format!(
        "<b>Static CID</b><br><img src=\"cid:logo\"><br><b>Dynamic CID</b><br><img src=\"cid:{}\">",
        logo_b.cid().unwrap_or_default()
    );

    let message = Message::builder()
        .subject("This is a test email")
        .from(("sender@example.com", "Joe Sender"))
        .add_content("This is a test message", ContentType::Text)
        .add_content(html, ContentType::Html)
        .attachment(logo_b)
        .attachment(
            AttachmentBuilder::new()
                .from_file(demo_dir.join("logo_a.png"))?
                .inline_with_id("logo")
                .build()?,
        )
        .to(("recipient1@example.com", "Recipient 1"))
        .to(("recipient2@example.com", "Recipient 2"))
        .cc(("cc1@example.com", "CC Recipient 1"))
        .cc(("cc2@example.com", "CC Recipient 2"))
        .bcc(("bcc1@example.com", "BCC Recipient 1"))
        .bcc(("bcc2@example.com", "BCC Recipient 2"))
        .attachment(Attachment::from_base64("VGhpcyBpcyBhIHRlc3Qh", "test.txt")?)
        .attachment(Attachment::from_file(demo_dir.join("file.csv"))?)
        .attachment(
            AttachmentBuilder::new()
                .from_bytes(b"Sample bytes", "bytes.txt")
                .mime_type("text/plain")
                .build()?,
        )
        .header_from(("fancysender@example.com", "Header From"))
        .reply_to(("noreply@proofpoint.com", "No Reply"))
        .build()?;

    println!("Sending to {} recipients with {} attachments", message.recipient_count(), message.attachments().len());

    match client.send(&message).await {
        Ok(result) => {
            println!("HTTP Response: {}/{}", result.status, result.http_reason);
            println!("Message ID: {}", result.message_id.as_deref().unwrap_or(""));
            println!("Reason: {}", result.reason.as_deref().unwrap_or(""));
            println!("Request ID: {}", result.request_id.as_deref().unwrap_or(""));
        }
        Err(SerError::Api { status, reason, request_id, .. }) => {
            eprintln!("HTTP Response: {}/{}", status, reason);
            eprintln!("Request ID: {}", request_id.as_deref().unwrap_or(""));
        }
        Err(e) => {
            eprintln!("Failed to send message: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
