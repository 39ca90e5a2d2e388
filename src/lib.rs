//! SocketLabs Injection API client
//!
//! Async, type-safe client for sending email through the SocketLabs
//! Injection API.
//!
//! # Features
//!
//! - **Basic and bulk messages**: To/Cc/Bcc messages, or per-recipient
//!   personalized messages driven by merge fields
//! - **Local validation**: Subject, sender, body, headers, metadata and
//!   recipients are checked before any network traffic
//! - **Resilience**: Retries server errors, connection failures and timeouts
//!   with jittered exponential backoff
//! - **Cancellation**: Every send can be aborted with a `CancellationToken`
//! - **Sync or async**: `send` on tokio, `send_blocking` from plain threads
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use integrations_socketlabs::{BulkMessage, BulkRecipient, SocketLabsClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads SOCKETLABS_SERVER_ID and SOCKETLABS_INJECTION_API_KEY
//!     let client = SocketLabsClient::from_env()?;
//!
//!     let message = BulkMessage::new()
//!         .subject("Your order %%OrderId%% has shipped")
//!         .from(("orders@example.com", "Example Store"))
//!         .html_body("<p>Hi %%RecipientName%%, order %%OrderId%% is on its way.</p>")
//!         .add_to(BulkRecipient::with_name("ada@example.com", "Ada").merge_field("OrderId", "1001"))
//!         .add_to(BulkRecipient::with_name("grace@example.com", "Grace").merge_field("OrderId", "1002"));
//!
//!     let response = client.send(&message).await?;
//!     if response.is_success() {
//!         println!("Sent, receipt {:?}", response.transaction_receipt);
//!     } else {
//!         println!("Not sent: {}", response);
//!         for address in &response.address_results {
//!             println!("  {}", address);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! Rejections are data, not errors. A message that fails local validation, or
//! that the server refuses, comes back as `Ok(SendResponse)` whose
//! [`SendResult`] says why. `Err(SocketLabsError)` is reserved for sends that
//! could not complete:
//!
//! ```rust,no_run
//! use integrations_socketlabs::{BasicMessage, SocketLabsClient, SocketLabsError};
//!
//! # async fn example(client: SocketLabsClient, message: BasicMessage) {
//! match client.send(&message).await {
//!     Ok(response) => println!("{}", response),
//!     Err(SocketLabsError::RetriesExhausted { attempts, source }) => {
//!         eprintln!("gave up after {} attempts: {}", attempts, source);
//!     }
//!     Err(e) => eprintln!("send failed: {}", e),
//! }
//! # }
//! ```
//!
//! # Retries
//!
//! Retries are off by default. Enable them with [`RetrySettings`]:
//!
//! ```rust
//! use std::time::Duration;
//! use integrations_socketlabs::{RetrySettings, SocketLabsConfig};
//!
//! let config = SocketLabsConfig::builder()
//!     .server_id(10000)
//!     .api_key("your-injection-api-key")
//!     .retry(RetrySettings::new(3, Duration::from_secs(1), Duration::from_secs(10))?)
//!     .build()?;
//! # Ok::<(), integrations_socketlabs::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod response;
pub mod types;
pub mod validation;

pub use client::{Sendable, SocketLabsClient};
pub use config::{ConfigError, RetrySettings, SocketLabsConfig, SocketLabsConfigBuilder};
pub use error::{SocketLabsError, SocketLabsResult};
pub use http::{RawResponse, ReqwestTransport, Transport};
pub use types::{
    AddressResult, Attachment, BasicMessage, BulkMessage, BulkRecipient, CustomHeader,
    EmailAddress, MergeData, Metadata, SendResponse, SendResult,
};
pub use validation::SendValidator;
