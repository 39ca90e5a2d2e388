//! SocketLabs client implementation.
//!
//! [`SocketLabsClient`] is the entry point for sending messages. Every send
//! runs the same fixed pipeline, stopping at the first stage that does not
//! succeed:
//!
//! 1. Validate the server id and API key.
//! 2. Validate the message (shared fields, then recipients).
//! 3. Build the Injection API request and serialize it to JSON.
//! 4. POST it, retrying transient failures.
//! 5. Parse the response.
//!
//! Validation failures are returned as `Ok(SendResponse)` with a validation
//! [`SendResult`](crate::types::SendResult), without any network traffic.
//!
//! # Example
//!
//! ```rust,no_run
//! use integrations_socketlabs::{BasicMessage, SocketLabsClient, SocketLabsConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SocketLabsConfig::builder()
//!     .server_id(10000)
//!     .api_key("your-injection-api-key")
//!     .build()?;
//! let client = SocketLabsClient::new(config)?;
//!
//! let message = BasicMessage::new()
//!     .subject("Sending a basic message")
//!     .from("from@example.com")
//!     .html_body("<html>This is the Html Body of my message.</html>")
//!     .add_to("recipient@example.com");
//!
//! let response = client.send(&message).await?;
//! println!("{}", response);
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::SocketLabsConfig;
use crate::error::{SocketLabsError, SocketLabsResult};
use crate::http::{ReqwestTransport, RetryHandler, Transport};
use crate::request::{InjectionRequest, InjectionRequestFactory};
use crate::response::InjectionResponseParser;
use crate::types::{BasicMessage, BulkMessage, SendResponse};
use crate::validation::SendValidator;

/// A message the client knows how to validate and turn into a request.
///
/// Implemented by [`BasicMessage`] and [`BulkMessage`].
pub trait Sendable: Send + Sync {
    /// Validate the message. A non-`Success` result stops the send.
    fn validate(&self) -> SendResponse;

    /// Build the Injection API request for this message.
    fn build_request(&self, factory: &InjectionRequestFactory) -> InjectionRequest;
}

impl Sendable for BasicMessage {
    fn validate(&self) -> SendResponse {
        SendValidator::validate_basic_message(self)
    }

    fn build_request(&self, factory: &InjectionRequestFactory) -> InjectionRequest {
        factory.generate_basic(self)
    }
}

impl Sendable for BulkMessage {
    fn validate(&self) -> SendResponse {
        SendValidator::validate_bulk_message(self)
    }

    fn build_request(&self, factory: &InjectionRequestFactory) -> InjectionRequest {
        factory.generate_bulk(self)
    }
}

/// Client for the SocketLabs Injection API.
///
/// The client is cheap to clone. Clones share the HTTP transport, the retry
/// settings and the runtime used by [`send_blocking`](Self::send_blocking).
#[derive(Clone)]
pub struct SocketLabsClient {
    config: Arc<SocketLabsConfig>,
    retry_handler: Arc<RetryHandler>,
    blocking_runtime: Arc<OnceCell<BlockingRuntime>>,
}

impl SocketLabsClient {
    /// Create a client using the reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built, for example
    /// because the proxy URL is rejected.
    pub fn new(config: SocketLabsConfig) -> SocketLabsResult<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client that sends through a custom transport.
    pub fn with_transport(config: SocketLabsConfig, transport: Arc<dyn Transport>) -> Self {
        let retry_handler = RetryHandler::new(
            transport,
            config.endpoint.clone(),
            config.retry,
            config.timeout,
        );

        Self {
            config: Arc::new(config),
            retry_handler: Arc::new(retry_handler),
            blocking_runtime: Arc::new(OnceCell::new()),
        }
    }

    /// Create a client from environment variables.
    ///
    /// See [`SocketLabsConfig::from_env`] for the variables read.
    ///
    /// # Errors
    ///
    /// Returns `SocketLabsError::Configuration` if the environment is
    /// incomplete.
    pub fn from_env() -> SocketLabsResult<Self> {
        Self::new(SocketLabsConfig::from_env()?)
    }

    /// The client configuration.
    pub fn config(&self) -> &SocketLabsConfig {
        &self.config
    }

    /// Send a basic or bulk message.
    ///
    /// # Errors
    ///
    /// Returns an error only when the request could not be completed:
    /// exhausted retries, a non-retryable transport failure, or a malformed
    /// success response. Rejected messages come back as `Ok`.
    pub async fn send<M: Sendable + ?Sized>(&self, message: &M) -> SocketLabsResult<SendResponse> {
        self.send_with_cancellation(message, &CancellationToken::new())
            .await
    }

    /// Send a message, aborting with `SocketLabsError::Cancelled` as soon as
    /// `cancellation` fires.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::time::Duration;
    /// use tokio_util::sync::CancellationToken;
    /// use integrations_socketlabs::{BasicMessage, SocketLabsClient};
    ///
    /// # async fn example(client: SocketLabsClient, message: BasicMessage) {
    /// let token = CancellationToken::new();
    /// let deadline = token.clone();
    /// tokio::spawn(async move {
    ///     tokio::time::sleep(Duration::from_secs(30)).await;
    ///     deadline.cancel();
    /// });
    ///
    /// match client.send_with_cancellation(&message, &token).await {
    ///     Ok(response) => println!("{}", response),
    ///     Err(e) if e.is_cancelled() => println!("gave up"),
    ///     Err(e) => println!("failed: {}", e),
    /// }
    /// # }
    /// ```
    pub async fn send_with_cancellation<M: Sendable + ?Sized>(
        &self,
        message: &M,
        cancellation: &CancellationToken,
    ) -> SocketLabsResult<SendResponse> {
        let credentials =
            SendValidator::validate_credentials(self.config.server_id, self.config.api_key());
        if !credentials.is_success() {
            debug!(result = %credentials.result, "Credentials rejected before sending");
            return Ok(credentials);
        }

        let verdict = message.validate();
        if !verdict.is_success() {
            debug!(
                result = %verdict.result,
                invalid_addresses = verdict.address_results.len(),
                "Message rejected before sending"
            );
            return Ok(verdict);
        }

        let factory = InjectionRequestFactory::new(self.config.server_id, self.config.api_key());
        let body = message.build_request(&factory).to_json()?;
        debug!(bytes = body.len(), "Built injection request");

        let raw = self.retry_handler.send(body, cancellation).await?;
        debug!(status = raw.status, "Received injection response");

        let response = InjectionResponseParser::parse_raw(&raw)?;
        info!(
            result = %response.result,
            transaction_receipt = response.transaction_receipt.as_deref().unwrap_or(""),
            "Send completed"
        );

        Ok(response)
    }

    /// Send a message from synchronous code.
    ///
    /// The send runs on a single-worker runtime owned by the client, created
    /// on first use and shared by clones. The worker keeps running between
    /// calls, so `send_blocking` and [`send`](Self::send) can be mixed freely
    /// on the same client. Dropping the last clone shuts the runtime down in
    /// the background, which is safe from async code too.
    ///
    /// # Errors
    ///
    /// Returns `SocketLabsError::Runtime` when called from within a tokio
    /// runtime, where blocking would stall the executor. Use
    /// [`send`](Self::send) there instead.
    pub fn send_blocking<M: Sendable + ?Sized>(&self, message: &M) -> SocketLabsResult<SendResponse> {
        if Handle::try_current().is_ok() {
            return Err(SocketLabsError::Runtime {
                message: "send_blocking called from within an async runtime; use send instead"
                    .to_string(),
            });
        }

        let runtime = self
            .blocking_runtime
            .get_or_try_init(BlockingRuntime::start)?;

        runtime.block_on(self.send(message))?
    }
}

/// Runtime driving [`SocketLabsClient::send_blocking`].
///
/// Connection tasks spawned by reqwest during a blocking send live on the
/// worker thread and outlive the call, because the connection pool is shared
/// with async sends.
struct BlockingRuntime(Option<Runtime>);

impl BlockingRuntime {
    fn start() -> SocketLabsResult<Self> {
        Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("socketlabs-blocking")
            .enable_all()
            .build()
            .map(|runtime| Self(Some(runtime)))
            .map_err(|e| SocketLabsError::Runtime {
                message: format!("Failed to start runtime: {}", e),
            })
    }

    fn block_on<F: Future>(&self, future: F) -> SocketLabsResult<F::Output> {
        match &self.0 {
            Some(runtime) => Ok(runtime.block_on(future)),
            None => Err(SocketLabsError::Runtime {
                message: "Blocking runtime has been shut down".to_string(),
            }),
        }
    }
}

impl Drop for BlockingRuntime {
    fn drop(&mut self) {
        // A plain drop blocks and panics inside an async context.
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}

impl std::fmt::Debug for SocketLabsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketLabsClient")
            .field("config", &self.config)
            .finish()
    }
}
