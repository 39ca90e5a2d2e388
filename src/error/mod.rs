//! Error types for the SocketLabs Injection API client.
//!
//! Business-rule violations found before a request is sent (empty subject,
//! invalid recipients, blank API key, ...) are **not** errors: they come back
//! as a [`SendResponse`](crate::types::SendResponse) carrying a validation
//! [`SendResult`](crate::types::SendResult). The [`SocketLabsError`] enum only
//! covers conditions the caller cannot recover from by editing the message:
//!
//! - Configuration errors (retry bounds, endpoint URL, proxy)
//! - Transport errors (connection failures, 5xx responses, per-attempt timeouts)
//! - Exhausted retries
//! - Caller-initiated cancellation
//! - Malformed response bodies
//!
//! # Examples
//!
//! ```rust
//! use integrations_socketlabs::error::SocketLabsError;
//!
//! fn describe(error: &SocketLabsError) -> &'static str {
//!     if error.is_cancelled() {
//!         "we gave up"
//!     } else if error.is_timeout() {
//!         "the network gave up"
//!     } else {
//!         "something else went wrong"
//!     }
//! }
//!
//! assert_eq!(describe(&SocketLabsError::Cancelled), "we gave up");
//! ```

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for SocketLabs operations.
pub type SocketLabsResult<T> = Result<T, SocketLabsError>;

/// Top-level error type for the SocketLabs Injection API client.
#[derive(Debug, Error)]
pub enum SocketLabsError {
    /// The client is misconfigured.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The request could not be delivered to the Injection API.
    ///
    /// Connection failures are retryable; failures while building the HTTP
    /// client are not.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport error.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Whether this error is retryable.
        retryable: bool,
    },

    /// A single HTTP attempt exceeded the configured request timeout.
    #[error("Timeout: {message}")]
    Timeout {
        /// Description of the timeout.
        message: String,
    },

    /// The Injection API answered with 500, 502, 503 or 504.
    #[error("Server error: HTTP {status}")]
    ServerError {
        /// HTTP status code returned by the server.
        status: u16,
        /// Raw response body, if any.
        body: String,
    },

    /// Every allowed attempt failed with a retryable error.
    #[error("Request failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Total number of attempts made, including the first one.
        attempts: u32,
        /// The failure of the last attempt.
        #[source]
        source: Box<SocketLabsError>,
    },

    /// The caller cancelled the send.
    #[error("Send cancelled by caller")]
    Cancelled,

    /// A request could not be encoded or a response could not be decoded.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
    },

    /// Reading attachment content failed.
    #[error("I/O error: {message}")]
    Io {
        /// Description of the failed operation.
        message: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The blocking entry point was used where it would deadlock.
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the runtime error.
        message: String,
    },
}

impl SocketLabsError {
    /// Returns true if the retry handler may attempt the request again.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use integrations_socketlabs::error::SocketLabsError;
    ///
    /// let error = SocketLabsError::ServerError {
    ///     status: 503,
    ///     body: String::new(),
    /// };
    /// assert!(error.is_retryable());
    /// assert!(!SocketLabsError::Cancelled.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            SocketLabsError::Transport { retryable, .. } => *retryable,
            SocketLabsError::Timeout { .. } => true,
            SocketLabsError::ServerError { .. } => true,
            _ => false,
        }
    }

    /// Returns true if the error is a request timeout, either directly or as
    /// the last failure behind exhausted retries.
    pub fn is_timeout(&self) -> bool {
        match self {
            SocketLabsError::Timeout { .. } => true,
            SocketLabsError::RetriesExhausted { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// Returns true if the caller cancelled the send.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SocketLabsError::Cancelled)
    }

    /// Returns the HTTP status code carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SocketLabsError::ServerError { status, .. } => Some(*status),
            SocketLabsError::RetriesExhausted { source, .. } => source.status(),
            _ => None,
        }
    }
}

impl From<ConfigError> for SocketLabsError {
    fn from(err: ConfigError) -> Self {
        SocketLabsError::Configuration {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for SocketLabsError {
    fn from(err: serde_json::Error) -> Self {
        SocketLabsError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for SocketLabsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return SocketLabsError::Timeout {
                message: err.to_string(),
            };
        }

        let retryable = err.is_connect() || err.is_request() || err.is_body();
        SocketLabsError::Transport {
            message: err.to_string(),
            source: Some(Box::new(err)),
            retryable,
        }
    }
}
