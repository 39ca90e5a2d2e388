//! Configuration module for the SocketLabs client.
//!
//! This module provides configuration types and builders for the Injection
//! API client, including:
//!
//! - Server id and API key
//! - Endpoint configuration
//! - Timeout and retry settings
//! - Optional HTTP proxy
//! - User agent customization

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

pub mod error;
pub mod retry;

pub use error::ConfigError;
pub use retry::{RetrySettings, MAXIMUM_ALLOWED_RETRIES, MAXIMUM_RETRY_WAIT};

/// Default Injection API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://inject.socketlabs.com/api/v1/email";

/// Server id used when none has been configured.
pub const UNSET_SERVER_ID: i32 = i32::MIN;

/// Environment variable holding the server id.
pub const SERVER_ID_ENV: &str = "SOCKETLABS_SERVER_ID";

/// Environment variable holding the Injection API key.
pub const API_KEY_ENV: &str = "SOCKETLABS_INJECTION_API_KEY";

/// Environment variable overriding the endpoint.
pub const ENDPOINT_ENV: &str = "SOCKETLABS_ENDPOINT";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default `User-Agent` sent with every request.
pub fn default_user_agent() -> String {
    format!("SocketLabs-rust/{}", env!("CARGO_PKG_VERSION"))
}

/// Configuration for the SocketLabs client.
#[derive(Clone)]
pub struct SocketLabsConfig {
    /// SocketLabs server id.
    pub server_id: i32,

    /// Injection API key.
    pub api_key: SecretString,

    /// Injection API endpoint URL.
    pub endpoint: String,

    /// Timeout for a single HTTP attempt.
    pub timeout: Duration,

    /// Timeout for establishing connections.
    pub connect_timeout: Duration,

    /// Retry settings.
    pub retry: RetrySettings,

    /// User agent string.
    pub user_agent: String,

    /// Optional HTTP(S) proxy URL.
    pub proxy: Option<String>,
}

impl std::fmt::Debug for SocketLabsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketLabsConfig")
            .field("server_id", &self.server_id)
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("retry", &self.retry)
            .field("user_agent", &self.user_agent)
            .field("proxy", &self.proxy)
            .finish()
    }
}

impl SocketLabsConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_socketlabs::config::SocketLabsConfig;
    ///
    /// let config = SocketLabsConfig::builder()
    ///     .server_id(12345)
    ///     .api_key("your-injection-api-key")
    ///     .build()?;
    /// assert_eq!(config.server_id, 12345);
    /// # Ok::<(), integrations_socketlabs::config::ConfigError>(())
    /// ```
    pub fn builder() -> SocketLabsConfigBuilder {
        SocketLabsConfigBuilder::default()
    }

    /// Create a configuration from environment variables.
    ///
    /// This method reads the following environment variables:
    /// - `SOCKETLABS_SERVER_ID` for the server id
    /// - `SOCKETLABS_INJECTION_API_KEY` for the API key
    /// - `SOCKETLABS_ENDPOINT` (optional) to override the endpoint
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if a required variable is unset, or
    /// `ConfigError::Environment` if the server id is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_id = std::env::var(SERVER_ID_ENV).map_err(|_| ConfigError::MissingField {
            field: SERVER_ID_ENV.to_string(),
        })?;
        let server_id = server_id
            .trim()
            .parse::<i32>()
            .map_err(|e| ConfigError::Environment {
                message: format!("{} is not a valid server id: {}", SERVER_ID_ENV, e),
            })?;

        let api_key = std::env::var(API_KEY_ENV).map_err(|_| ConfigError::MissingField {
            field: API_KEY_ENV.to_string(),
        })?;

        let mut builder = Self::builder().server_id(server_id).api_key(api_key);
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            builder = builder.endpoint(endpoint);
        }

        builder.build()
    }

    /// Expose the API key for request building.
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Builder for creating SocketLabs client configurations.
#[derive(Default)]
pub struct SocketLabsConfigBuilder {
    server_id: Option<i32>,
    api_key: Option<SecretString>,
    endpoint: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry: Option<RetrySettings>,
    user_agent: Option<String>,
    proxy: Option<String>,
}

impl SocketLabsConfigBuilder {
    /// Set the SocketLabs server id.
    pub fn server_id(mut self, server_id: i32) -> Self {
        self.server_id = Some(server_id);
        self
    }

    /// Set the Injection API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key.into()));
        self
    }

    /// Set a custom endpoint URL.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_socketlabs::config::SocketLabsConfig;
    ///
    /// let builder = SocketLabsConfig::builder()
    ///     .server_id(12345)
    ///     .api_key("key")
    ///     .endpoint("http://localhost:8080/api/v1/email");
    /// ```
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the per-attempt request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Set the retry settings.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use integrations_socketlabs::config::{RetrySettings, SocketLabsConfig};
    ///
    /// let retry = RetrySettings::new(2, Duration::from_secs(1), Duration::from_secs(5))?;
    /// let config = SocketLabsConfig::builder()
    ///     .server_id(12345)
    ///     .api_key("key")
    ///     .retry(retry)
    ///     .build()?;
    /// assert_eq!(config.retry.max_retries(), 2);
    /// # Ok::<(), integrations_socketlabs::config::ConfigError>(())
    /// ```
    pub fn retry(mut self, settings: RetrySettings) -> Self {
        self.retry = Some(settings);
        self
    }

    /// Set a custom user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Route requests through an HTTP(S) proxy.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Build the configuration.
    ///
    /// Credentials are not checked here: a missing server id or a blank key is
    /// reported by the send validator as `AuthenticationValidationFailed`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the endpoint or proxy is not a valid
    /// URL, or if a timeout is zero.
    pub fn build(self) -> Result<SocketLabsConfig, ConfigError> {
        let endpoint = self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Url::parse(&endpoint).map_err(|e| ConfigError::Invalid {
            message: format!("Invalid endpoint URL '{}': {}", endpoint, e),
        })?;

        if let Some(ref proxy) = self.proxy {
            Url::parse(proxy).map_err(|e| ConfigError::Invalid {
                message: format!("Invalid proxy URL '{}': {}", proxy, e),
            })?;
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::Invalid {
                message: "timeout must be greater than zero".to_string(),
            });
        }

        let connect_timeout = self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        if connect_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                message: "connect_timeout must be greater than zero".to_string(),
            });
        }

        Ok(SocketLabsConfig {
            server_id: self.server_id.unwrap_or(UNSET_SERVER_ID),
            api_key: self
                .api_key
                .unwrap_or_else(|| SecretString::new(String::new())),
            endpoint,
            timeout,
            connect_timeout,
            retry: self.retry.unwrap_or_default(),
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
            proxy: self.proxy,
        })
    }
}
