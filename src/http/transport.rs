//! Transport layer abstraction for HTTP communication.
//!
//! The default implementation uses reqwest. Tests and alternative HTTP
//! backends can provide their own [`Transport`].

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Proxy};

use crate::config::SocketLabsConfig;
use crate::error::{SocketLabsError, SocketLabsResult};

/// Status code and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Bytes,
}

impl RawResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is one the retry handler treats as a transient
    /// server failure (500, 502, 503 or 504).
    pub fn is_server_error(&self) -> bool {
        matches!(self.status, 500 | 502 | 503 | 504)
    }
}

/// Trait for HTTP transport implementations.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body to `url` and return the response.
    ///
    /// Any HTTP status is a successful exchange. Only failures to get a
    /// response at all are errors.
    ///
    /// # Errors
    ///
    /// Returns `SocketLabsError::Transport` if the connection fails, or
    /// `SocketLabsError::Timeout` if the request times out.
    async fn post(&self, url: &str, body: Bytes) -> SocketLabsResult<RawResponse>;
}

/// Reqwest-based HTTP transport implementation.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    user_agent: String,
}

impl ReqwestTransport {
    /// Create a transport from the client configuration: request and connect
    /// timeouts, user agent, and optional proxy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use integrations_socketlabs::config::SocketLabsConfig;
    /// use integrations_socketlabs::http::ReqwestTransport;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = SocketLabsConfig::builder()
    ///     .server_id(10000)
    ///     .api_key("key")
    ///     .build()?;
    /// let transport = ReqwestTransport::new(&config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: &SocketLabsConfig) -> SocketLabsResult<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout);

        if let Some(proxy) = config.proxy.as_deref() {
            let proxy = Proxy::all(proxy).map_err(|e| SocketLabsError::Configuration {
                message: format!("Invalid proxy '{}'", proxy),
                source: Some(Box::new(e)),
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| SocketLabsError::Transport {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
            retryable: false,
        })?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Get a reference to the underlying reqwest client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(&self, url: &str, body: Bytes) -> SocketLabsResult<RawResponse> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .header(USER_AGENT, self.user_agent.as_str())
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(endpoint: &str) -> SocketLabsConfig {
        SocketLabsConfig::builder()
            .server_id(10000)
            .api_key("key")
            .endpoint(endpoint)
            .user_agent("test-agent/1.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_server_error_statuses() {
        for status in [500, 502, 503, 504] {
            assert!(RawResponse::new(status, "").is_server_error());
        }
        for status in [200, 400, 401, 404, 408, 501, 505] {
            assert!(!RawResponse::new(status, "").is_server_error());
        }
    }

    #[test]
    fn test_invalid_proxy_is_configuration_error() {
        let mut config = config("https://inject.socketlabs.com/api/v1/email");
        config.proxy = Some("::not a proxy::".to_string());

        let result = ReqwestTransport::new(&config);
        assert!(matches!(result, Err(SocketLabsError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_post_sends_json_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/email"))
            .and(header("content-type", "application/json"))
            .and(header("user-agent", "test-agent/1.0"))
            .respond_with(ResponseTemplate::new(401).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/api/v1/email", server.uri());
        let transport = ReqwestTransport::new(&config(&url)).unwrap();
        let response = transport.post(&url, Bytes::from_static(b"{}")).await.unwrap();

        assert_eq!(response.status, 401);
        assert_eq!(response.body, Bytes::from_static(b"{}"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_retryable() {
        let url = "http://127.0.0.1:9/api/v1/email";
        let transport = ReqwestTransport::new(&config(url)).unwrap();

        let error = transport.post(url, Bytes::new()).await.unwrap_err();
        assert!(error.is_retryable());
    }
}
