//! Retry handling for Injection API requests.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::transport::{RawResponse, Transport};
use crate::config::RetrySettings;
use crate::error::{SocketLabsError, SocketLabsResult};

/// Sends a request body to the Injection API, retrying transient failures
/// with jittered exponential backoff.
///
/// Server errors (500, 502, 503, 504), connection failures and per-attempt
/// timeouts are retried. Any other status is returned as the final response.
/// With `max_retries == 0` exactly one request is made and its outcome is
/// returned unchanged, whatever the status.
pub struct RetryHandler {
    transport: Arc<dyn Transport>,
    endpoint: String,
    settings: RetrySettings,
    request_timeout: Duration,
}

impl RetryHandler {
    /// Create a retry handler.
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoint: impl Into<String>,
        settings: RetrySettings,
        request_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            settings,
            request_timeout,
        }
    }

    /// The retry settings in use.
    pub fn settings(&self) -> &RetrySettings {
        &self.settings
    }

    /// Send `body`, retrying as allowed by the settings.
    ///
    /// # Errors
    ///
    /// - `SocketLabsError::Cancelled` as soon as `cancellation` fires, during
    ///   a request or a backoff wait.
    /// - `SocketLabsError::RetriesExhausted` wrapping the last failure once
    ///   every allowed attempt failed.
    /// - Non-retryable transport errors are returned as-is.
    pub async fn send(
        &self,
        body: Bytes,
        cancellation: &CancellationToken,
    ) -> SocketLabsResult<RawResponse> {
        if !self.settings.is_enabled() {
            debug!(endpoint = %self.endpoint, "Sending request without retries");
            return self.attempt(body, cancellation).await;
        }

        let mut attempts: u32 = 0;

        loop {
            let wait = self.settings.next_wait_interval(attempts);

            debug!(attempt = attempts + 1, endpoint = %self.endpoint, "Sending request");

            let error = match self.attempt(body.clone(), cancellation).await {
                Ok(response) if response.is_server_error() => SocketLabsError::ServerError {
                    status: response.status,
                    body: String::from_utf8_lossy(&response.body).into_owned(),
                },
                Ok(response) => return Ok(response),
                Err(error) if error.is_retryable() => error,
                Err(error) => return Err(error),
            };

            attempts += 1;

            if attempts > self.settings.max_retries() {
                warn!(attempts, error = %error, "Retries exhausted");
                return Err(SocketLabsError::RetriesExhausted {
                    attempts,
                    source: Box::new(error),
                });
            }

            warn!(
                attempt = attempts,
                max_retries = self.settings.max_retries(),
                wait_ms = wait.as_millis() as u64,
                error = %error,
                "Retryable failure, backing off"
            );

            tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    debug!("Send cancelled during backoff");
                    return Err(SocketLabsError::Cancelled);
                }
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }

    async fn attempt(
        &self,
        body: Bytes,
        cancellation: &CancellationToken,
    ) -> SocketLabsResult<RawResponse> {
        let request = tokio::time::timeout(
            self.request_timeout,
            self.transport.post(&self.endpoint, body),
        );

        tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(SocketLabsError::Cancelled),
            result = request => match result {
                Ok(result) => result,
                Err(_) => Err(SocketLabsError::Timeout {
                    message: format!("No response within {:?}", self.request_timeout),
                }),
            },
        }
    }
}

impl std::fmt::Debug for RetryHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryHandler")
            .field("endpoint", &self.endpoint)
            .field("settings", &self.settings)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;

    enum Step {
        Respond(u16),
        Fail(SocketLabsError),
        Hang,
    }

    /// Plays back a fixed list of outcomes and records when each call happened.
    struct ScriptedTransport {
        steps: Mutex<VecDeque<Step>>,
        calls: Mutex<Vec<Instant>>,
    }

    impl ScriptedTransport {
        fn new(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                steps: Mutex::new(steps.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn post(&self, _url: &str, _body: Bytes) -> SocketLabsResult<RawResponse> {
            self.calls.lock().unwrap().push(Instant::now());
            let step = self.steps.lock().unwrap().pop_front();

            match step {
                Some(Step::Respond(status)) => Ok(RawResponse::new(status, "{}")),
                Some(Step::Fail(error)) => Err(error),
                Some(Step::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(RawResponse::new(200, "{}"))
                }
                None => panic!("unexpected request"),
            }
        }
    }

    fn handler(transport: Arc<ScriptedTransport>, max_retries: u32) -> RetryHandler {
        let settings =
            RetrySettings::new(max_retries, Duration::from_secs(1), Duration::from_secs(10))
                .unwrap();
        RetryHandler::new(
            transport,
            "https://inject.example.com/api/v1/email",
            settings,
            Duration::from_secs(5),
        )
    }

    fn connect_error() -> SocketLabsError {
        SocketLabsError::Transport {
            message: "connection refused".to_string(),
            source: None,
            retryable: true,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_retry_returns_server_error_status_directly() {
        let transport = ScriptedTransport::new(vec![Step::Respond(503)]);
        let handler = handler(transport.clone(), 0);

        let response = handler
            .send(Bytes::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.status, 503);
        assert_eq!(transport.call_times().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_retry_propagates_error_directly() {
        let transport = ScriptedTransport::new(vec![Step::Fail(connect_error())]);
        let handler = handler(transport.clone(), 0);

        let error = handler
            .send(Bytes::new(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(error, SocketLabsError::Transport { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_server_errors_until_success() {
        let transport =
            ScriptedTransport::new(vec![Step::Respond(503), Step::Respond(503), Step::Respond(200)]);
        let handler = handler(transport.clone(), 2);

        let response = handler
            .send(Bytes::new(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        let calls = transport.call_times();
        assert_eq!(calls.len(), 3);

        let first_wait = calls[1] - calls[0];
        let second_wait = calls[2] - calls[1];
        assert_eq!(first_wait, Duration::from_secs(1));
        assert!(second_wait >= Duration::from_millis(1800));
        assert!(second_wait <= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_returned_immediately() {
        let transport = ScriptedTransport::new(vec![Step::Respond(401)]);
        let handler = handler(transport.clone(), 3);

        let response = handler
            .send(Bytes::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.status, 401);
        assert_eq!(transport.call_times().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_wrap_last_failure() {
        let transport = ScriptedTransport::new(vec![
            Step::Fail(connect_error()),
            Step::Respond(502),
            Step::Respond(504),
        ]);
        let handler = handler(transport.clone(), 2);

        let error = handler
            .send(Bytes::new(), &CancellationToken::new())
            .await
            .unwrap_err();

        match error {
            SocketLabsError::RetriesExhausted { attempts, source } => {
                assert_eq!(attempts, 3);
                assert_eq!(source.status(), Some(504));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(transport.call_times().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_timeout_is_retried() {
        let transport = ScriptedTransport::new(vec![Step::Hang, Step::Respond(200)]);
        let handler = handler(transport.clone(), 1);

        let response = handler
            .send(Bytes::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        let calls = transport.call_times();
        assert_eq!(calls[1] - calls[0], Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_exhaust_as_timeout() {
        let transport = ScriptedTransport::new(vec![Step::Hang, Step::Hang]);
        let handler = handler(transport, 1);

        let error = handler
            .send(Bytes::new(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(error.is_timeout());
        assert!(matches!(error, SocketLabsError::RetriesExhausted { attempts: 2, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_not_retried() {
        let transport = ScriptedTransport::new(vec![Step::Fail(SocketLabsError::Transport {
            message: "bad client".to_string(),
            source: None,
            retryable: false,
        })]);
        let handler = handler(transport.clone(), 3);

        let error = handler
            .send(Bytes::new(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(error, SocketLabsError::Transport { retryable: false, .. }));
        assert_eq!(transport.call_times().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_during_backoff() {
        let transport = ScriptedTransport::new(vec![Step::Respond(503), Step::Respond(200)]);
        let handler = handler(transport.clone(), 3);
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            canceller.cancel();
        });

        let error = handler.send(Bytes::new(), &token).await.unwrap_err();

        assert!(error.is_cancelled());
        assert_eq!(transport.call_times().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_during_attempt() {
        let transport = ScriptedTransport::new(vec![Step::Hang]);
        let handler = handler(transport, 0);
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });

        let error = handler.send(Bytes::new(), &token).await.unwrap_err();
        assert!(error.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_cancelled_token_sends_nothing() {
        let transport = ScriptedTransport::new(vec![]);
        let handler = handler(transport.clone(), 2);
        let token = CancellationToken::new();
        token.cancel();

        let error = handler.send(Bytes::new(), &token).await.unwrap_err();

        assert!(error.is_cancelled());
        assert!(transport.call_times().is_empty());
    }
}
