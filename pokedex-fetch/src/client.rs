//! HTTP client with per-attempt timeouts and retries.

use reqwest::{Client, header};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{AttemptError, FetchError};
use crate::retry::RetryStrategy;

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// User agent string for Pokedex.
const USER_AGENT: &str = concat!("pokedex/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Client
// ============================================================================

/// JSON-over-HTTP client with bounded timeout and retry.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    timeout: Duration,
    retry_strategy: RetryStrategy,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a new HTTP client with a custom per-attempt timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the TLS backend cannot be initialized.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            inner: client,
            timeout,
            retry_strategy: RetryStrategy::default(),
        })
    }

    /// Sets the retry strategy for this client.
    pub fn with_retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// The per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The retry strategy in use.
    pub fn retry_strategy(&self) -> &RetryStrategy {
        &self.retry_strategy
    }

    /// GETs `url` and decodes the JSON body as `T`.
    ///
    /// Timeouts, network errors, non-2xx statuses and undecodable bodies all
    /// count as failed attempts and are retried alike.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Failed`] carrying the last attempt's cause once
    /// every attempt has failed.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        self.retry_strategy
            .run(|attempt| self.attempt::<T>(url, attempt))
            .await
            .map_err(|exhausted| {
                FetchError::failed(url.as_str(), exhausted.attempts, exhausted.last_error)
            })
    }

    /// One bounded attempt. Dropping the request future on timeout cancels it.
    async fn attempt<T: DeserializeOwned>(&self, url: &Url, attempt: u32) -> Result<T, AttemptError> {
        debug!(attempt = attempt, "GET request");

        let request = async {
            let response = self
                .inner
                .get(url.clone())
                .header(header::ACCEPT, "application/json")
                .send()
                .await?;

            let status = response.status();
            debug!(status = %status, "Response received");
            if !status.is_success() {
                return Err(AttemptError::from(status));
            }

            let body = response.bytes().await?;
            serde_json::from_slice::<T>(&body).map_err(|e| AttemptError::Decode(e.to_string()))
        };

        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(AttemptError::Timeout(self.timeout)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    fn fast_client(timeout: Duration) -> HttpClient {
        HttpClient::with_timeout(timeout)
            .unwrap()
            .with_retry_strategy(RetryStrategy::default().with_base_delay(Duration::from_millis(5)))
    }

    #[tokio::test]
    async fn test_fetch_json_success() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/type/fire");
            then.status(200).json_body(json!({ "name": "fire" }));
        });

        let client = fast_client(Duration::from_secs(5));
        let url = Url::parse(&server.url("/type/fire")).unwrap();
        let body: Named = client.fetch_json(&url).await.unwrap();

        assert_eq!(body, Named { name: "fire".to_string() });
        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn test_not_found_is_retried_like_any_failure() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/pokemon/missingno");
            then.status(404);
        });

        let client = fast_client(Duration::from_secs(5));
        let url = Url::parse(&server.url("/pokemon/missingno")).unwrap();
        let err = client.fetch_json::<Named>(&url).await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        match err {
            FetchError::Failed { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("unexpected error: {other}"),
        }
        mock.assert_hits(3);
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/type");
            then.status(503);
        });

        let client = fast_client(Duration::from_secs(5));
        let url = Url::parse(&server.url("/type")).unwrap();
        let err = client.fetch_json::<Named>(&url).await.unwrap_err();

        assert_eq!(err.status(), Some(503));
        mock.assert_hits(3);
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/pokemon/slowpoke");
            then.status(200)
                .json_body(json!({ "name": "slowpoke" }))
                .delay(Duration::from_millis(500));
        });

        let client = fast_client(Duration::from_millis(50));
        let url = Url::parse(&server.url("/pokemon/slowpoke")).unwrap();
        let err = client.fetch_json::<Named>(&url).await.unwrap_err();

        assert!(err.is_timeout(), "expected timeout, got {err}");
    }

    #[tokio::test]
    async fn test_undecodable_body_fails() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/pokemon/glitch");
            then.status(200).body("<html>not json</html>");
        });

        let client = fast_client(Duration::from_secs(5));
        let url = Url::parse(&server.url("/pokemon/glitch")).unwrap();
        let err = client.fetch_json::<Named>(&url).await.unwrap_err();

        assert!(matches!(err.cause(), Some(AttemptError::Decode(_))));
    }

    #[test]
    fn test_default_timeout() {
        let client = HttpClient::new().unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(5));
        assert_eq!(client.retry_strategy().max_attempts, 3);
    }
}
