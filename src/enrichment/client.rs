//! Rate-limited HTTP client shared by all source integrations.
//!
//! Academic APIs enforce per-client request budgets (Crossref and arXiv
//! document hard limits; Semantic Scholar throttles aggressively without a
//! key). Every source client routes its requests through one
//! [`RateLimitedClient`], which paces consecutive requests, retries
//! transient failures with exponential backoff and counts every attempt.
//!
//! Status interpretation stays with the per-source clients: this layer
//! retries 429/5xx and transport faults, and hands every other response
//! back untouched.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::time::Instant;

use super::domain::{MetadataSource, SourceError};
use super::retry::RetryPolicy;

/// User agent sent with every outbound request.
pub(crate) const USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Upper bound of the random jitter added on top of the pacing interval.
const JITTER_MAX_MS: u64 = 100;

/// Emit a progress log line every this many requests to one source.
const PROGRESS_LOG_EVERY: u64 = 50;

/// A raw HTTP response, status and body only.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First part of the body, for error messages.
    pub fn body_excerpt(&self) -> String {
        self.body.chars().take(200).collect()
    }
}

/// The wire seam: issues one GET and reports transport-level faults.
///
/// Production uses [`HttpTransport`]; tests script response sequences
/// without opening a socket.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<TransportResponse, SourceError>;
}

/// Real transport backed by reqwest.
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    /// Wrap a configured reqwest client (each source builds its own, with
    /// its timeout and default headers).
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, SourceError> {
        let response = self.http_client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(e.to_string())
            } else {
                SourceError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(TransportResponse { status, body })
    }
}

/// Paces, retries and counts requests to one source.
pub struct RateLimitedClient {
    source: MetadataSource,
    transport: Arc<dyn Transport>,
    min_interval: Duration,
    retry: RetryPolicy,
    last_request: tokio::sync::Mutex<Option<Instant>>,
    requests_sent: AtomicU64,
}

impl RateLimitedClient {
    /// Create a client over a configured reqwest client.
    pub fn new(
        source: MetadataSource,
        http_client: reqwest::Client,
        min_interval: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self::with_transport(source, Arc::new(HttpTransport::new(http_client)), min_interval, retry)
    }

    /// Create a client over any transport. Tests use this with scripted
    /// transports; production goes through [`Self::new`].
    pub fn with_transport(
        source: MetadataSource,
        transport: Arc<dyn Transport>,
        min_interval: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            source,
            transport,
            min_interval,
            retry,
            last_request: tokio::sync::Mutex::new(None),
            requests_sent: AtomicU64::new(0),
        }
    }

    /// Total request attempts issued by this client, retries included.
    pub fn requests_sent(&self) -> u64 {
        self.requests_sent.load(Ordering::Relaxed)
    }

    /// Issue a GET, waiting out the pacing interval first and retrying
    /// transient failures per the retry policy.
    ///
    /// Responses with any status other than 429/5xx are returned as-is;
    /// interpreting 404 or parsing the body is the caller's job.
    pub async fn get(&self, url: &str) -> Result<TransportResponse, SourceError> {
        let mut attempt = 0u32;
        loop {
            self.pace().await;
            self.count_request();

            let failure = match self.transport.get(url).await {
                Ok(resp) if resp.status == 429 => SourceError::RateLimited,
                Ok(resp) if resp.status >= 500 => SourceError::Status {
                    status: resp.status,
                    message: resp.body_excerpt(),
                },
                Ok(resp) => return Ok(resp),
                Err(e) => e,
            };

            if failure.is_transient() && attempt < self.retry.max_retries {
                let delay = self.retry.backoff_delay(attempt);
                tracing::warn!(
                    source = %self.source,
                    attempt = attempt + 1,
                    delay_secs = delay.as_secs_f64(),
                    error = %failure,
                    "transient failure, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            return Err(failure);
        }
    }

    /// Block until the per-source interval since the previous request has
    /// elapsed, plus a little jitter so overlapping runs don't sync up.
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                let jitter = Duration::from_millis(rand::rng().random_range(0..=JITTER_MAX_MS));
                tokio::time::sleep(self.min_interval - elapsed + jitter).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn count_request(&self) {
        let sent = self.requests_sent.fetch_add(1, Ordering::Relaxed) + 1;
        if sent % PROGRESS_LOG_EVERY == 0 {
            tracing::debug!(source = %self.source, requests = sent, "request count");
        }
    }
}


#[cfg(test)]
mod tests {
    use super::mocks::ScriptedTransport;
    use super::*;

    fn fast_client(transport: Arc<dyn Transport>, retry: RetryPolicy) -> RateLimitedClient {
        RateLimitedClient::with_transport(
            MetadataSource::Crossref,
            transport,
            Duration::ZERO,
            retry,
        )
    }

    #[tokio::test]
    async fn test_success_passes_response_through() {
        let transport = ScriptedTransport::statuses([(200, r#"{"ok":true}"#)]);
        let client = fast_client(transport, RetryPolicy::none());

        let resp = client.get("http://example.test/works").await.unwrap();

        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, r#"{"ok":true}"#);
        assert_eq!(client.requests_sent(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_transient_failures_then_success() {
        let transport = ScriptedTransport::statuses([
            (500, "server error"),
            (503, "still down"),
            (200, "{}"),
        ]);
        let client = fast_client(transport, RetryPolicy::default());

        let resp = client.get("http://example.test/works").await.unwrap();

        assert_eq!(resp.status, 200);
        assert_eq!(client.requests_sent(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_exhausted_surface_rate_limit() {
        let transport =
            ScriptedTransport::statuses([(429, ""), (429, ""), (429, ""), (429, "")]);
        let client = fast_client(
            transport,
            RetryPolicy::new(3, Duration::from_secs(2)),
        );

        let err = client.get("http://example.test/works").await.unwrap_err();

        assert!(matches!(err, SourceError::RateLimited));
        // Initial attempt plus three retries
        assert_eq!(client.requests_sent(), 4);
    }

    #[tokio::test]
    async fn test_client_error_status_returned_without_retry() {
        // Script holds a single response; a retry would panic the transport
        let transport = ScriptedTransport::statuses([(404, "not found")]);
        let client = fast_client(transport, RetryPolicy::default());

        let resp = client.get("http://example.test/missing").await.unwrap();

        assert_eq!(resp.status, 404);
        assert_eq!(client.requests_sent(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_error_retried() {
        let transport = ScriptedTransport::new([
            Err(SourceError::Network("connection reset".into())),
            Ok(TransportResponse {
                status: 200,
                body: "{}".into(),
            }),
        ]);
        let client = fast_client(transport, RetryPolicy::default());

        let resp = client.get("http://example.test/works").await.unwrap();

        assert_eq!(resp.status, 200);
        assert_eq!(client.requests_sent(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_spaces_out_requests() {
        let transport = ScriptedTransport::statuses([(200, ""), (200, "")]);
        let client = RateLimitedClient::with_transport(
            MetadataSource::Arxiv,
            transport,
            Duration::from_secs(3),
            RetryPolicy::none(),
        );

        let started = Instant::now();
        client.get("http://example.test/a").await.unwrap();
        client.get("http://example.test/b").await.unwrap();

        // Second request must wait out the 3s interval (plus jitter)
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_request_not_delayed() {
        let transport = ScriptedTransport::statuses([(200, "")]);
        let client = RateLimitedClient::with_transport(
            MetadataSource::Arxiv,
            transport,
            Duration::from_secs(3),
            RetryPolicy::none(),
        );

        let started = Instant::now();
        client.get("http://example.test/a").await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
