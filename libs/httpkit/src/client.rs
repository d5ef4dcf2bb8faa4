//! Traced HTTP client.
//!
//! Wraps `reqwest::Client` so that every outgoing request runs inside an
//! `outgoing_http` span, carries a `traceparent` header and is bounded by the
//! client timeout. Idempotent requests may additionally be retried with
//! exponential backoff.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, field, warn, Instrument, Level};

use crate::trace_context;

/// Transport-level failures. HTTP status codes are not errors at this layer;
/// callers inspect the response themselves.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid request: {0}")]
    Build(#[source] reqwest::Error),
}

impl ClientError {
    fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if err.is_builder() {
            Self::Build(err)
        } else {
            Self::Transport {
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// Connect failures and timeouts are worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport { source, .. } => source.is_connect() || source.is_request(),
            Self::Build(_) => false,
        }
    }
}

/// Bounded retry with exponential backoff: `base_delay * 2^attempt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const NONE: RetryPolicy = RetryPolicy {
        max_retries: 0,
        base_delay: Duration::ZERO,
    };

    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(16))
    }

    /// Whether a failed attempt `attempt` (0-based) may be followed by another.
    pub fn allows_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_millis(200))
    }
}

/// Outcome classification used by the retry loop.
fn should_retry(outcome: &Result<reqwest::Response, ClientError>) -> bool {
    match outcome {
        Ok(resp) => resp.status().is_server_error(),
        Err(e) => e.is_transient(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct TracedClientBuilder {
    timeout: Option<Duration>,
    retry: RetryPolicy,
    user_agent: Option<String>,
}

impl TracedClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    pub fn build(self) -> Result<TracedClient, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(ua) = self.user_agent {
            builder = builder.user_agent(ua);
        }
        let inner = builder.build().map_err(ClientError::Build)?;
        Ok(TracedClient {
            inner,
            retry: self.retry,
        })
    }
}

/// A traced HTTP client. Cheap to clone.
#[derive(Clone)]
pub struct TracedClient {
    inner: reqwest::Client,
    retry: RetryPolicy,
}

impl TracedClient {
    pub fn builder() -> TracedClientBuilder {
        TracedClientBuilder::default()
    }

    /// Wrap an existing client; idempotent requests use the default retry policy.
    pub fn new(inner: reqwest::Client) -> Self {
        Self {
            inner,
            retry: RetryPolicy::default(),
        }
    }

    /// Execute a built request once, inside an `outgoing_http` span.
    pub async fn execute(
        &self,
        mut req: reqwest::Request,
    ) -> Result<reqwest::Response, ClientError> {
        let url = req.url().to_string();
        let span = tracing::span!(
            Level::INFO,
            "outgoing_http",
            http.method = %req.method(),
            http.url = %url,
            http.status_code = field::Empty,
            trace_id = field::Empty,
            otel.kind = "client",
        );

        if let Some(tp) = trace_context::inject_traceparent(req.headers_mut()) {
            if let Some(id) = trace_context::trace_id(&tp) {
                span.record("trace_id", id);
            }
        }

        let inner = self.inner.clone();
        async move {
            let response = inner
                .execute(req)
                .await
                .map_err(|e| ClientError::from_reqwest(&url, e));

            match &response {
                Ok(resp) => {
                    tracing::Span::current().record("http.status_code", resp.status().as_u16());
                    debug!(status = %resp.status(), "response received");
                }
                Err(e) => warn!(error = %e, "request failed"),
            }
            response
        }
        .instrument(span)
        .await
    }

    /// Execute an idempotent request, retrying transient failures and 5xx
    /// responses according to the client's retry policy. Requests whose body
    /// cannot be cloned are sent exactly once.
    pub async fn execute_idempotent(
        &self,
        req: reqwest::Request,
    ) -> Result<reqwest::Response, ClientError> {
        let mut attempt = 0;
        let mut pending = req;
        loop {
            let spare = pending.try_clone();
            let outcome = self.execute(pending).await;

            let Some(next) = spare else {
                return outcome;
            };
            if !should_retry(&outcome) || !self.retry.allows_retry(attempt) {
                return outcome;
            }

            let delay = self.retry.delay_for(attempt);
            debug!(attempt = attempt + 1, ?delay, "retrying request");
            tokio::time::sleep(delay).await;

            attempt += 1;
            pending = next;
        }
    }

    /// GET with retries.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, ClientError> {
        let req = self
            .inner
            .get(url)
            .build()
            .map_err(|e| ClientError::from_reqwest(url, e))?;
        self.execute_idempotent(req).await
    }

    /// Multipart POST, sent once.
    pub async fn post_multipart(
        &self,
        url: &str,
        form: reqwest::multipart::Form,
    ) -> Result<reqwest::Response, ClientError> {
        let req = self
            .inner
            .post(url)
            .multipart(form)
            .build()
            .map_err(|e| ClientError::from_reqwest(url, e))?;
        self.execute(req).await
    }
}

impl Default for TracedClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}
