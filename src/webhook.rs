//! Webhook delivery with bounded retry on transient transport failures.
//!
//! The payload is serialized once per record; retries reuse the same bytes.
//! Failure classification is structural (error kind and source chain), never
//! a match on error text: timeouts, connect failures, and mid-stream
//! resets/truncation are transient, everything else is terminal for the
//! record. Non-2xx responses are terminal too; a webhook that answers is
//! not the transient class.

use bytes::Bytes;
use snitch_core::config::DeliveryConfig;
use snitch_core::Payload;
use std::error::Error as _;
use std::time::Duration;
use thiserror::Error;

/// Why one record's delivery gave up.
#[derive(Debug, Error)]
pub enum DeliverError {
    #[error("payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("webhook returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("delivery failed after {attempts} attempt(s): {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
}

/// HTTP client bound to one webhook URL, shared by all workers.
#[derive(Debug, Clone)]
pub struct Webhook {
    client: reqwest::Client,
    url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl Webhook {
    pub fn new(url: impl Into<String>, delivery: &DeliveryConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(delivery.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            max_retries: delivery.max_retries,
            base_delay: Duration::from_millis(delivery.retry_base_delay_ms),
        })
    }

    /// Deliver one payload, retrying transient transport failures up to the
    /// configured bound with exponential backoff.
    pub async fn deliver(&self, payload: &Payload) -> Result<(), DeliverError> {
        let body = Bytes::from(serde_json::to_vec(payload)?);
        let mut attempt = 0u32;
        loop {
            match self.post(body.clone()).await {
                Ok(status) if status.is_success() => return Ok(()),
                Ok(status) => return Err(DeliverError::Status(status)),
                Err(err) if is_transient(&err) && attempt < self.max_retries => {
                    let delay = self.backoff(attempt);
                    tracing::debug!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient delivery failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    return Err(DeliverError::Transport {
                        attempts: attempt + 1,
                        source: err,
                    })
                }
            }
        }
    }

    async fn post(&self, body: Bytes) -> Result<reqwest::StatusCode, reqwest::Error> {
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        Ok(response.status())
    }

    /// Exponential backoff: base × 2^attempt, exponent capped at 6.
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * (1u32 << attempt.min(6))
    }
}

/// Whether a transport failure is worth retrying.
///
/// The interesting case is a peer that accepts the request and then drops
/// the connection before a full response: hyper reports it as an incomplete
/// message, or the socket error surfaces as a reset/abort further down the
/// source chain.
fn is_transient(err: &reqwest::Error) -> bool {
    if err.is_timeout() || err.is_connect() {
        return true;
    }
    let mut source = err.source();
    while let Some(inner) = source {
        if let Some(hyper_err) = inner.downcast_ref::<hyper::Error>() {
            if hyper_err.is_incomplete_message() || hyper_err.is_canceled() {
                return true;
            }
        }
        if let Some(io_err) = inner.downcast_ref::<std::io::Error>() {
            return matches!(
                io_err.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::TimedOut
            );
        }
        source = inner.source();
    }
    false
}
