//! Shared HTTP plumbing for the provider clients
//!
//! Transient failures are retried here, at the transport level only.
//! Everything above this layer sees a single success or a single error.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::LlmError;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
pub(super) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 500 | 502 | 503 | 504 | 529)
}

/// Build the shared reqwest client with the configured timeout
pub(super) fn build_http(timeout: Duration) -> Result<Client, LlmError> {
    Client::builder().timeout(timeout).build().map_err(LlmError::from)
}

/// POST a JSON body, retrying transient failures with exponential backoff
///
/// Returns the parsed JSON body of the first successful response.
pub(super) async fn post_json<T: serde::de::DeserializeOwned>(
    http: &Client,
    url: &str,
    headers: &[(&str, String)],
    body: &serde_json::Value,
) -> Result<T, LlmError> {
    debug!(%url, "post_json: called");
    let mut last_error = None;
    for attempt in 0..=MAX_RETRIES {
        if attempt > 0 {
            let base = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
            let backoff = base + rand::random_range(0..=base / 4);
            warn!(attempt, backoff_ms = backoff, "post_json: retrying after transient error");
            tokio::time::sleep(Duration::from_millis(backoff)).await;
        }

        let mut request = http.post(url).header("content-type", "application/json");
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        let response = match request.json(body).send().await {
            Ok(r) => r,
            Err(e) => {
                let e = LlmError::from(e);
                debug!(attempt, error = %e, "post_json: transport error");
                if !e.is_transient() {
                    return Err(e);
                }
                last_error = Some(e);
                continue;
            }
        };

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            debug!(retry_after, "post_json: rate limited (429)");
            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if is_retryable_status(status) && attempt < MAX_RETRIES {
            let text = response.text().await.unwrap_or_default();
            debug!(attempt, status, "post_json: retryable error");
            last_error = Some(LlmError::Status { status, message: text });
            continue;
        }

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(status, "post_json: API error");
            return Err(LlmError::Status { status, message: text });
        }

        debug!("post_json: success");
        return Ok(response.json::<T>().await?);
    }

    match last_error {
        Some(last) => Err(LlmError::RetriesExhausted {
            attempts: MAX_RETRIES + 1,
            last: Box::new(last),
        }),
        None => Err(LlmError::InvalidResponse("no request attempted".to_string())),
    }
}
