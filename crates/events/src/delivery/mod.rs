//! External delivery channels.
//!
//! Each call is a single attempt: no retry, no backoff. Callers decide what a
//! failure means for the launch.

use std::time::Duration;

pub mod messaging;
pub mod workflow;

/// HTTP request timeout for a single delivery attempt.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest response body excerpt kept on an error.
const MAX_ERROR_BODY_CHARS: usize = 500;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for outbound delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Remote returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

/// Build the shared HTTP client used by every delivery channel.
pub(crate) fn build_client() -> Result<reqwest::Client, DeliveryError> {
    Ok(reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}

/// Turn a non-2xx response into [`DeliveryError::HttpStatus`].
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, DeliveryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DeliveryError::HttpStatus {
        status: status.as_u16(),
        body: truncate(&body),
    })
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
