//! HTTP retry helper for transient errors.
//!
//! Provider requests go through [`send_json`] instead of calling
//! `reqwest::RequestBuilder::send()` directly, so connection failures,
//! timeouts, HTTP 429 and HTTP 5xx are retried with exponential backoff.

use std::time::Duration;

use reqwest::StatusCode;

use crate::FetchError;

/// Maximum number of retries after the first attempt.
///
/// With backoff of 2s then 4s, a request that keeps timing out costs at
/// most 3 × 10s + 6s before giving up.
const MAX_RETRIES: u32 = 2;

/// Maximum length of the response body preview included in parse errors.
const BODY_PREVIEW_LEN: usize = 200;

/// What to do with a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Accept,
    Retry,
    Fail,
}

fn classify(status: StatusCode) -> Disposition {
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        Disposition::Retry
    } else if status.is_client_error() {
        Disposition::Fail
    } else {
        Disposition::Accept
    }
}

/// Sends an HTTP request and parses the response body as JSON.
///
/// `build_request` is called on each attempt, since a
/// [`reqwest::RequestBuilder`] is consumed by `.send()`.
///
/// # Errors
///
/// Returns [`FetchError`] if the request still fails after all retries,
/// the server returns a non-retryable status, or the body is not JSON.
pub async fn send_json<F>(build_request: F) -> Result<serde_json::Value, FetchError>
where
    F: Fn() -> reqwest::RequestBuilder + Send + Sync,
{
    let response = send_inner(&build_request).await?;
    let status = response.status();
    let text = response.text().await?;

    serde_json::from_str(&text).map_err(|e| {
        let preview: String = text.chars().take(BODY_PREVIEW_LEN).collect();
        FetchError::Parse {
            message: format!("invalid JSON ({e}, status={status}): {preview}"),
        }
    })
}

async fn send_inner<F>(build_request: &F) -> Result<reqwest::Response, FetchError>
where
    F: Fn() -> reqwest::RequestBuilder + Send + Sync,
{
    let mut attempt = 0;
    loop {
        if attempt > 0 {
            let delay = Duration::from_secs(1u64 << attempt);
            log::warn!("  retry {attempt}/{MAX_RETRIES} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        match build_request().send().await {
            Err(e) => {
                if is_transient(&e) && attempt < MAX_RETRIES {
                    log::warn!("  transient error: {e}");
                    attempt += 1;
                    continue;
                }
                return Err(FetchError::Http(e));
            }
            Ok(response) => {
                let status = response.status();
                match classify(status) {
                    Disposition::Accept => return Ok(response),
                    Disposition::Retry if attempt < MAX_RETRIES => {
                        log::warn!("  HTTP {status}");
                        attempt += 1;
                    }
                    Disposition::Retry if status == StatusCode::TOO_MANY_REQUESTS => {
                        return Err(FetchError::RateLimited);
                    }
                    Disposition::Retry | Disposition::Fail => {
                        return Err(FetchError::Status(status));
                    }
                }
            }
        }
    }
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
}
