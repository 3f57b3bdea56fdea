//! HTTP client with tracing and retries.

use reqwest::{Client, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::FetchError;
use crate::retry::RetryStrategy;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for BarberSlot.
const USER_AGENT: &str = concat!("BarberSlot/", env!("CARGO_PKG_VERSION"));

/// Maximum number of body bytes kept in error messages.
const ERROR_BODY_LIMIT: usize = 200;

/// HTTP client with retry capabilities.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    retry_strategy: RetryStrategy,
    timeout: Duration,
    bearer_token: Option<String>,
}

impl HttpClient {
    /// Creates a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: client,
            retry_strategy: RetryStrategy::default(),
            timeout,
            bearer_token: None,
        })
    }

    /// Sets the retry strategy for this client.
    pub fn with_retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// Sends `Authorization: Bearer <token>` on every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Returns the retry strategy.
    pub fn retry_strategy(&self) -> &RetryStrategy {
        &self.retry_strategy
    }

    /// Performs a GET request and decodes the JSON body.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        let response = self.get(url).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "Response body is not the expected JSON");
            FetchError::Json(e)
        })
    }

    /// Performs a GET request, retrying transient failures.
    ///
    /// Returns the response only if its status is a success.
    pub async fn get(&self, url: &Url) -> Result<Response, FetchError> {
        let mut attempts = 0;
        let max_attempts = self.retry_strategy.max_attempts;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "Making GET request");

            let mut request = self.inner.get(url.clone());
            if let Some(token) = &self.bearer_token {
                request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    debug!(status = %status, "Response received");

                    if status.is_success() {
                        return Ok(response);
                    }

                    // Handle rate limiting
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = retry_after_secs(&response);

                        if attempts < max_attempts {
                            let wait = self.retry_strategy.delay_for_rate_limit(retry_after);
                            warn!(wait_secs = wait.as_secs(), "Rate limited, waiting before retry");
                            tokio::time::sleep(wait).await;
                            continue;
                        }

                        return Err(FetchError::RateLimited { retry_after });
                    }

                    let error = status_error(status, response).await;
                    if attempts < max_attempts && error.is_transient() {
                        let delay = self.retry_strategy.delay_for_attempt(attempts);
                        warn!(error = %error, delay_secs = delay.as_secs(), "Server error, retrying");
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(error);
                }
                Err(e) => {
                    if attempts < max_attempts && self.retry_strategy.should_retry(&e) {
                        let delay = self.retry_strategy.delay_for_attempt(attempts);
                        warn!(
                            error = %e,
                            delay_secs = delay.as_secs(),
                            "Request failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    if e.is_timeout() {
                        return Err(FetchError::Timeout(self.timeout.as_secs()));
                    }
                    return Err(e.into());
                }
            }
        }
    }
}

/// Reads the `Retry-After` header in seconds.
fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Maps a non-success status to an error, consuming the body.
async fn status_error(status: StatusCode, response: Response) -> FetchError {
    let body = response.text().await.unwrap_or_default();
    let body = truncate(&body, ERROR_BODY_LIMIT);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            FetchError::AuthenticationFailed("Invalid or expired credentials".to_string())
        }
        StatusCode::NOT_FOUND => FetchError::NotFound(body),
        _ => FetchError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        },
    }
}

fn truncate(body: &str, limit: usize) -> String {
    match body.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}
