//! Core HTTP operations with rate limiting and retry logic
//!
//! Provides the fundamental GET operation for the upstream vendor API with
//! built-in resilience: client-side rate limiting, exponential backoff for
//! transient server responses, and the credential header the API requires.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::Client;
use url::Url;

use crate::constants::{api, limits};
use crate::errors::{FetchError, FetchResult};

/// HTTP operations handler with resilience patterns
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    jwt_token: String,
    rate_limiter: RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>,
}

impl HttpHandler {
    /// Creates a new HttpHandler with the given client and rate limiting
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client to use for requests
    /// * `jwt_token` - Credential attached to every request
    /// * `rate_limit_rps` - Requests per second rate limit
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the rate limit is zero
    pub fn new(client: Client, jwt_token: String, rate_limit_rps: u32) -> FetchResult<Self> {
        let rate_limiter = Self::build_rate_limiter(rate_limit_rps)?;
        Ok(Self {
            client,
            jwt_token,
            rate_limiter,
        })
    }

    fn build_rate_limiter(
        rate_limit_rps: u32,
    ) -> FetchResult<RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>> {
        let quota = Quota::per_second(NonZeroU32::new(rate_limit_rps).ok_or_else(|| {
            FetchError::InvalidUrl {
                url: "rate limit must be non-zero".to_string(),
            }
        })?);
        Ok(RateLimiter::direct(quota))
    }

    /// Fetches the HTTP response with rate limiting and retry logic
    ///
    /// Transient upstream conditions (429, 503, transport failures) are
    /// retried with capped exponential backoff; any other response is
    /// returned as-is for the caller to interpret.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the request still fails after retries
    pub async fn get_response(&self, url: &Url) -> FetchResult<reqwest::Response> {
        // Apply rate limiting with jitter to avoid thundering herd
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100)))
            .await;

        let mut retries = 0;
        loop {
            let request = self
                .client
                .get(url.as_str())
                .header("accept", "application/json, text/plain, */*")
                .header("authorization", format!("jwt {}", self.jwt_token))
                .header("origin", api::ORIGIN)
                .header("referer", api::REFERER);

            match request.send().await {
                Ok(response) => {
                    if response.status() == 429 {
                        if retries < limits::MAX_RETRIES {
                            retries += 1;
                            let delay = Self::backoff_delay(retries);
                            tracing::warn!(
                                "Rate limited by server (429). Backing off for {}ms",
                                delay.as_millis()
                            );
                            tokio::time::sleep(delay).await;
                            continue;
                        } else {
                            return Err(FetchError::RateLimitExceeded);
                        }
                    }

                    if response.status() == 503 {
                        if retries < limits::MAX_RETRIES {
                            retries += 1;
                            let delay = Self::backoff_delay(retries);
                            tracing::warn!(
                                "Server overloaded (503). Backing off for {}ms",
                                delay.as_millis()
                            );
                            tokio::time::sleep(delay).await;
                            continue;
                        } else {
                            return Err(FetchError::ServerOverloaded);
                        }
                    }

                    tracing::debug!("Successfully fetched response: {}", url);
                    return Ok(response);
                }
                Err(e) if retries < limits::MAX_RETRIES => {
                    retries += 1;
                    let delay = Self::backoff_delay(retries);
                    tracing::warn!(
                        "Request failed (attempt {}/{}): {}. Retrying in {}ms",
                        retries,
                        limits::MAX_RETRIES,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(
                        "Request failed after {} retries: {}",
                        limits::MAX_RETRIES,
                        e
                    );
                    return Err(FetchError::MaxRetriesExceeded {
                        max_retries: limits::MAX_RETRIES,
                    });
                }
            }
        }
    }

    fn backoff_delay(retries: u32) -> Duration {
        Duration::from_millis(limits::RETRY_BASE_DELAY_MS * 2_u64.pow(retries))
    }
}
