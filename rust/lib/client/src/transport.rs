use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{ApiError, RetryPolicy};

/// Header carrying the per-call idempotency key when retries are enabled.
pub const IDEMPOTENCY_KEY: &str = "Idempotency-Key";

/// Shared HTTP plumbing: base URL, connection pool, retry policy.
#[derive(Debug)]
pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl Transport {
    pub(crate) fn new(base_url: &str, retry: RetryPolicy) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and decode the JSON response.
    pub(crate) async fn call<B, R>(&self, method: Method, url: &str, body: Option<&B>) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self.send(method, url, body).await?;
        resp.json::<R>()
            .await
            .map_err(|e| ApiError::Decode(format!("response body: {}", e)))
    }

    /// Send a request, checking only the status.
    pub(crate) async fn call_empty(&self, method: Method, url: &str) -> Result<(), ApiError> {
        self.send::<()>(method, url, None).await.map(|_| ())
    }

    /// Send with the retry policy applied. Non-2xx becomes `ApiError::Http`.
    async fn send<B>(&self, method: Method, url: &str, body: Option<&B>) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let payload = match body {
            Some(b) => Some(
                serde_json::to_vec(b).map_err(|e| ApiError::Decode(format!("request body: {}", e)))?,
            ),
            None => None,
        };
        let idempotency_key = (self.retry.is_enabled() && method != Method::GET)
            .then(|| uuid::Uuid::new_v4().to_string());

        let mut attempt = 1;
        loop {
            let mut req = self.http.request(method.clone(), url);
            if let Some(key) = &idempotency_key {
                req = req.header(IDEMPOTENCY_KEY, key);
            }
            if let Some(bytes) = &payload {
                req = req.header(CONTENT_TYPE, "application/json").body(bytes.clone());
            }

            let err = match req.send().await {
                Ok(resp) if resp.status().is_success() => {
                    debug!(%method, url, status = resp.status().as_u16(), "API call");
                    return Ok(resp);
                }
                Ok(resp) => ApiError::Http {
                    status: resp.status().as_u16(),
                },
                Err(e) => ApiError::Network(e),
            };

            if attempt >= self.retry.max_attempts || !err.is_retryable() {
                warn!(%method, url, attempt, error = %err, "API call failed");
                return Err(err);
            }

            let delay = self.retry.backoff(attempt);
            warn!(%method, url, attempt, ?delay, error = %err, "API call failed, retrying");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls() {
        let t = Transport::new("http://127.0.0.1:8000/", RetryPolicy::none());
        assert_eq!(t.base_url(), "http://127.0.0.1:8000");
        assert_eq!(t.api_url("products"), "http://127.0.0.1:8000/api/products");
        assert_eq!(t.api_url("/time"), "http://127.0.0.1:8000/api/time");
        assert_eq!(t.url("health"), "http://127.0.0.1:8000/health");
    }
}
