//! FormKit REST client
//!
//! Async client for the FormKit API. It implements the core
//! [`VersionStore`](formkit_core::VersionStore) and
//! [`FormStore`](formkit_core::FormStore) ports, so a
//! [`VersionHistoryManager`](formkit_core::VersionHistoryManager) can run
//! against a remote server exactly as it does against the in-memory
//! repository.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use formkit_client::Client;
//! use formkit_core::VersionHistoryManager;
//!
//! # async fn run() -> formkit_core::Result<()> {
//! let client = Client::new("http://localhost:8080")?;
//! let history = VersionHistoryManager::new(Arc::new(client));
//! let versions = history.list_versions("6c1f0f1e-2b0a-4c59-9d3c-3a8f1f1f0b7a").await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use formkit_core::wire::ApiResponse;
use formkit_core::{FormsError, Result};
use reqwest::{header, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

mod store;

/// Client version, sent in the user agent
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default max retries
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default first retry delay
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Upper bound for any single retry delay
pub const DEFAULT_MAX_RETRY_DELAY: Duration = Duration::from_secs(8);

/// Configuration for the FormKit client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub max_retry_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            max_retry_delay: DEFAULT_MAX_RETRY_DELAY,
        }
    }
}

/// Which call is being made; picks the fallback error for a bare status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    ListVersions,
    CreateVersion,
    RestoreVersion,
    DeleteVersion,
    Form,
}

/// FormKit API client
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    config: ClientConfig,
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a client for `base_url` with default settings
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig {
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| FormsError::transport(format!("invalid base url {}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(FormsError::transport(format!(
                "invalid base url {}",
                config.base_url
            )));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(key) = &config.api_key {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|_| FormsError::transport("api key contains invalid characters"))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(format!("formkit-rust/{}", VERSION))
            .timeout(config.timeout)
            .build()
            .map_err(FormsError::transport)?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                base_url,
                http,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Make a GET request
    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str], op: Operation) -> Result<T> {
        self.request::<T, ()>(Method::GET, segments, None, op)
            .await?
            .ok_or_else(|| FormsError::transport("response carried no data"))
    }

    /// Make a POST request
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        segments: &[&str],
        body: Option<&B>,
        op: Operation,
    ) -> Result<T> {
        self.request(Method::POST, segments, body, op)
            .await?
            .ok_or_else(|| FormsError::transport("response carried no data"))
    }

    /// Make a PUT request
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        segments: &[&str],
        body: &B,
        op: Operation,
    ) -> Result<T> {
        self.request(Method::PUT, segments, Some(body), op)
            .await?
            .ok_or_else(|| FormsError::transport("response carried no data"))
    }

    /// Make a DELETE request
    pub(crate) async fn delete(&self, segments: &[&str], op: Operation) -> Result<()> {
        self.request::<serde_json::Value, ()>(Method::DELETE, segments, None, op)
            .await
            .map(|_| ())
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FormsError::transport("base url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Delay before retry number `attempt` (0-based), capped
    fn backoff(&self, attempt: u32) -> Duration {
        let config = &self.inner.config;
        config
            .retry_delay
            .saturating_mul(1u32 << attempt.min(16))
            .min(config.max_retry_delay)
    }

    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        op: Operation,
    ) -> Result<Option<T>> {
        let url = self.url(segments)?;
        let max_retries = self.inner.config.max_retries;
        // A POST that timed out or hit a 500 may already have been applied
        let replayable = method != Method::POST;

        for attempt in 0..=max_retries {
            let mut request = self.inner.http.request(method.clone(), url.clone());
            if let Some(body) = body {
                request = request.json(body);
            }

            tracing::debug!(%method, %url, attempt, "sending request");
            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) => {
                    let retryable = e.is_connect() || (replayable && e.is_timeout());
                    if retryable && attempt < max_retries {
                        let delay = self.backoff(attempt);
                        tracing::warn!(%url, error = %e, ?delay, "request failed, retrying");
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(FormsError::transport(e));
                }
            };

            let status = response.status();
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            let bytes = response.bytes().await.map_err(FormsError::transport)?;

            let error = match serde_json::from_slice::<ApiResponse<T>>(&bytes) {
                Ok(envelope) if envelope.success => return Ok(envelope.data),
                Ok(envelope) => envelope.into_error(fallback_error(status, op)),
                Err(e) if status.is_success() => {
                    return Err(FormsError::transport(format!("malformed response: {}", e)))
                }
                Err(_) => fallback_error(status, op),
            };

            let retryable = match status {
                StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => true,
                s => replayable && s.is_server_error(),
            };
            if retryable && attempt < max_retries {
                let delay = match (status, retry_after) {
                    (StatusCode::TOO_MANY_REQUESTS, Some(after)) => {
                        after.min(self.inner.config.max_retry_delay)
                    }
                    _ => self.backoff(attempt),
                };
                tracing::warn!(%url, %status, ?delay, "retryable response, retrying");
                tokio::time::sleep(delay).await;
                continue;
            }

            return Err(error);
        }

        Err(FormsError::transport("retries exhausted"))
    }
}

/// Error used when the body gives no usable code
pub(crate) fn fallback_error(status: StatusCode, op: Operation) -> FormsError {
    match status {
        StatusCode::NOT_FOUND => match op {
            Operation::RestoreVersion | Operation::DeleteVersion => {
                FormsError::NotFound("form or version not found".to_string())
            }
            _ => FormsError::NotFound("form not found".to_string()),
        },
        StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => FormsError::access_denied(),
        StatusCode::BAD_REQUEST if op == Operation::DeleteVersion => {
            FormsError::ActiveVersion("cannot delete active version".to_string())
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            FormsError::InvalidSchema("invalid schema".to_string())
        }
        StatusCode::TOO_MANY_REQUESTS => FormsError::transport("rate limited"),
        s if s.is_server_error() => FormsError::transport(format!("server error {}", s.as_u16())),
        s => FormsError::transport(format!("unexpected status {}", s.as_u16())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(retry_ms: u64, max_ms: u64) -> Client {
        Client::with_config(ClientConfig {
            base_url: "http://localhost:9000/base/".into(),
            retry_delay: Duration::from_millis(retry_ms),
            max_retry_delay: Duration::from_millis(max_ms),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_backoff_is_exponential_and_capped() {
        let client = client(100, 1000);
        assert_eq!(client.backoff(0), Duration::from_millis(100));
        assert_eq!(client.backoff(1), Duration::from_millis(200));
        assert_eq!(client.backoff(3), Duration::from_millis(800));
        assert_eq!(client.backoff(4), Duration::from_millis(1000));
        assert_eq!(client.backoff(40), Duration::from_millis(1000));
    }

    #[test]
    fn test_url_segments_are_escaped() {
        let client = client(1, 1);
        let url = client.url(&["api", "forms", "a b/c", "versions"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/base/api/forms/a%20b%2Fc/versions"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        tokio_test::assert_err!(Client::new("not a url"));
        tokio_test::assert_err!(Client::new("mailto:forms@example.com"));
        tokio_test::assert_ok!(Client::new("http://127.0.0.1:8080"));
    }

    #[test]
    fn test_fallback_mapping() {
        assert!(matches!(
            fallback_error(StatusCode::BAD_REQUEST, Operation::DeleteVersion),
            FormsError::ActiveVersion(_)
        ));
        assert!(matches!(
            fallback_error(StatusCode::BAD_REQUEST, Operation::CreateVersion),
            FormsError::InvalidSchema(_)
        ));
        assert!(matches!(
            fallback_error(StatusCode::UNPROCESSABLE_ENTITY, Operation::CreateVersion),
            FormsError::InvalidSchema(_)
        ));
        assert_eq!(
            fallback_error(StatusCode::NOT_FOUND, Operation::ListVersions).to_string(),
            "form not found"
        );
        assert_eq!(
            fallback_error(StatusCode::FORBIDDEN, Operation::Form).to_string(),
            "access denied"
        );
        assert!(matches!(
            fallback_error(StatusCode::BAD_GATEWAY, Operation::Form),
            FormsError::Transport(_)
        ));
    }
}
