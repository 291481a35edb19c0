//! Resilient API client
//!
//! Wraps a base URL and a lazily built `reqwest::Client`. The pool is shared
//! by every caller, dropped on transport failure or shutdown, and rebuilt on
//! the next request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::config::HttpConfig;
use crate::error::{ProxyError, Result};
use crate::http::{backoff_delay, retry_after};

/// Result of a single request attempt that did not end the call.
enum Attempt {
    Done(Bytes),
    RateLimited(Duration),
    Failed(reqwest::Error),
}

// == API Client ==
/// Upstream client for one external service.
pub struct ApiClient {
    config: HttpConfig,
    pool: Mutex<Option<Client>>,
    generation: AtomicU64,
}

impl ApiClient {
    pub fn new(config: HttpConfig) -> Self {
        Self {
            config,
            pool: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    // == URL resolution ==
    /// Absolute `http(s)://` URLs pass through; anything else is joined to the
    /// base URL with a single `/`.
    pub fn resolve_url(&self, path: &str) -> Result<Url> {
        let raw = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.config.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        };
        Url::parse(&raw).map_err(|e| ProxyError::InvalidUrl(format!("{raw}: {e}")))
    }

    // == Pool lifecycle ==
    /// Returns the shared pool, building it if there is none.
    ///
    /// The lock is held across the build, so concurrent first use creates a
    /// single pool.
    fn pool(&self) -> Result<Client> {
        let mut pool = self.pool.lock();
        if let Some(client) = pool.as_ref() {
            return Ok(client.clone());
        }

        let client = Client::builder()
            .timeout(self.config.timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProxyError::Internal(format!("Failed to create HTTP client: {e}")))?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(base_url = %self.config.base_url, generation, "HTTP pool created");
        *pool = Some(client.clone());
        Ok(client)
    }

    /// Drops the pool; the next request builds a fresh one.
    ///
    /// Used as the shutdown hook and after transport failures.
    pub fn close(&self) {
        if self.pool.lock().take().is_some() {
            info!(base_url = %self.config.base_url, "HTTP pool closed");
        }
    }

    pub fn has_pool(&self) -> bool {
        self.pool.lock().is_some()
    }

    /// Number of pools built so far.
    pub fn pool_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    // == Fetch ==
    /// GETs `path` and parses the body as JSON.
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let (url, body) = self.execute(path, params).await?;
        serde_json::from_slice(&body).map_err(|source| ProxyError::Decode { url, source })
    }

    /// GETs `path` and returns the raw body.
    pub async fn fetch_bytes(&self, path: &str, params: &[(&str, &str)]) -> Result<Bytes> {
        let (_, body) = self.execute(path, params).await?;
        Ok(body)
    }

    /// Request loop shared by both fetch flavors.
    ///
    /// 429 sleeps for the advertised time and retries without consuming an
    /// attempt. Transport failures drop the pool and back off linearly until
    /// `max_retries` attempts are spent. Any other non-success status ends the
    /// call immediately.
    async fn execute(&self, path: &str, params: &[(&str, &str)]) -> Result<(String, Bytes)> {
        let url = self.resolve_url(path)?;
        let max_attempts = self.config.max_retries.max(1);
        let mut attempt: u32 = 1;

        loop {
            match self.send_once(&url, params).await? {
                Attempt::Done(body) => return Ok((url.to_string(), body)),
                Attempt::RateLimited(delay) => {
                    warn!(url = %url, ?delay, "Rate limited (429), waiting before retry");
                    tokio::time::sleep(delay).await;
                }
                Attempt::Failed(source) => {
                    self.close();
                    if attempt >= max_attempts {
                        error!(url = %url, attempts = attempt, error = %source, "Request failed, retries exhausted");
                        return Err(ProxyError::Transport {
                            url: url.to_string(),
                            attempts: attempt,
                            source,
                        });
                    }

                    let delay = backoff_delay(self.config.retry_base_delay(), attempt);
                    warn!(url = %url, attempt, ?delay, error = %source, "Request failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn send_once(&self, url: &Url, params: &[(&str, &str)]) -> Result<Attempt> {
        let client = self.pool()?;

        let response = match client.get(url.clone()).query(params).send().await {
            Ok(response) => response,
            Err(e) => return Ok(Attempt::Failed(e)),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(Attempt::RateLimited(retry_after(response.headers())));
        }
        if !status.is_success() {
            return Err(ProxyError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        match response.bytes().await {
            Ok(body) => Ok(Attempt::Done(body)),
            Err(e) => Ok(Attempt::Failed(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(HttpConfig::new(base_url))
    }

    #[test]
    fn test_resolve_relative_path() {
        let client = client("https://api.nasa.gov/");
        let url = client.resolve_url("/neo/rest/v1/feed").unwrap();
        assert_eq!(url.as_str(), "https://api.nasa.gov/neo/rest/v1/feed");

        let url = client.resolve_url("planetary/earth/imagery").unwrap();
        assert_eq!(url.as_str(), "https://api.nasa.gov/planetary/earth/imagery");
    }

    #[test]
    fn test_resolve_absolute_url_passes_through() {
        let client = client("https://api.nasa.gov");
        let url = client
            .resolve_url("http://mars.jpl.nasa.gov/msl-raw-images/photo.jpg")
            .unwrap();
        assert_eq!(url.as_str(), "http://mars.jpl.nasa.gov/msl-raw-images/photo.jpg");
    }

    #[test]
    fn test_resolve_invalid_base() {
        let client = client("not a url");
        assert!(matches!(client.resolve_url("/x"), Err(ProxyError::InvalidUrl(_))));
    }

    #[test]
    fn test_pool_is_lazy_and_reused() {
        let client = client("https://api.nasa.gov");
        assert!(!client.has_pool());
        assert_eq!(client.pool_generation(), 0);

        client.pool().unwrap();
        client.pool().unwrap();

        assert!(client.has_pool());
        assert_eq!(client.pool_generation(), 1);
    }

    #[test]
    fn test_close_then_rebuild() {
        let client = client("https://api.nasa.gov");
        client.pool().unwrap();

        client.close();
        assert!(!client.has_pool());

        client.pool().unwrap();
        assert_eq!(client.pool_generation(), 2);
    }

    #[test]
    fn test_close_without_pool_is_noop() {
        let client = client("https://api.nasa.gov");
        client.close();
        assert_eq!(client.pool_generation(), 0);
    }
}
