//! HTTP fetching for catalog pages
//!
//! [`Fetcher`] is the seam between the extractors and the network. Parsing
//! code only ever sees the returned body; [`HttpClient`] is the production
//! implementation on top of `reqwest`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::infrastructure::config::defaults;

/// Transport-level failure; the page was never obtained
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request cancelled: {url}")]
    Cancelled { url: String },

    #[error("HTTP request failed for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed with status {status}: {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid cookie '{name}' for {url}")]
    InvalidCookie { url: String, name: String },
}

/// One GET request against the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub cookies: Vec<(String, String)>,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            cookies: Vec::new(),
        }
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// `Cookie` header value, or `None` without cookies.
    ///
    /// Names must be RFC 6265 tokens and values plain cookie octets.
    pub fn cookie_header(&self) -> Result<Option<String>, FetchError> {
        if self.cookies.is_empty() {
            return Ok(None);
        }

        let mut pairs = Vec::with_capacity(self.cookies.len());
        for (name, value) in &self.cookies {
            if !is_cookie_name(name) || !value.bytes().all(is_cookie_octet) {
                return Err(FetchError::InvalidCookie {
                    url: self.url.clone(),
                    name: name.clone(),
                });
            }
            pairs.push(format!("{name}={value}"));
        }
        Ok(Some(pairs.join("; ")))
    }
}

fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
        })
}

const fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

/// Retrieves raw page bodies.
///
/// Cancellation is only honored while the request is in flight.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(
        &self,
        request: &FetchRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, FetchError>;
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub follow_redirects: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            follow_redirects: defaults::FOLLOW_REDIRECTS,
        }
    }
}

/// `reqwest`-backed [`Fetcher`]
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    pub const fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    async fn send(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchError> {
        let url = request.url.as_str();
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let mut builder = self.client.get(url);
        if let Some(cookie) = request.cookie_header()? {
            builder = builder.header(COOKIE, cookie);
        }

        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn get(
        &self,
        request: &FetchRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled {
                url: request.url.clone(),
            });
        }

        tracing::info!("Fetching URL: {}", request.url);

        let body = tokio::select! {
            result = self.send(request) => result?,
            () = cancel.cancelled() => {
                tracing::warn!("HTTP request cancelled for URL: {}", request.url);
                return Err(FetchError::Cancelled { url: request.url.clone() });
            }
        };

        tracing::debug!("Successfully fetched: {} ({} bytes)", request.url, body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_http_client_creation() {
        let client = HttpClient::new(HttpClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_user_agent_rejected() {
        let config = HttpClientConfig {
            user_agent: "bad\nagent".to_string(),
            ..Default::default()
        };
        assert!(HttpClient::new(config).is_err());
    }

    #[test]
    fn test_cookie_header() {
        let request = FetchRequest::new("https://www.qidian.com/all/");
        assert_eq!(request.cookie_header().unwrap(), None);

        let request = request.with_cookie("listStyle", "2").with_cookie("a", "b");
        assert_eq!(
            request.cookie_header().unwrap().as_deref(),
            Some("listStyle=2; a=b")
        );
    }

    #[rstest]
    #[case("list;Style", "2")]
    #[case("list=Style", "2")]
    #[case("", "2")]
    #[case("listStyle", "2; admin=1")]
    #[case("listStyle", "a,b")]
    #[case("listStyle", "\"2\"")]
    fn test_malformed_cookie_rejected(#[case] name: &str, #[case] value: &str) {
        let request = FetchRequest::new("https://www.qidian.com/all/").with_cookie(name, value);
        assert!(matches!(
            request.cookie_header(),
            Err(FetchError::InvalidCookie { .. })
        ));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let client = HttpClient::new(HttpClientConfig::default()).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = client
            .get(&FetchRequest::new("https://book.qidian.com/info/1/"), &cancel)
            .await;
        assert!(matches!(result, Err(FetchError::Cancelled { .. })));
    }
}
