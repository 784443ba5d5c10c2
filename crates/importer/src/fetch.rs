//! Fetching page HTML with an ordered fallback policy.
//!
//! A fetch first goes straight to the source URL, then through each
//! configured proxy in order. The first attempt that yields a non-empty page
//! wins; every failure is logged and the next strategy is tried.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{ImporterConfig, ProxyEndpoint, ResponseFormat};
use crate::error::{FetchError, ImportError};

// ---------------------------------------------------------------------------
// Fetcher seam
// ---------------------------------------------------------------------------

/// Retrieves the body of a URL as text.
#[async_trait]
pub trait HtmlFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// [`HtmlFetcher`] backed by [`reqwest`].
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client with the configured timeout and user agent.
    pub fn new(config: &ImporterConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Return the response unchanged on 2xx, otherwise its status and body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl HtmlFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.text().await?)
    }
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Envelope {
    contents: Option<String>,
}

/// Pull the page out of a JSON-envelope proxy response.
pub fn unwrap_envelope(body: &str) -> Result<String, FetchError> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| FetchError::Envelope(e.to_string()))?;
    match envelope.contents {
        Some(contents) if !contents.is_empty() => Ok(contents),
        _ => Err(FetchError::Envelope("missing `contents`".into())),
    }
}

/// One way of obtaining a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStrategy {
    Direct,
    Proxy(ProxyEndpoint),
}

impl FetchStrategy {
    /// URL requested for `source`.
    pub fn request_url(&self, source: &str) -> String {
        match self {
            Self::Direct => source.to_string(),
            Self::Proxy(proxy) => proxy.url_for(source),
        }
    }

    /// Run this strategy once.
    pub async fn attempt(
        &self,
        fetcher: &dyn HtmlFetcher,
        source: &str,
    ) -> Result<String, FetchError> {
        let body = fetcher.fetch_text(&self.request_url(source)).await?;
        let html = match self {
            Self::Proxy(ProxyEndpoint {
                format: ResponseFormat::JsonEnvelope,
                ..
            }) => unwrap_envelope(&body)?,
            _ => body,
        };
        if html.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(html)
    }
}

impl std::fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Proxy(proxy) => write!(f, "proxy {}", proxy.template),
        }
    }
}

/// Ordered list of strategies: direct first, then each proxy.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    strategies: Vec<FetchStrategy>,
}

impl FetchPolicy {
    pub fn new(proxies: Vec<ProxyEndpoint>) -> Self {
        let strategies = std::iter::once(FetchStrategy::Direct)
            .chain(proxies.into_iter().map(FetchStrategy::Proxy))
            .collect();
        Self { strategies }
    }

    pub fn from_config(config: &ImporterConfig) -> Self {
        Self::new(config.proxies.clone())
    }

    pub fn strategies(&self) -> &[FetchStrategy] {
        &self.strategies
    }

    /// Try each strategy in order, returning the first page obtained.
    ///
    /// Later strategies are never attempted once one succeeds. When all fail,
    /// the error reports how many attempts were made.
    pub async fn fetch(&self, fetcher: &dyn HtmlFetcher, source: &str) -> Result<String, ImportError> {
        let total = self.strategies.len();
        for (i, strategy) in self.strategies.iter().enumerate() {
            tracing::debug!(
                attempt = i + 1,
                total,
                strategy = %strategy,
                source,
                "Fetching page",
            );
            match strategy.attempt(fetcher, source).await {
                Ok(html) => {
                    tracing::info!(strategy = %strategy, source, bytes = html.len(), "Fetched page");
                    return Ok(html);
                }
                Err(e) => {
                    tracing::warn!(
                        attempt = i + 1,
                        total,
                        strategy = %strategy,
                        error = %e,
                        "Fetch attempt failed",
                    );
                }
            }
        }
        Err(ImportError::FetchFailed { attempts: total })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
