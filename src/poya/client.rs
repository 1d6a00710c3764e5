//! HTTP client for Poya catalog requests using wreq for TLS fingerprint emulation.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::RngExt;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;
use wreq_util::Emulation;

/// Production catalog host.
pub const BASE_URL: &str = "https://www.poyabuy.com.tw";

/// Number of results per catalog page; `startIndex` advances by this much.
pub const PAGE_SIZE: u32 = 50;

/// Trait for catalog page fetching - enables mocking for tests.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Fetches one page of catalog search results as HTML. `start_index`
    /// is the zero-based offset into the result set.
    async fn search_page(&self, query: &str, start_index: u32) -> Result<String>;
}

/// Poya HTTP client with browser impersonation and rate limiting.
pub struct PoyaClient {
    client: Client,
    delay_ms: u64,
    delay_jitter_ms: u64,
    base_url: Option<String>,
}

impl PoyaClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, None)
    }

    /// Creates a new client with an optional custom base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
            base_url,
        })
    }

    /// Returns the base URL (custom for testing, or the production host).
    fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(BASE_URL)
    }

    /// Performs a GET request with rate limiting applied.
    async fn get(&self, url: &str) -> Result<String> {
        self.delay().await;

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "zh-TW,zh;q=0.9,en;q=0.8")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }

    /// Inter-request courtesy delay, with optional jitter.
    async fn delay(&self) {
        if self.delay_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.delay_ms + jitter;
        debug!("Delaying {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }
}

#[async_trait]
impl CatalogSearch for PoyaClient {
    async fn search_page(&self, query: &str, start_index: u32) -> Result<String> {
        // The site expects the query wrapped in double quotes.
        let url = format!(
            "{}/catalog/search?q=%22{}%22&startIndex={}",
            self.base_url(),
            urlencoding::encode(query),
            start_index
        );

        info!("Searching: {} (startIndex {})", query, start_index);
        self.get(&url).await
    }
}
