//! Rate-limited HTTP client for catalog pages.

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use tracing::{error, info, warn};

use crate::backoff::{politeness_delay, Backoff};
use crate::config::ScraperConfig;

/// HTTP client that waits politely before each request and retries failures.
pub struct CatalogClient {
    client: Client,
    config: ScraperConfig,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert("DNT", HeaderValue::from_static("1"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid base URL {}", config.base_url))?;

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Resolve `href` against the catalog root.
    pub fn absolute_url(&self, href: &str) -> Option<String> {
        self.base_url.join(href).ok().map(String::from)
    }

    /// Fetch a page body, or `None` once every attempt has failed.
    ///
    /// Failures are logged rather than returned: a missing page only means
    /// fewer records for the caller.
    pub async fn get_page(&self, url: &str) -> Option<String> {
        let mut backoff = Backoff::new(self.config.retry_pause, self.config.rate_limit_pause);

        for attempt in 1..=self.config.max_attempts {
            let delay = politeness_delay(self.config.min_delay, self.config.max_delay);
            if !delay.is_zero() {
                info!("Waiting {:.2} seconds before request...", delay.as_secs_f64());
                tokio::time::sleep(delay).await;
            }

            info!("Fetching page: {} (attempt {})", url, attempt);
            match self.fetch_once(url).await {
                Ok(FetchOutcome::Body(body)) => return Some(body),
                Ok(FetchOutcome::RateLimited) => {
                    warn!("Rate limited by {}, waiting longer...", url);
                    tokio::time::sleep(self.config.rate_limit_pause).await;
                }
                Ok(FetchOutcome::Status(status)) => {
                    warn!("Got status code {} for {}", status, url);
                    if attempt < self.config.max_attempts {
                        tokio::time::sleep(backoff.fail()).await;
                    }
                }
                Err(err) => {
                    error!("Error fetching {}: {:#}", url, err);
                    if attempt < self.config.max_attempts {
                        tokio::time::sleep(backoff.fail()).await;
                    }
                }
            }
        }

        None
    }

    async fn fetch_once(&self, url: &str) -> Result<FetchOutcome> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(FetchOutcome::RateLimited);
        }
        if !status.is_success() {
            return Ok(FetchOutcome::Status(status));
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {}", url))?;
        Ok(FetchOutcome::Body(body))
    }
}

enum FetchOutcome {
    Body(String),
    RateLimited,
    Status(StatusCode),
}
