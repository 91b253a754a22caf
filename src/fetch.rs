//! Raw content retrieval for source URLs.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Forces `https://` on `http://` and scheme-relative URLs.
pub fn enforce_https(url: &str) -> String {
    let trimmed = url.trim();
    if let Some(rest) = trimmed.strip_prefix("http://") {
        format!("https://{rest}")
    } else if let Some(rest) = trimmed.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        trimmed.to_string()
    }
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    max_retries: u8,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            timeout: Duration::from_secs(15),
            max_retries: 3,
        }
    }

}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let url = enforce_https(url);
        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self.client.get(&url).timeout(self.timeout).send().await;

            let failure = match res {
                Ok(rsp) => match rsp.error_for_status() {
                    Ok(rsp) => return rsp.text().await.with_context(|| format!("read body of {url}")),
                    Err(e) => anyhow!("source HTTP error: {e}"),
                },
                Err(e) => anyhow!("source request failed: {e}"),
            };

            if attempt >= self.max_retries {
                return Err(failure).with_context(|| format!("fetch {url}"));
            }
            tracing::debug!(attempt, url = %url, error = %failure, "retrying fetch");
            tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
        }
    }
}

/// Serves canned bodies by URL; unknown URLs fail like a 404.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.bodies.insert(url.into(), body.into());
        self
    }
}

#[async_trait::async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("no canned body for {url}"))
    }
}
