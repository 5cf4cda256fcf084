//! Content fetching seam
//!
//! The coordinator never talks to the network directly; it goes through
//! [`ContentFetcher`] so tests can substitute canned pages.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Fetches final-page HTML and favicon bytes on behalf of the coordinator.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Production fetcher backed by a shared reqwest client.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::ContentFetch(format!("{}: {}", url, e)))?;
        if !resp.status().is_success() {
            return Err(Error::ContentFetch(format!(
                "{}: status {}",
                url,
                resp.status()
            )));
        }
        Ok(resp)
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|e| Error::ContentFetch(format!("{}: {}", url, e)))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| Error::ContentFetch(format!("{}: {}", url, e)))?;
        Ok(bytes.to_vec())
    }
}
