use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the body of a successful `GET`; transport errors and non-2xx
    /// statuses are both failures.
    async fn fetch(&self, url: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build catalogue http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .get(url)
            .header(
                USER_AGENT,
                concat!("catalogue-scraper/", env!("CARGO_PKG_VERSION")),
            )
            .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("GET {url}: unexpected status {status}");
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("read body: {url}"))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
