use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use scraper::Html;
use url::Url;

use crate::cli::{CrawlArgs, CrawlOnceArgs};
use crate::extract::{extract_html, selector};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::formats::{BookRecord, CrawlResult};
use crate::resolve::resolve;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Always ends with `/`.
    pub site_root: String,
    /// `<site_root>catalogue/`.
    pub catalogue_base: String,
    pub page_count: u32,
    pub delay: Duration,
    pub timeout: Duration,
}

impl CrawlConfig {
    pub fn from_args(args: &CrawlArgs) -> anyhow::Result<Self> {
        let mut root = Url::parse(&args.site_root).context("parse --site-root")?;
        if root.scheme() != "http" && root.scheme() != "https" {
            anyhow::bail!("--site-root must be http/https: {root}");
        }
        root.set_query(None);
        root.set_fragment(None);
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        let catalogue = root.join("catalogue/").context("derive catalogue url")?;

        Ok(Self {
            site_root: root.to_string(),
            catalogue_base: catalogue.to_string(),
            page_count: args.pages,
            delay: Duration::from_millis(args.delay_ms),
            timeout: Duration::from_secs(args.timeout_secs.max(1)),
        })
    }

    pub fn listing_url(&self, page: u32) -> String {
        format!("{}page-{page}.html", self.catalogue_base)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlStats {
    pub pages_fetched: u32,
    pub pages_skipped: u32,
    pub records: usize,
    pub missing: usize,
}

pub struct Crawler<F> {
    config: CrawlConfig,
    fetcher: F,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(config: CrawlConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    /// Walks listing pages `1..=page_count` in order. A listing page that
    /// cannot be fetched contributes nothing; every teaser on a fetched page
    /// contributes exactly one entry.
    pub async fn crawl(&self) -> CrawlResult {
        let mut results = CrawlResult::new();
        let mut stats = CrawlStats::default();

        for page in 1..=self.config.page_count {
            let url = self.config.listing_url(page);
            let html = match self.fetcher.fetch(&url).await {
                Ok(html) => html,
                Err(err) => {
                    tracing::warn!(page, %url, ?err, "listing page fetch failed; skipping page");
                    stats.pages_skipped += 1;
                    continue;
                }
            };
            stats.pages_fetched += 1;

            let links = teaser_links(&html);
            tracing::debug!(page, teasers = links.len(), "listing page parsed");

            for link in links {
                let Some(link) = link else {
                    tracing::warn!(page, "teaser without item link; recording no data");
                    results.push(None);
                    continue;
                };

                let item_url = resolve(&link, &self.config.site_root, &self.config.catalogue_base);
                let record = self.fetch_item(&item_url).await;
                tracing::info!(page, url = %item_url, ok = record.is_some(), "fetched item");
                results.push(record);

                tokio::time::sleep(self.config.delay).await;
            }
        }

        stats.records = results.iter().filter(|entry| entry.is_some()).count();
        stats.missing = results.len() - stats.records;
        tracing::info!(
            pages_fetched = stats.pages_fetched,
            pages_skipped = stats.pages_skipped,
            records = stats.records,
            missing = stats.missing,
            "crawl finished"
        );

        results
    }

    /// Crawls, then writes the full result once when `out` is given.
    pub async fn crawl_and_persist(&self, out: Option<&Path>) -> anyhow::Result<CrawlResult> {
        let results = self.crawl().await;
        if let Some(out) = out {
            crate::store::write_results(out, &results).context("persist crawl results")?;
            tracing::info!(out = %out.display(), entries = results.len(), "crawl results written");
        }
        Ok(results)
    }

    async fn fetch_item(&self, url: &str) -> Option<BookRecord> {
        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(err) => {
                tracing::warn!(%url, ?err, "item fetch failed; recording no data");
                return None;
            }
        };

        match extract_html(&html) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(%url, %err, "item extraction failed; recording no data");
                None
            }
        }
    }
}

/// Relative item links of every teaser on a listing page, in document order.
/// `None` stands for a teaser whose heading link is missing.
pub fn teaser_links(html: &str) -> Vec<Option<String>> {
    let document = Html::parse_document(html);
    let teaser = selector("article.product_pod");
    let heading_link = selector("h3 a");

    document
        .select(&teaser)
        .map(|article| {
            article
                .select(&heading_link)
                .next()
                .and_then(|link| link.value().attr("href"))
                .map(str::to_owned)
        })
        .collect()
}

pub async fn run(args: CrawlOnceArgs) -> anyhow::Result<()> {
    let config = CrawlConfig::from_args(&args.crawl).context("build crawl config")?;
    let fetcher = HttpFetcher::new(config.timeout)?;
    let crawler = Crawler::new(config, fetcher);

    let out = (!args.no_save).then(|| PathBuf::from(&args.crawl.out));
    crawler.crawl_and_persist(out.as_deref()).await?;
    Ok(())
}
