//! Request dispatch: index crawl, single page, or PDF
//!
//! [`Harvester`] decides how an input is processed and wires the crawler,
//! the extractor and the PDF parser to render sessions. Each operation
//! acquires its own sessions and releases them before returning.

use crate::config::Config;
use crate::crawler::{CrawlReport, FrontierCrawler};
use crate::extract::PageExtractor;
use crate::item::ContentItem;
use crate::pdf::{PdfSource, PdfStructuralParser};
use crate::render::{build_http_client, launcher_from_config, with_session, RenderOptions, SessionLauncher};
use crate::url::{matches_index_pattern, parse_input_url};
use crate::{HarvestError, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// How a URL input is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrlMode {
    /// Index-like URLs are crawled, anything else is scraped directly
    #[default]
    Auto,
    /// Always crawl and scrape every discovered article
    Index,
    /// Always scrape just this page
    Single,
}

/// Entry point tying configuration to render sessions
pub struct Harvester {
    config: Config,
    launcher: Box<dyn SessionLauncher>,
}

impl Harvester {
    /// Creates a harvester using the backend selected in `config`
    pub fn new(config: Config) -> Result<Self> {
        let launcher = launcher_from_config(&config.browser)?;
        Ok(Self::with_launcher(config, launcher))
    }

    /// Creates a harvester with an explicit session launcher
    pub fn with_launcher(config: Config, launcher: Box<dyn SessionLauncher>) -> Self {
        Self { config, launcher }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether the raw input looks like an index page
    pub fn is_index_url(&self, raw_url: &str) -> bool {
        matches_index_pattern(raw_url, &self.config.crawler.index_patterns)
    }

    /// Crawls from `raw_url` and returns the discovery report
    ///
    /// `max_depth` overrides the configured depth when given.
    pub async fn crawl(&self, raw_url: &str, max_depth: Option<u32>) -> Result<CrawlReport> {
        let seed = parse_input_url(raw_url)?;
        let depth = max_depth.unwrap_or(self.config.crawler.max_depth);
        self.run_crawl(&seed, depth).await
    }

    async fn run_crawl(&self, seed: &Url, max_depth: u32) -> Result<CrawlReport> {
        let crawler = FrontierCrawler::new(
            &self.config.crawler,
            RenderOptions::for_crawl(&self.config.browser),
        );

        let report = with_session(self.launcher.as_ref(), |session| async move {
            crawler.crawl(session.as_ref(), seed, max_depth).await
        })
        .await?;

        Ok(report)
    }

    /// Harvests content items from a web URL
    ///
    /// # Arguments
    ///
    /// * `raw_url` - URL as typed by the user; `https://` is assumed if missing
    /// * `mode` - Index/single dispatch, or [`UrlMode::Auto`] to decide from the URL
    ///
    /// # Errors
    ///
    /// * [`HarvestError::NoContent`] - an index crawl produced no usable items
    /// * [`HarvestError::Extraction`] - a single page could not be extracted
    /// * [`HarvestError::Resource`] - a render session could not be started or stopped
    pub async fn harvest_url(&self, raw_url: &str, mode: UrlMode) -> Result<Vec<ContentItem>> {
        let url = parse_input_url(raw_url)?;

        let as_index = match mode {
            UrlMode::Index => true,
            UrlMode::Single => false,
            UrlMode::Auto => self.is_index_url(raw_url),
        };

        if as_index {
            tracing::info!("Treating {} as an index page", url);
            self.harvest_index(&url).await
        } else {
            tracing::info!("Treating {} as a single page", url);
            Ok(vec![self.harvest_single(&url).await?])
        }
    }

    async fn harvest_index(&self, url: &Url) -> Result<Vec<ContentItem>> {
        let report = self.run_crawl(url, self.config.crawler.max_depth).await?;
        tracing::info!("Scraping {} discovered URLs", report.found.len());

        let extractor = PageExtractor::from_config(&self.config);
        let found = &report.found;

        let items = with_session(self.launcher.as_ref(), |session| async move {
            let mut items = Vec::with_capacity(found.len());
            for link in found {
                let item = extractor.scrape(session.as_ref(), link).await;
                if item.is_error() {
                    tracing::warn!("Dropping {}: {}", link, item.content());
                    continue;
                }
                items.push(item);
            }
            items
        })
        .await?;

        if items.is_empty() {
            return Err(HarvestError::NoContent {
                url: url.to_string(),
            });
        }

        tracing::info!("Harvested {} items from {}", items.len(), url);
        Ok(items)
    }

    async fn harvest_single(&self, url: &Url) -> Result<ContentItem> {
        let extractor = PageExtractor::from_config(&self.config);

        let item = with_session(self.launcher.as_ref(), |session| async move {
            extractor.scrape(session.as_ref(), url).await
        })
        .await?;

        if item.is_error() {
            return Err(HarvestError::Extraction {
                url: url.to_string(),
                message: item.content().to_string(),
            });
        }

        Ok(item)
    }

    /// Harvests content items from a PDF path or `http(s)` URL
    ///
    /// A document that cannot be parsed at all yields a single error item
    /// carrying the diagnostic. `split_chapters` overrides the configured mode.
    pub async fn harvest_pdf(&self, input: &str, split_chapters: Option<bool>) -> Result<Vec<ContentItem>> {
        let source = self.pdf_source(input).await?;
        let mut parser = PdfStructuralParser::new(&self.config.pdf);
        if let Some(split) = split_chapters {
            parser = parser.with_split_chapters(split);
        }

        let parsed = tokio::task::spawn_blocking(move || parser.parse_items(&source)).await?;

        match parsed {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::error!("Failed to parse PDF {}: {}", input, e);
                Ok(vec![ContentItem::error(format!("Failed to parse PDF: {}", e))])
            }
        }
    }

    async fn pdf_source(&self, input: &str) -> Result<PdfSource> {
        let trimmed = input.trim();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Ok(PdfSource::path(PathBuf::from(trimmed)));
        }

        let url = parse_input_url(trimmed)?;
        tracing::info!("Downloading PDF: {}", url);

        let client = build_http_client(&self.config.browser.user_agent)?;
        let response = client
            .get(url.clone())
            .timeout(Duration::from_secs(self.config.browser.navigation_timeout_secs))
            .send()
            .await?
            .error_for_status()?;
        let data = response.bytes().await?;

        tracing::debug!("Downloaded {} bytes from {}", data.len(), url);
        Ok(PdfSource::bytes(data.to_vec(), url.to_string()))
    }
}
