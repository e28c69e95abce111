//! Breadth-first frontier crawler
//!
//! Walks a site level by level from a seed URL and collects the pages whose
//! paths look like articles. All state (queue and visited set) lives in a
//! [`CrawlState`] created per call, so concurrent crawls never share anything
//! but the render session they are handed.

use super::LinkExtractor;
use crate::config::{CrawlerConfig, LinkFilterPolicy};
use crate::render::{RenderOptions, RenderSession};
use crate::url::{matches_content_pattern, normalize_parsed, site_key};
use chrono::{DateTime, Utc};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A discovered URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Normalized absolute URL, fragment stripped
    pub url: Url,
    /// Distance from the seed (seed = 0)
    pub depth: u32,
}

/// Outcome of one crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Content-bearing URLs in FIFO dequeue order
    pub found: Vec<Url>,
    /// Number of fetch attempts made
    pub fetched: usize,
    /// URLs whose fetch failed, with the reason
    pub failed: Vec<(String, String)>,
    /// Links not enqueued because they were already known
    pub skipped_visited: usize,
    /// True when the page cap stopped the crawl early
    pub capped: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlReport {
    /// Discovered URLs as strings
    pub fn found_urls(&self) -> Vec<String> {
        self.found.iter().map(|u| u.to_string()).collect()
    }

    /// Wall-clock duration in seconds, once the crawl has finished
    pub fn duration_seconds(&self) -> Option<f64> {
        let (started, finished) = (self.started_at?, self.finished_at?);
        Some((finished - started).num_milliseconds() as f64 / 1000.0)
    }
}

/// Per-invocation crawl state
#[derive(Debug, Default)]
struct CrawlState {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
}

impl CrawlState {
    /// Enqueues `url` unless it was seen before; returns whether it was added
    ///
    /// URLs are keyed by [`site_key`], so `www.` and bare-host forms of a page
    /// are one entry.
    fn enqueue(&mut self, url: Url, depth: u32) -> bool {
        let key = site_key(&url).unwrap_or_else(|| url.to_string());
        if !self.visited.insert(key) {
            return false;
        }
        self.queue.push_back(FrontierEntry { url, depth });
        true
    }
}

/// Breadth-first link-discovery crawler
///
/// # Traversal Rules
///
/// - The seed is enqueued at depth 0
/// - A dequeued entry with `depth >= max_depth` is skipped without fetching
/// - Links are enqueued at `depth + 1` only if that depth can still be fetched
/// - A URL is enqueued (and therefore fetched) at most once
/// - A failed fetch is logged and recorded; the crawl continues
/// - At most `max_pages` fetches are attempted
#[derive(Debug, Clone)]
pub struct FrontierCrawler {
    content_patterns: Vec<String>,
    filter_links_at: LinkFilterPolicy,
    max_pages: usize,
    options: RenderOptions,
}

impl FrontierCrawler {
    pub fn new(config: &CrawlerConfig, options: RenderOptions) -> Self {
        Self {
            content_patterns: config.content_patterns.clone(),
            filter_links_at: config.filter_links_at,
            max_pages: config.max_pages,
            options,
        }
    }

    /// Crawls from `base_url` and reports the content-bearing pages found
    ///
    /// Never fails: fetch errors are collected in [`CrawlReport::failed`].
    ///
    /// # Arguments
    ///
    /// * `session` - Render session reused for every fetch
    /// * `base_url` - Seed URL; its registrable domain bounds the crawl
    /// * `max_depth` - Number of BFS layers to fetch
    pub async fn crawl(
        &self,
        session: &dyn RenderSession,
        base_url: &Url,
        max_depth: u32,
    ) -> CrawlReport {
        let mut report = CrawlReport {
            started_at: Some(Utc::now()),
            ..CrawlReport::default()
        };

        let seed = match normalize_parsed(base_url.clone()) {
            Ok(seed) => seed,
            Err(e) => {
                tracing::error!("Cannot crawl {}: {}", base_url, e);
                report.failed.push((base_url.to_string(), e.to_string()));
                report.finished_at = Some(Utc::now());
                return report;
            }
        };

        let mut extractor = LinkExtractor::new(&seed);
        if self.filter_links_at == LinkFilterPolicy::Discovery {
            extractor = extractor.with_patterns(self.content_patterns.clone());
        }

        tracing::info!(
            "Starting crawl of {} (domain: {}, max depth: {})",
            seed,
            extractor.base_domain(),
            max_depth
        );

        let mut state = CrawlState::default();
        state.enqueue(seed, 0);

        while let Some(entry) = state.queue.pop_front() {
            if entry.depth >= max_depth {
                continue;
            }

            if report.fetched >= self.max_pages {
                tracing::warn!(
                    "Page limit of {} reached, {} URLs left unvisited",
                    self.max_pages,
                    state.queue.len() + 1
                );
                report.capped = true;
                break;
            }

            tracing::info!("Crawling: {} (depth: {})", entry.url, entry.depth);
            report.fetched += 1;

            let page = match session.render(&entry.url, &self.options).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("Error crawling {}: {}", entry.url, e);
                    report.failed.push((entry.url.to_string(), e.to_string()));
                    continue;
                }
            };

            if matches_content_pattern(&entry.url, &self.content_patterns) {
                tracing::debug!("Found content page: {}", entry.url);
                report.found.push(entry.url.clone());
            }

            let next_depth = entry.depth + 1;
            if next_depth >= max_depth {
                continue;
            }

            for link in extractor.extract(&page.final_url, &page.html) {
                if !state.enqueue(link, next_depth) {
                    report.skipped_visited += 1;
                }
            }
        }

        report.finished_at = Some(Utc::now());
        tracing::info!(
            "Crawl finished: {} pages fetched, {} content URLs found, {} failures",
            report.fetched,
            report.found.len(),
            report.failed.len()
        );

        report
    }
}
